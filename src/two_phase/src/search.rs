//! The two-phase IDA* engine.
//!
//! The outer loops try phase 1 target lengths from zero upward and, for each
//! length, all six URF starting frames and pre-move prefixes. Phase 1 runs
//! depth-limited DFS over the flip/twist/slice coordinates; wherever it
//! reaches the `{U, D, R2, L2, F2, B2}` subgroup with enough budget left,
//! phase 2 searches the permutation coordinates for a finish. The first
//! solution found respects the caller's bound by construction, so the whole
//! search stops there.
//!
//! All mutable state lives in this per-call context; the tables are shared
//! and read-only.

use std::time::Instant;

use log::debug;

use cube_core::cubie::{CubieCube, N_CCOMB, N_MPERM, N_SLICE, SOLVED};
use cube_core::moves::{move_cubies, MOVE_NAMES, N_MOVES};

use crate::pruning::get_pruning;
use crate::symmetry::{N_MOVES_UD, N_SYM, N_SYM8, UD_MOVES};
use crate::tables::Tables;
use crate::{success, working, SolveError, SolveOptions};

const MAX_PREMOVES: usize = 20;
const MIN_P1_LENGTH: usize = 7;
const MAX_DEPTH2: usize = 13;
/// Pre-moves whose trailing position phase 2 would duplicate; only quarter
/// turns of R, F, L and B may end a prefix.
const SKIP_LAST_PREMOVE: u32 = 0x36FB7;

/// A phase 1 node: flip and twist as (class, sym) pairs, slice raw, and the
/// pruning bound of the pair.
#[derive(Clone, Copy, Default)]
struct CoordNode {
    flip: u16,
    fsym: u8,
    twist: u16,
    tsym: u8,
    slice: u16,
    prun: u8,
}

impl CoordNode {
    fn set_with_prun(&mut self, t: &Tables, cc: &CubieCube, depth: usize) -> bool {
        let packed = t.coord.flip_raw2sym[cc.flip() as usize];
        self.flip = packed >> 3;
        self.fsym = (packed & 7) as u8;
        let packed = t.coord.twist_raw2sym[cc.twist() as usize];
        self.twist = packed >> 3;
        self.tsym = (packed & 7) as u8;
        self.slice = cc.ud_slice();
        self.prun = self.lookup(t);
        usize::from(self.prun) <= depth
    }

    fn do_move_prun(&mut self, t: &Tables, node: &CoordNode, m: usize) -> u8 {
        self.slice = t.coord.slice_move[node.slice as usize * N_MOVES + m];
        let packed = t.coord.flip_move
            [node.flip as usize * N_MOVES + t.sym.sym8_move[node.fsym as usize][m] as usize];
        self.flip = packed >> 3;
        self.fsym = (packed & 7) as u8 ^ node.fsym;
        let packed = t.coord.twist_move
            [node.twist as usize * N_MOVES + t.sym.sym8_move[node.tsym as usize][m] as usize];
        self.twist = packed >> 3;
        self.tsym = (packed & 7) as u8 ^ node.tsym;
        self.prun = self.lookup(t);
        self.prun
    }

    fn lookup(&self, t: &Tables) -> u8 {
        let slice = self.slice as usize * N_SYM8;
        get_pruning(
            &t.slice_twist_prun,
            self.twist as usize * N_SLICE
                + t.coord.slice_conj[slice + self.tsym as usize] as usize,
        )
        .max(get_pruning(
            &t.slice_flip_prun,
            self.flip as usize * N_SLICE
                + t.coord.slice_conj[slice + self.fsym as usize] as usize,
        ))
    }
}

/// The solution under construction. Appending canonicalizes as it goes:
/// same-axis moves merge their powers, and a move whose parallel partner
/// sits one slot back folds into the slot before that.
#[derive(Clone, Copy)]
struct SolutionBuf {
    moves: [u8; 31],
    len: usize,
    depth1: usize,
}

impl Default for SolutionBuf {
    fn default() -> SolutionBuf {
        SolutionBuf {
            moves: [0; 31],
            len: 0,
            depth1: 0,
        }
    }
}

impl SolutionBuf {
    fn append(&mut self, m: u8) {
        if self.len == 0 {
            self.moves[0] = m;
            self.len = 1;
            return;
        }
        let axis = m / 3;
        let last = self.moves[self.len - 1] / 3;
        if axis == last {
            let power = (m % 3 + self.moves[self.len - 1] % 3 + 1) % 4;
            if power == 3 {
                self.len -= 1;
            } else {
                self.moves[self.len - 1] = axis * 3 + power;
            }
            return;
        }
        if self.len > 1 && axis % 3 == last % 3 && axis == self.moves[self.len - 2] / 3 {
            let power = (m % 3 + self.moves[self.len - 2] % 3 + 1) % 4;
            if power == 3 {
                self.moves[self.len - 2] = self.moves[self.len - 1];
                self.len -= 1;
            } else {
                self.moves[self.len - 2] = axis * 3 + power;
            }
            return;
        }
        self.moves[self.len] = m;
        self.len += 1;
    }

    fn format(&self, t: &Tables, urf_idx: usize, options: SolveOptions) -> String {
        let urf = if options.contains(SolveOptions::INVERSE_SOLUTION) {
            (urf_idx + 3) % 6
        } else {
            urf_idx
        };
        let map = &t.sym.urf_move[urf];
        let separator = options.contains(SolveOptions::USE_SEPARATOR);
        let mut tokens: Vec<String> = Vec::with_capacity(self.len + 2);
        if urf < 3 {
            for s in 0..self.len {
                if separator && s == self.depth1 {
                    tokens.push(".".to_owned());
                }
                tokens.push(MOVE_NAMES[map[self.moves[s] as usize] as usize].to_owned());
            }
        } else {
            for s in (0..self.len).rev() {
                tokens.push(MOVE_NAMES[map[self.moves[s] as usize] as usize].to_owned());
                if separator && s == self.depth1 {
                    tokens.push(".".to_owned());
                }
            }
        }
        if options.contains(SolveOptions::APPEND_LENGTH) {
            tokens.push(format!("({}f)", self.len));
        }
        tokens.join(" ")
    }
}

pub(crate) struct Search<'a> {
    t: &'a Tables,
    options: SolveOptions,
    /// Exclusive bound on the emitted length, `min(25, max_len + 1)`.
    sol: usize,
    length1: usize,
    depth1: usize,
    /// Watermark up to which `p1_cubies` matches the move stack.
    valid1: usize,
    allow_shorter: bool,
    premv_len: usize,
    max_dep2: usize,
    depth2_found: usize,
    mv: [u8; 31],
    premv: [u8; MAX_PREMOVES],
    p1_cubies: [CubieCube; 26],
    nodes: [CoordNode; 28],
    urf_cubies: [CubieCube; 6],
    solution: Option<SolutionBuf>,
}

impl<'a> Search<'a> {
    pub fn new(t: &'a Tables, options: SolveOptions) -> Search<'a> {
        Search {
            t,
            options,
            sol: 0,
            length1: 0,
            depth1: 0,
            valid1: 0,
            allow_shorter: false,
            premv_len: 0,
            max_dep2: 0,
            depth2_found: 0,
            mv: [0; 31],
            premv: [0; MAX_PREMOVES],
            p1_cubies: [SOLVED; 26],
            nodes: [CoordNode::default(); 28],
            urf_cubies: [SOLVED; 6],
            solution: None,
        }
    }

    pub fn run(&mut self, cc: &CubieCube, max_len: u8) -> Result<String, SolveError> {
        self.sol = (usize::from(max_len) + 1).min(25);
        let mut c = *cc;
        for i in 0..6 {
            self.urf_cubies[i] = c;
            c = self.t.sym.urf_conjugate(&c);
            if i % 3 == 2 {
                c = c.inverse();
            }
        }

        let begin = Instant::now();
        for length1 in 0..self.sol {
            self.length1 = length1;
            self.max_dep2 = MAX_DEPTH2.min(self.sol - length1);
            debug!(working!("Phase 1 target length {}"), length1);
            for urf_idx in 0..6 {
                let root = self.urf_cubies[urf_idx];
                if self.phase1_premoves(MAX_PREMOVES, -30, &root) == 0 {
                    let buf = self.solution.expect("return code 0 records a solution");
                    debug!(
                        success!("{} moves in {:.3}s"),
                        buf.len,
                        begin.elapsed().as_secs_f64()
                    );
                    return Ok(buf.format(self.t, urf_idx, self.options));
                }
            }
        }
        Err(SolveError::Exhausted)
    }

    /// Enumerate pre-move prefixes, running phase 1 on the pre-moved cube at
    /// the correspondingly reduced depth.
    fn phase1_premoves(&mut self, maxl: usize, lm: i32, cc: &CubieCube) -> u32 {
        // recursion below clobbers the field, so keep a local copy
        let premv_len = MAX_PREMOVES - maxl;
        self.premv_len = premv_len;
        if premv_len == 0 || SKIP_LAST_PREMOVE >> lm & 1 == 0 {
            self.depth1 = self.length1 - premv_len;
            self.allow_shorter = self.depth1 == MIN_P1_LENGTH && premv_len != 0;
            self.p1_cubies[0] = *cc;
            self.valid1 = 0;
            let depth1 = self.depth1;
            let mut root = CoordNode::default();
            if root.set_with_prun(self.t, cc, depth1) {
                self.nodes[depth1 + 1] = root;
                if self.phase1(depth1, -3) == 0 {
                    return 0;
                }
            }
        }

        if maxl == 0 || premv_len + MIN_P1_LENGTH >= self.length1 {
            return 1;
        }
        let mut skip_moves = 0u32;
        if maxl == 1 || premv_len + 1 + MIN_P1_LENGTH >= self.length1 {
            skip_moves |= SKIP_LAST_PREMOVE;
        }

        let lm_axis = if lm >= 0 { lm / 3 * 3 } else { -10 };
        for m in 0..N_MOVES as i32 {
            let axis = m / 3 * 3;
            if axis == lm_axis || axis == lm_axis - 9 || axis == lm_axis + 9 {
                continue;
            }
            if skip_moves >> m & 1 != 0 {
                continue;
            }
            let premoved = move_cubies()[m as usize].multiply(cc);
            self.premv[premv_len] = m as u8;
            if self.phase1_premoves(maxl - 1, m, &premoved) == 0 {
                return 0;
            }
        }
        1
    }

    /// Depth-limited phase 1 DFS. Returns 0 when a full solution was found,
    /// 1 to keep searching, and 2+ when phase 2 proved the remaining budget
    /// short by that much (the caller stops trying higher powers).
    fn phase1(&mut self, maxl: usize, lm: i32) -> u32 {
        if self.nodes[maxl + 1].prun == 0 && maxl < 5 {
            if self.allow_shorter || maxl == 0 {
                self.depth1 -= maxl;
                let ret = self.init_phase2();
                self.depth1 += maxl;
                return ret;
            }
            return 1;
        }

        let t = self.t;
        for axis in (0..N_MOVES as i32).step_by(3) {
            if axis == lm || axis == lm - 9 {
                continue;
            }
            for power in 0..3 {
                let m = (axis + power) as usize;
                let parent = self.nodes[maxl + 1];
                let prun = self.nodes[maxl].do_move_prun(t, &parent, m);
                if usize::from(prun) > maxl {
                    break;
                }
                if usize::from(prun) == maxl {
                    continue;
                }
                self.mv[self.depth1 - maxl] = m as u8;
                self.valid1 = self.valid1.min(self.depth1 - maxl);
                let ret = self.phase1(maxl - 1, axis);
                if ret == 0 {
                    return 0;
                }
                if ret >= 2 {
                    break;
                }
            }
        }
        1
    }

    /// Replay the phase 1 moves at cubie level, extract the phase 2
    /// sym-coordinates and search for a finish within the depth budget.
    fn init_phase2(&mut self) -> u32 {
        let t = self.t;
        let moves = move_cubies();
        for i in self.valid1..self.depth1 {
            self.p1_cubies[i + 1] = self.p1_cubies[i].multiply(&moves[self.mv[i] as usize]);
        }
        self.valid1 = self.depth1;

        let cc = self.p1_cubies[self.depth1];
        let packed = t.coord.cperm_raw2sym[cc.cperm() as usize];
        let corn = packed >> 4;
        let csym = (packed & 0xf) as u8;
        let packed = t.coord.eperm_raw2sym[cc.eperm() as usize];
        let edge = packed >> 4;
        let esym = (packed & 0xf) as u8;
        let mid = cc.mperm();

        let budget = self.max_dep2 - 1;
        let prun = self.phase2_prun(edge, esym, corn, csym, mid);
        if usize::from(prun) > budget {
            return (usize::from(prun) - budget) as u32;
        }

        let lm = if self.depth1 == 0 {
            N_MOVES_UD
        } else {
            let last_axis = self.mv[self.depth1 - 1] / 3 * 3;
            t.sym.std2ud[last_axis as usize + 1] as usize
        };
        if self.phase2(edge, esym, corn, csym, mid, budget, self.depth1, lm) {
            let mut buf = SolutionBuf::default();
            for i in 0..self.depth1 + self.depth2_found {
                buf.append(self.mv[i]);
            }
            for i in (0..self.premv_len).rev() {
                buf.append(self.premv[i]);
            }
            buf.depth1 = self.depth1;
            self.solution = Some(buf);
            return 0;
        }
        1
    }

    /// Lower bound for a phase 2 state: the two pruning pairs, and the same
    /// edge/corner table indexed at the inverse state, which often tightens
    /// the bound.
    fn phase2_prun(&self, edge: u16, esym: u8, corn: u16, csym: u8, mid: u8) -> u8 {
        let t = self.t;
        let direct = get_pruning(
            &t.eperm_ccomb_prun,
            edge as usize * N_CCOMB + self.ccomb_index(corn, csym, esym),
        );
        let middle = get_pruning(
            &t.mperm_cperm_prun,
            corn as usize * N_MPERM
                + t.coord.mperm_conj[mid as usize * N_SYM + csym as usize] as usize,
        );
        let inv = t.coord.eperm_inv[edge as usize];
        let edgei = inv >> 4;
        let esymi = t.sym.mult[esym as usize][(inv & 0xf) as usize];
        let inv = t.coord.cperm_inv[corn as usize];
        let corni = inv >> 4;
        let csymi = t.sym.mult[csym as usize][(inv & 0xf) as usize];
        let inverse = get_pruning(
            &t.eperm_ccomb_prun,
            edgei as usize * N_CCOMB + self.ccomb_index(corni, csymi, esymi),
        );
        direct.max(middle).max(inverse)
    }

    /// The corner-combination column for an (eperm, cperm) pruning pair,
    /// conjugated into the edge representative's frame.
    fn ccomb_index(&self, corn: u16, csym: u8, esym: u8) -> usize {
        let t = self.t;
        t.coord.ccomb_conj[t.coord.perm2comb[corn as usize] as usize * N_SYM
            + t.sym.inv_mult[csym as usize][esym as usize] as usize] as usize
    }

    #[allow(clippy::too_many_arguments)]
    fn phase2(
        &mut self,
        edge: u16,
        esym: u8,
        corn: u16,
        csym: u8,
        mid: u8,
        maxl: usize,
        depth: usize,
        lm: usize,
    ) -> bool {
        if edge == 0 && corn == 0 && mid == 0 {
            self.depth2_found = depth - self.depth1;
            return true;
        }
        if maxl == 0 {
            return false;
        }
        let t = self.t;
        for m in 0..N_MOVES_UD {
            if t.canon_masks2[lm] >> m & 1 != 0 {
                continue;
            }
            let midx = t.coord.mperm_move[mid as usize * N_MOVES_UD + m] as u8;
            let packed = t.coord.cperm_move
                [corn as usize * N_MOVES_UD + t.sym.sym_move_ud[csym as usize][m] as usize];
            let csymx = t.sym.mult[csym as usize][(packed & 0xf) as usize];
            let cornx = packed >> 4;
            let packed = t.coord.eperm_move
                [edge as usize * N_MOVES_UD + t.sym.sym_move_ud[esym as usize][m] as usize];
            let esymx = t.sym.mult[esym as usize][(packed & 0xf) as usize];
            let edgex = packed >> 4;

            if usize::from(self.phase2_prun(edgex, esymx, cornx, csymx, midx)) >= maxl {
                continue;
            }
            self.mv[depth] = UD_MOVES[m];
            if self.phase2(edgex, esymx, cornx, csymx, midx, maxl - 1, depth + 1, m) {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cube_core::moves::parse_moves;

    fn appended(moves: &str) -> Vec<u8> {
        let mut buf = SolutionBuf::default();
        for m in parse_moves(moves).unwrap() {
            buf.append(m);
        }
        buf.moves[..buf.len].to_vec()
    }

    #[test]
    fn test_append_keeps_distinct_axes() {
        assert_eq!(appended("U R F'"), parse_moves("U R F'").unwrap());
        assert_eq!(appended("U D"), parse_moves("U D").unwrap());
    }

    #[test]
    fn test_append_merges_same_axis_powers() {
        assert_eq!(appended("U U"), parse_moves("U2").unwrap());
        assert_eq!(appended("R2 R'"), parse_moves("R").unwrap());
        assert_eq!(appended("U U'"), Vec::<u8>::new());
        assert_eq!(appended("F2 F2"), Vec::<u8>::new());
    }

    #[test]
    fn test_append_folds_across_a_parallel_move() {
        // the parallel partner in between stays put
        assert_eq!(appended("R L R"), parse_moves("R2 L").unwrap());
        assert_eq!(appended("F B2 F'"), parse_moves("B2").unwrap());
        // a full cancellation pulls the partner forward
        assert_eq!(appended("U D U'"), parse_moves("D").unwrap());
    }

    #[test]
    fn test_append_chains_merges() {
        assert_eq!(appended("R L R L"), parse_moves("R2 L2").unwrap());
        assert_eq!(appended("U D U' D'"), Vec::<u8>::new());
    }

    #[test]
    fn test_solved_node_has_zero_bound() {
        let t = Tables::get();
        let mut node = CoordNode::default();
        assert!(node.set_with_prun(t, &SOLVED, 0));
        assert_eq!(node.prun, 0);
        // a quarter turn of R leaves phase 1 unsolved
        let mut child = CoordNode::default();
        assert!(child.do_move_prun(t, &node, 3) > 0);
        // and undoing it restores the bound
        let mut back = CoordNode::default();
        assert_eq!(back.do_move_prun(t, &child, 5), 0);
    }
}
