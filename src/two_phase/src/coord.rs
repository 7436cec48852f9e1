//! Raw ↔ symmetry-reduced coordinate tables.
//!
//! Every coordinate gets a move table over the moves its phase uses; the
//! orientation coordinates and the two 8-piece permutations are additionally
//! reduced to symmetry classes. A packed `raw2sym` value holds
//! `class << shift | sym`, where `sym` indexes the eight even symmetries for
//! flip and twist (shift 3) and all sixteen for the permutations (shift 4).
//! The representative of a class is the smallest raw coordinate in it.

use cube_core::cubie::{
    CubieCube, N_CCOMB, N_FLIP, N_MPERM, N_PERM, N_SLICE, N_TWIST, SOLVED,
};
use cube_core::moves::{move_cubies, N_MOVES};

use crate::symmetry::{SymTables, N_MOVES_UD, N_SYM, N_SYM8, UD_MOVES};

pub(crate) const N_FLIP_SYM: usize = 336;
pub(crate) const N_TWST_SYM: usize = 324;
pub(crate) const N_PERM_SYM: usize = 2768;

pub(crate) struct CoordTables {
    pub flip_raw2sym: Box<[u16]>,
    pub flip_sym2raw: Box<[u16]>,
    pub flip_selfsym: Box<[u16]>,
    pub twist_raw2sym: Box<[u16]>,
    pub twist_sym2raw: Box<[u16]>,
    pub twist_selfsym: Box<[u16]>,
    pub eperm_raw2sym: Box<[u16]>,
    pub eperm_sym2raw: Box<[u16]>,
    pub eperm_selfsym: Box<[u16]>,
    pub cperm_raw2sym: Box<[u16]>,
    pub cperm_sym2raw: Box<[u16]>,
    pub cperm_selfsym: Box<[u16]>,

    /// `flip_move[class * 18 + m]`, packed like `raw2sym`.
    pub flip_move: Box<[u16]>,
    pub twist_move: Box<[u16]>,
    /// Raw slice successor, `slice_move[slice * 18 + m]`.
    pub slice_move: Box<[u16]>,
    /// Slice conjugated by each even symmetry.
    pub slice_conj: Box<[u16]>,
    /// `cperm_move[class * 10 + m]` over the phase 2 alphabet, packed.
    pub cperm_move: Box<[u16]>,
    pub eperm_move: Box<[u16]>,
    pub mperm_move: Box<[u16]>,
    pub mperm_conj: Box<[u16]>,
    pub ccomb_move: Box<[u16]>,
    pub ccomb_conj: Box<[u16]>,

    /// Sym-coordinate of the inverse of each class representative.
    pub eperm_inv: Box<[u16]>,
    pub cperm_inv: Box<[u16]>,
    /// Corner combination of each cperm representative.
    pub perm2comb: Box<[u8]>,
}

struct Classification {
    raw2sym: Box<[u16]>,
    sym2raw: Box<[u16]>,
    selfsym: Box<[u16]>,
}

/// Partition a raw coordinate into symmetry classes by conjugating each
/// unseen coordinate through `syms` and claiming everything it produces.
fn classify(
    sym: &SymTables,
    n_raw: usize,
    n_classes: usize,
    syms: &[usize],
    shift: u32,
    set: impl Fn(&mut CubieCube, u16),
    get: impl Fn(&CubieCube) -> u16,
) -> Classification {
    let mut raw2sym = vec![u16::MAX; n_raw].into_boxed_slice();
    let mut sym2raw = vec![0u16; n_classes].into_boxed_slice();
    let mut selfsym = vec![0u16; n_classes].into_boxed_slice();
    let mut count = 0;
    for raw in 0..n_raw {
        if raw2sym[raw] != u16::MAX {
            continue;
        }
        let mut cc = SOLVED;
        set(&mut cc, raw as u16);
        for (j, &s) in syms.iter().enumerate() {
            let conj = get(&sym.conj_by(&cc, s)) as usize;
            if conj == raw {
                selfsym[count] |= 1 << j;
            }
            if raw2sym[conj] == u16::MAX {
                raw2sym[conj] = (count as u16) << shift | j as u16;
            }
        }
        sym2raw[count] = raw as u16;
        count += 1;
    }
    assert_eq!(count, n_classes);
    Classification {
        raw2sym,
        sym2raw,
        selfsym,
    }
}

impl CoordTables {
    pub fn build(sym: &SymTables) -> CoordTables {
        let even_syms: Vec<usize> = (0..N_SYM).step_by(2).collect();
        let all_syms: Vec<usize> = (0..N_SYM).collect();

        let flip = classify(
            sym,
            N_FLIP,
            N_FLIP_SYM,
            &even_syms,
            3,
            CubieCube::set_flip,
            CubieCube::flip,
        );
        let twist = classify(
            sym,
            N_TWIST,
            N_TWST_SYM,
            &even_syms,
            3,
            CubieCube::set_twist,
            CubieCube::twist,
        );
        let eperm = classify(
            sym,
            N_PERM,
            N_PERM_SYM,
            &all_syms,
            4,
            CubieCube::set_eperm,
            CubieCube::eperm,
        );
        let cperm = classify(
            sym,
            N_PERM,
            N_PERM_SYM,
            &all_syms,
            4,
            CubieCube::set_cperm,
            CubieCube::cperm,
        );

        let moves = move_cubies();

        let mut flip_move = vec![0u16; N_FLIP_SYM * N_MOVES].into_boxed_slice();
        for c in 0..N_FLIP_SYM {
            let mut cc = SOLVED;
            cc.set_flip(flip.sym2raw[c]);
            for m in 0..N_MOVES {
                flip_move[c * N_MOVES + m] =
                    flip.raw2sym[cc.multiply(&moves[m]).flip() as usize];
            }
        }
        let mut twist_move = vec![0u16; N_TWST_SYM * N_MOVES].into_boxed_slice();
        for c in 0..N_TWST_SYM {
            let mut cc = SOLVED;
            cc.set_twist(twist.sym2raw[c]);
            for m in 0..N_MOVES {
                twist_move[c * N_MOVES + m] =
                    twist.raw2sym[cc.multiply(&moves[m]).twist() as usize];
            }
        }

        let mut slice_move = vec![0u16; N_SLICE * N_MOVES].into_boxed_slice();
        let mut slice_conj = vec![0u16; N_SLICE * N_SYM8].into_boxed_slice();
        for raw in 0..N_SLICE {
            let mut cc = SOLVED;
            cc.set_ud_slice(raw as u16);
            for m in 0..N_MOVES {
                slice_move[raw * N_MOVES + m] = cc.multiply(&moves[m]).ud_slice();
            }
            for j in 0..N_SYM8 {
                slice_conj[raw * N_SYM8 + j] = sym.conj_by(&cc, 2 * j).ud_slice();
            }
        }

        let mut cperm_move = vec![0u16; N_PERM_SYM * N_MOVES_UD].into_boxed_slice();
        let mut eperm_move = vec![0u16; N_PERM_SYM * N_MOVES_UD].into_boxed_slice();
        let mut eperm_inv = vec![0u16; N_PERM_SYM].into_boxed_slice();
        let mut cperm_inv = vec![0u16; N_PERM_SYM].into_boxed_slice();
        let mut perm2comb = vec![0u8; N_PERM_SYM].into_boxed_slice();
        for c in 0..N_PERM_SYM {
            let mut ec = SOLVED;
            ec.set_eperm(eperm.sym2raw[c]);
            let mut cc = SOLVED;
            cc.set_cperm(cperm.sym2raw[c]);
            for (ud, &m) in UD_MOVES.iter().enumerate() {
                eperm_move[c * N_MOVES_UD + ud] =
                    eperm.raw2sym[ec.multiply(&moves[m as usize]).eperm() as usize];
                cperm_move[c * N_MOVES_UD + ud] =
                    cperm.raw2sym[cc.multiply(&moves[m as usize]).cperm() as usize];
            }
            eperm_inv[c] = eperm.raw2sym[ec.inverse().eperm() as usize];
            cperm_inv[c] = cperm.raw2sym[cc.inverse().cperm() as usize];
            perm2comb[c] = cc.ccomb();
        }

        let mut mperm_move = vec![0u16; N_MPERM * N_MOVES_UD].into_boxed_slice();
        let mut mperm_conj = vec![0u16; N_MPERM * N_SYM].into_boxed_slice();
        for raw in 0..N_MPERM {
            let mut cc = SOLVED;
            cc.set_mperm(raw as u8);
            for (ud, &m) in UD_MOVES.iter().enumerate() {
                mperm_move[raw * N_MOVES_UD + ud] =
                    u16::from(cc.multiply(&moves[m as usize]).mperm());
            }
            for s in 0..N_SYM {
                mperm_conj[raw * N_SYM + s] =
                    u16::from(sym.conj_by(&cc, sym.inv_idx[s] as usize).mperm());
            }
        }
        let mut ccomb_move = vec![0u16; N_CCOMB * N_MOVES_UD].into_boxed_slice();
        let mut ccomb_conj = vec![0u16; N_CCOMB * N_SYM].into_boxed_slice();
        for raw in 0..N_CCOMB {
            let mut cc = SOLVED;
            cc.set_ccomb(raw as u8);
            for (ud, &m) in UD_MOVES.iter().enumerate() {
                ccomb_move[raw * N_MOVES_UD + ud] =
                    u16::from(cc.multiply(&moves[m as usize]).ccomb());
            }
            for s in 0..N_SYM {
                ccomb_conj[raw * N_SYM + s] =
                    u16::from(sym.conj_by(&cc, sym.inv_idx[s] as usize).ccomb());
            }
        }

        CoordTables {
            flip_raw2sym: flip.raw2sym,
            flip_sym2raw: flip.sym2raw,
            flip_selfsym: flip.selfsym,
            twist_raw2sym: twist.raw2sym,
            twist_sym2raw: twist.sym2raw,
            twist_selfsym: twist.selfsym,
            eperm_raw2sym: eperm.raw2sym,
            eperm_sym2raw: eperm.sym2raw,
            eperm_selfsym: eperm.selfsym,
            cperm_raw2sym: cperm.raw2sym,
            cperm_sym2raw: cperm.sym2raw,
            cperm_selfsym: cperm.selfsym,
            flip_move,
            twist_move,
            slice_move,
            slice_conj,
            cperm_move,
            eperm_move,
            mperm_move,
            mperm_conj,
            ccomb_move,
            ccomb_conj,
            eperm_inv,
            cperm_inv,
            perm2comb,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_counts() {
        let sym = SymTables::build();
        let coord = CoordTables::build(&sym);
        // the counts are asserted during construction; spot-check the
        // identity class on top
        assert_eq!(coord.flip_raw2sym[0], 0);
        assert_eq!(coord.twist_raw2sym[0], 0);
        assert_eq!(coord.eperm_raw2sym[0], 0);
        assert_eq!(coord.cperm_raw2sym[0], 0);
        assert_eq!(coord.perm2comb[0], 0);
        // solved inverts to solved
        assert_eq!(coord.eperm_inv[0] >> 4, 0);
        assert_eq!(coord.cperm_inv[0] >> 4, 0);
    }

    #[test]
    fn test_move_tables_match_cubie_algebra() {
        let sym = SymTables::build();
        let coord = CoordTables::build(&sym);
        let moves = move_cubies();
        // walking the sym-coordinate and the cubie in parallel must keep
        // them describing the same raw coordinate
        let scramble = [3u8, 0, 7, 12, 16, 1, 9, 6];
        let mut cc = SOLVED;
        let packed = coord.flip_raw2sym[cc.flip() as usize];
        let (mut class, mut fsym) = (packed >> 3, (packed & 7) as usize);
        for &m in &scramble {
            cc = cc.multiply(&moves[m as usize]);
            let conj_m = sym.sym8_move[fsym][m as usize] as usize;
            let packed = coord.flip_move[class as usize * N_MOVES + conj_m];
            class = packed >> 3;
            fsym ^= (packed & 7) as usize;
            let expect = coord.flip_raw2sym[cc.flip() as usize] >> 3;
            assert_eq!(class, expect);
        }
    }
}
