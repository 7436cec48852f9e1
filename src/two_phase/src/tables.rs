//! The immutable table aggregate shared by every solve.
//!
//! Built once on first use, in the order symmetries → coordinates →
//! pruning; afterwards only read, so concurrent solves need no
//! synchronization.

use std::sync::OnceLock;
use std::time::Instant;

use log::info;

use cube_core::cubie::{N_CCOMB, N_MPERM, N_SLICE};
use cube_core::moves::N_MOVES;

use crate::coord::{CoordTables, N_FLIP_SYM, N_PERM_SYM, N_TWST_SYM};
use crate::pruning::{self, PrunSpec};
use crate::symmetry::{SymTables, N_MOVES_UD, N_SYM, N_SYM8, UD_MOVES};
use crate::{start, success};

pub struct Tables {
    pub(crate) sym: SymTables,
    pub(crate) coord: CoordTables,
    pub(crate) slice_twist_prun: Box<[u32]>,
    pub(crate) slice_flip_prun: Box<[u32]>,
    pub(crate) eperm_ccomb_prun: Box<[u32]>,
    pub(crate) mperm_cperm_prun: Box<[u32]>,
    /// Forbidden phase 2 moves after each phase 2 move; entry 10 allows all.
    pub(crate) canon_masks2: [u16; N_MOVES_UD + 1],
}

impl Tables {
    /// The process-wide tables, built on first call.
    pub fn get() -> &'static Tables {
        static TABLES: OnceLock<Tables> = OnceLock::new();
        TABLES.get_or_init(Tables::build)
    }

    fn build() -> Tables {
        info!(start!("Generating solver tables"));
        let begin = Instant::now();

        let sym = SymTables::build();
        let coord = CoordTables::build(&sym);

        let slice_twist_prun = pruning::build(&PrunSpec {
            name: "slice-twist",
            n_class: N_TWST_SYM,
            n_raw: N_SLICE,
            n_moves: N_MOVES,
            shift: 3,
            n_conj: N_SYM8,
            a_move: &coord.twist_move,
            b_move: &coord.slice_move,
            b_conj: &coord.slice_conj,
            selfsym: &coord.twist_selfsym,
            max_depth: 12,
        });
        let slice_flip_prun = pruning::build(&PrunSpec {
            name: "slice-flip",
            n_class: N_FLIP_SYM,
            n_raw: N_SLICE,
            n_moves: N_MOVES,
            shift: 3,
            n_conj: N_SYM8,
            a_move: &coord.flip_move,
            b_move: &coord.slice_move,
            b_conj: &coord.slice_conj,
            selfsym: &coord.flip_selfsym,
            max_depth: 12,
        });
        let eperm_ccomb_prun = pruning::build(&PrunSpec {
            name: "eperm-ccomb",
            n_class: N_PERM_SYM,
            n_raw: N_CCOMB,
            n_moves: N_MOVES_UD,
            shift: 4,
            n_conj: N_SYM,
            a_move: &coord.eperm_move,
            b_move: &coord.ccomb_move,
            b_conj: &coord.ccomb_conj,
            selfsym: &coord.eperm_selfsym,
            max_depth: 10,
        });
        let mperm_cperm_prun = pruning::build(&PrunSpec {
            name: "mperm-cperm",
            n_class: N_PERM_SYM,
            n_raw: N_MPERM,
            n_moves: N_MOVES_UD,
            shift: 4,
            n_conj: N_SYM,
            a_move: &coord.cperm_move,
            b_move: &coord.mperm_move,
            b_conj: &coord.mperm_conj,
            selfsym: &coord.cperm_selfsym,
            max_depth: 10,
        });

        let mut canon_masks2 = [0u16; N_MOVES_UD + 1];
        for lm in 0..N_MOVES_UD {
            let last_axis = i32::from(UD_MOVES[lm] / 3 * 3);
            for m in 0..N_MOVES_UD {
                let axis = i32::from(UD_MOVES[m] / 3 * 3);
                if axis == last_axis || axis == last_axis - 9 {
                    canon_masks2[lm] |= 1 << m;
                }
            }
        }

        info!(
            success!("Solver tables ready in {:.3}s"),
            begin.elapsed().as_secs_f64()
        );
        Tables {
            sym,
            coord,
            slice_twist_prun,
            slice_flip_prun,
            eperm_ccomb_prun,
            mperm_cperm_prun,
            canon_masks2,
        }
    }
}
