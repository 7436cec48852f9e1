#![warn(clippy::pedantic)]
#![allow(clippy::similar_names, clippy::too_many_lines, clippy::cast_possible_truncation)]

//! A two-phase solver for the 3×3×3 cube.
//!
//! Phase 1 brings an arbitrary state into the subgroup generated by
//! `{U, D, R2, L2, F2, B2}`; phase 2 finishes the solve inside it. Both
//! phases run iterative-deepening A* over symmetry-reduced coordinate
//! tables, trying six rotated/inverted starting frames and pre-move
//! prefixes so that the first solution found respects the caller's move
//! bound.

pub(crate) mod coord;
pub(crate) mod pruning;
pub(crate) mod search;
pub(crate) mod symmetry;
pub(crate) mod tables;

use bitflags::bitflags;
use cube_core::cubie::CubieCube;
use cube_core::moves::{self, MoveParseError};
use cube_core::{facelet, CubeError};
use thiserror::Error;

use crate::search::Search;
use crate::tables::Tables;

#[macro_export]
macro_rules! start {
    ($msg:expr) => {
        concat!("⏳ ", $msg)
    };
}

#[macro_export]
macro_rules! working {
    ($msg:expr) => {
        concat!("🛠  ", $msg)
    };
}

#[macro_export]
macro_rules! success {
    ($msg:expr) => {
        concat!("✅ ", $msg)
    };
}

bitflags! {
    /// Formatting options for solutions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SolveOptions: u8 {
        /// Put a `.` token between the phase 1 and phase 2 parts.
        const USE_SEPARATOR = 1;
        /// Append the move count as a `(Nf)` suffix.
        const APPEND_LENGTH = 1 << 1;
        /// Emit the inverse maneuver, i.e. a generator of the state.
        const INVERSE_SOLUTION = 1 << 2;
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    #[error(transparent)]
    Invalid(#[from] CubeError),
    #[error(transparent)]
    Moves(#[from] MoveParseError),
    #[error("no solution within the requested move bound")]
    Exhausted,
}

impl SolveError {
    /// The stable numeric code reported by the string-level API.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            SolveError::Invalid(e) => e.code(),
            SolveError::Moves(_) => 1,
            SolveError::Exhausted => 8,
        }
    }
}

/// Solve a facelet string in at most `max_len` face turns (clamped to 25).
///
/// Returns a space-separated move sequence, or `"Error N"` with the numeric
/// validation/search code. Note the quirk at the hard cap: with
/// `max_len = 25` solutions of exactly 25 moves are not accepted.
#[must_use]
pub fn solve(facelets: &str, max_len: u8) -> String {
    match try_solve(facelets, max_len, SolveOptions::empty()) {
        Ok(solution) => solution,
        Err(e) => format!("Error {}", e.code()),
    }
}

/// The typed flavor of [`solve`].
pub fn try_solve(
    facelets: &str,
    max_len: u8,
    options: SolveOptions,
) -> Result<String, SolveError> {
    let cc = facelet::to_cubie(facelets)?;
    cc.verify()?;
    Search::new(Tables::get(), options).run(&cc, max_len.min(25))
}

/// Apply `moves` to the solved cube and return the resulting facelets, or
/// an empty string if the sequence does not parse.
#[must_use]
pub fn from_moves(moves: &str) -> String {
    try_from_moves(moves).unwrap_or_default()
}

pub fn try_from_moves(moves: &str) -> Result<String, SolveError> {
    try_apply_moves(facelet::SOLVED_FACELETS, moves)
}

/// Apply `moves` to `facelets` and return the resulting facelets, or an
/// empty string on any validation or parse error.
#[must_use]
pub fn apply_moves(facelets: &str, moves: &str) -> String {
    try_apply_moves(facelets, moves).unwrap_or_default()
}

pub fn try_apply_moves(facelets: &str, moves: &str) -> Result<String, SolveError> {
    let cc = facelet::to_cubie(facelets)?;
    cc.verify()?;
    let seq = moves::parse_moves(moves)?;
    Ok(facelet::from_cubie(&cc.apply_moves(&seq)))
}

/// A uniformly distributed solvable facelet string.
#[must_use]
pub fn random_cube() -> String {
    facelet::from_cubie(&CubieCube::random())
}

/// `n` random face turns with no two consecutive turns of the same face and
/// no opposite-face pair in descending order.
#[must_use]
pub fn random_moves(n: usize) -> String {
    let mut moves = Vec::with_capacity(n);
    let mut last_axis = -1i32;
    for _ in 0..n {
        let axis = loop {
            let axis = fastrand::i32(0..6) * 3;
            if axis != last_axis && axis != last_axis - 9 {
                break axis;
            }
        };
        moves.push(axis as u8 + fastrand::u8(0..3));
        last_axis = axis;
    }
    moves::format_moves(&moves)
}

/// Validate a facelet string without searching, returning the numeric code
/// on failure.
pub fn verify(facelets: &str) -> Result<(), SolveError> {
    let cc = facelet::to_cubie(facelets)?;
    cc.verify()?;
    Ok(())
}
