//! Face-turn indices, notation parsing and the move cubies.
//!
//! Moves are numbered `face * 3 + power` with the face order U R F D L B and
//! powers 0..3 meaning clockwise, half and counter-clockwise turns. Opposite
//! faces sit nine indices apart, which the canonical-move checks in the
//! solver rely on.

use std::str::FromStr;
use std::sync::OnceLock;

use strum_macros::EnumString;
use thiserror::Error;

use crate::cubie::{self, CubieCube};

pub const N_MOVES: usize = 18;

/// An enum for the faces of the cube.
///
/// - U: top face
/// - R: right face
/// - F: front face
/// - D: bottom face
/// - L: left face
/// - B: back face
#[derive(PartialEq, Eq, EnumString, Debug, Clone, Copy)]
pub enum Face {
    U,
    R,
    F,
    D,
    L,
    B,
}

impl std::fmt::Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

pub const MOVE_NAMES: [&str; N_MOVES] = [
    "U", "U2", "U'", "R", "R2", "R'", "F", "F2", "F'", "D", "D2", "D'", "L", "L2", "L'", "B",
    "B2", "B'",
];

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("unknown character {0:?} in move sequence")]
    UnknownCharacter(char),
}

/// Parse a move sequence. Suffixes `1` and `+` mean a clockwise quarter
/// turn (as does no suffix), `2` a half turn, and `3`, `'` or `-` a
/// counter-clockwise quarter turn. Whitespace is ignored.
pub fn parse_moves(s: &str) -> Result<Vec<u8>, MoveParseError> {
    let mut moves = Vec::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            continue;
        }
        let face = Face::from_str(c.to_string().as_str())
            .map_err(|_| MoveParseError::UnknownCharacter(c))?;
        let power = match chars.peek() {
            Some('2') => 1,
            Some('3' | '\'' | '-') => 2,
            Some('1' | '+') => 0,
            _ => {
                moves.push(face as u8 * 3);
                continue;
            }
        };
        chars.next();
        moves.push(face as u8 * 3 + power);
    }
    Ok(moves)
}

#[must_use]
pub fn format_moves(moves: &[u8]) -> String {
    moves
        .iter()
        .map(|&m| MOVE_NAMES[m as usize])
        .collect::<Vec<_>>()
        .join(" ")
}

/// The move that undoes `m`.
#[must_use]
pub fn inverse_move(m: u8) -> u8 {
    m / 3 * 3 + (2 - m % 3)
}

// The six generator turns as permutation/orientation vectors, one slot per
// corner and edge position.

const U_MOVE: ([u8; 8], [u8; 8], [u8; 12], [u8; 12]) = (
    [3, 0, 1, 2, 4, 5, 6, 7],
    [0; 8],
    [3, 0, 1, 2, 4, 5, 6, 7, 8, 9, 10, 11],
    [0; 12],
);
const R_MOVE: ([u8; 8], [u8; 8], [u8; 12], [u8; 12]) = (
    [4, 1, 2, 0, 7, 5, 6, 3],
    [2, 0, 0, 1, 1, 0, 0, 2],
    [8, 1, 2, 3, 11, 5, 6, 7, 4, 9, 10, 0],
    [0; 12],
);
const F_MOVE: ([u8; 8], [u8; 8], [u8; 12], [u8; 12]) = (
    [1, 5, 2, 3, 0, 4, 6, 7],
    [1, 2, 0, 0, 2, 1, 0, 0],
    [0, 9, 2, 3, 4, 8, 6, 7, 1, 5, 10, 11],
    [0, 1, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0],
);
const D_MOVE: ([u8; 8], [u8; 8], [u8; 12], [u8; 12]) = (
    [0, 1, 2, 3, 5, 6, 7, 4],
    [0; 8],
    [0, 1, 2, 3, 5, 6, 7, 4, 8, 9, 10, 11],
    [0; 12],
);
const L_MOVE: ([u8; 8], [u8; 8], [u8; 12], [u8; 12]) = (
    [0, 2, 6, 3, 4, 1, 5, 7],
    [0, 1, 2, 0, 0, 2, 1, 0],
    [0, 1, 10, 3, 4, 5, 9, 7, 8, 2, 6, 11],
    [0; 12],
);
const B_MOVE: ([u8; 8], [u8; 8], [u8; 12], [u8; 12]) = (
    [0, 1, 3, 7, 4, 5, 2, 6],
    [0, 0, 1, 2, 0, 0, 2, 1],
    [0, 1, 2, 11, 4, 5, 6, 10, 8, 9, 3, 7],
    [0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 1, 1],
);

/// The eighteen move cubies. Half and counter-clockwise turns are powers of
/// the six generators.
pub fn move_cubies() -> &'static [CubieCube; N_MOVES] {
    static MOVE_CUBIES: OnceLock<[CubieCube; N_MOVES]> = OnceLock::new();
    MOVE_CUBIES.get_or_init(|| {
        let generators = [U_MOVE, R_MOVE, F_MOVE, D_MOVE, L_MOVE, B_MOVE]
            .map(|(cp, co, ep, eo)| CubieCube::from_arrays(cp, co, ep, eo));
        let mut cubies = [cubie::SOLVED; N_MOVES];
        for (face, generator) in generators.iter().enumerate() {
            cubies[face * 3] = *generator;
            cubies[face * 3 + 1] = generator.multiply(generator);
            cubies[face * 3 + 2] = cubies[face * 3 + 1].multiply(generator);
        }
        cubies
    })
}

impl CubieCube {
    #[must_use]
    pub fn apply_move(&self, m: u8) -> CubieCube {
        self.multiply(&move_cubies()[m as usize])
    }

    #[must_use]
    pub fn apply_moves(&self, moves: &[u8]) -> CubieCube {
        moves.iter().fold(*self, |cc, &m| cc.apply_move(m))
    }
}
