#![warn(clippy::pedantic)]
#![allow(clippy::similar_names, clippy::too_many_lines, clippy::cast_possible_truncation)]

pub mod cubie;
pub mod facelet;
pub mod moves;

pub use cubie::{CubeError, CubieCube};
pub use facelet::SOLVED_FACELETS;
pub use moves::{Face, MoveParseError};
