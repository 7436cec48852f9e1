//! Facelet-string conversion.
//!
//! A cube is described by 54 sticker characters, nine per face in the order
//! U R F D L B, each face row-major. The six center stickers define the
//! color of their face, so any six distinct characters are accepted on
//! input; output always uses the canonical letters.

use crate::cubie::{CubeError, CubieCube, N_CORNERS, N_EDGES, SOLVED};
use crate::moves::Face;

pub const SOLVED_FACELETS: &str =
    "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB";

const FACELET_COUNT: usize = 54;
const CENTERS: [usize; 6] = [4, 13, 22, 31, 40, 49];

/// Sticker positions of each corner slot, U/D sticker first, the remaining
/// two clockwise.
const CORNER_FACELETS: [[usize; 3]; N_CORNERS] = [
    [8, 9, 20],   // URF
    [6, 18, 38],  // UFL
    [0, 36, 47],  // ULB
    [2, 45, 11],  // UBR
    [29, 26, 15], // DFR
    [27, 44, 24], // DLF
    [33, 53, 42], // DBL
    [35, 17, 51], // DRB
];

const CORNER_COLORS: [[Face; 3]; N_CORNERS] = [
    [Face::U, Face::R, Face::F],
    [Face::U, Face::F, Face::L],
    [Face::U, Face::L, Face::B],
    [Face::U, Face::B, Face::R],
    [Face::D, Face::F, Face::R],
    [Face::D, Face::L, Face::F],
    [Face::D, Face::B, Face::L],
    [Face::D, Face::R, Face::B],
];

const EDGE_FACELETS: [[usize; 2]; N_EDGES] = [
    [5, 10],  // UR
    [7, 19],  // UF
    [3, 37],  // UL
    [1, 46],  // UB
    [32, 16], // DR
    [28, 25], // DF
    [30, 43], // DL
    [34, 52], // DB
    [23, 12], // FR
    [21, 41], // FL
    [50, 39], // BL
    [48, 14], // BR
];

const EDGE_COLORS: [[Face; 2]; N_EDGES] = [
    [Face::U, Face::R],
    [Face::U, Face::F],
    [Face::U, Face::L],
    [Face::U, Face::B],
    [Face::D, Face::R],
    [Face::D, Face::F],
    [Face::D, Face::L],
    [Face::D, Face::B],
    [Face::F, Face::R],
    [Face::F, Face::L],
    [Face::B, Face::L],
    [Face::B, Face::R],
];

/// Decode a facelet string into a cubie cube. The result is *not* checked
/// for solvability; callers interested in that run [`CubieCube::verify`].
pub fn to_cubie(facelets: &str) -> Result<CubieCube, CubeError> {
    let chars: Vec<char> = facelets.chars().collect();
    if chars.len() != FACELET_COUNT {
        return Err(CubeError::MalformedFacelets);
    }

    // Map each sticker character to a face through the centers.
    let mut colors = [None::<Face>; FACELET_COUNT];
    let mut counts = [0u8; 6];
    for (i, &c) in chars.iter().enumerate() {
        let face = CENTERS
            .iter()
            .position(|&center| chars[center] == c)
            .ok_or(CubeError::MalformedFacelets)?;
        colors[i] = Some(FACES[face]);
        counts[face] += 1;
    }
    if counts != [9; 6] {
        return Err(CubeError::MalformedFacelets);
    }
    let color = |i: usize| colors[i].unwrap();

    let mut cc = SOLVED;
    for slot in 0..N_CORNERS {
        let stickers = CORNER_FACELETS[slot];
        let Some(ori) = (0..3).find(|&o| {
            matches!(color(stickers[o]), Face::U | Face::D)
        }) else {
            return Err(CubeError::CornerPermutation);
        };
        let col1 = color(stickers[(ori + 1) % 3]);
        let col2 = color(stickers[(ori + 2) % 3]);
        let Some(piece) = CORNER_COLORS
            .iter()
            .position(|c| c[1] == col1 && c[2] == col2)
        else {
            return Err(CubeError::CornerPermutation);
        };
        cc.ca[slot] = piece as u8 | (ori as u8) << 3;
    }
    for slot in 0..N_EDGES {
        let pair = [color(EDGE_FACELETS[slot][0]), color(EDGE_FACELETS[slot][1])];
        let Some((piece, flip)) = EDGE_COLORS.iter().enumerate().find_map(|(j, c)| {
            if pair == *c {
                Some((j, 0))
            } else if pair == [c[1], c[0]] {
                Some((j, 1))
            } else {
                None
            }
        }) else {
            return Err(CubeError::EdgePermutation);
        };
        cc.ea[slot] = (piece as u8) << 1 | flip;
    }
    Ok(cc)
}

const FACES: [Face; 6] = [Face::U, Face::R, Face::F, Face::D, Face::L, Face::B];

/// Encode a cubie cube as a canonical facelet string.
#[must_use]
pub fn from_cubie(cc: &CubieCube) -> String {
    let mut out = [Face::U; FACELET_COUNT];
    for (face, &center) in FACES.iter().zip(&CENTERS) {
        out[center] = *face;
    }
    for slot in 0..N_CORNERS {
        let piece = (cc.ca[slot] & 7) as usize;
        let ori = (cc.ca[slot] >> 3) as usize;
        for k in 0..3 {
            out[CORNER_FACELETS[slot][(k + ori) % 3]] = CORNER_COLORS[piece][k];
        }
    }
    for slot in 0..N_EDGES {
        let piece = (cc.ea[slot] >> 1) as usize;
        let flip = (cc.ea[slot] & 1) as usize;
        for k in 0..2 {
            out[EDGE_FACELETS[slot][(k + flip) % 2]] = EDGE_COLORS[piece][k];
        }
    }
    out.iter().map(|f| format!("{f}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::parse_moves;

    #[test]
    fn test_solved_round_trip() {
        assert_eq!(from_cubie(&SOLVED), SOLVED_FACELETS);
        assert_eq!(to_cubie(SOLVED_FACELETS).unwrap(), SOLVED);
    }

    #[test]
    fn test_scrambled_round_trip() {
        let cc = SOLVED.apply_moves(&parse_moves("R U R' U' F2 L D' B").unwrap());
        let facelets = from_cubie(&cc);
        assert_eq!(to_cubie(&facelets).unwrap(), cc);
    }

    #[test]
    fn test_any_six_characters_accepted() {
        let relabeled: String = SOLVED_FACELETS
            .chars()
            .map(|c| match c {
                'U' => 'w',
                'R' => 'r',
                'F' => 'g',
                'D' => 'y',
                'L' => 'o',
                _ => 'b',
            })
            .collect();
        assert_eq!(to_cubie(&relabeled).unwrap(), SOLVED);
    }

    #[test]
    fn test_malformed_strings_rejected() {
        assert_eq!(to_cubie("INVALID"), Err(CubeError::MalformedFacelets));
        assert_eq!(to_cubie(""), Err(CubeError::MalformedFacelets));
        // 54 chars but a color appears ten times
        let mut s: Vec<char> = SOLVED_FACELETS.chars().collect();
        s[0] = 'R';
        assert_eq!(
            to_cubie(&s.iter().collect::<String>()),
            Err(CubeError::MalformedFacelets)
        );
    }

    #[test]
    fn test_unmatchable_corner_rejected() {
        // swapping a U sticker with an F sticker leaves a corner with no
        // U- or D-colored facelet
        let mut s: Vec<char> = SOLVED_FACELETS.chars().collect();
        s.swap(8, 26);
        assert_eq!(
            to_cubie(&s.iter().collect::<String>()),
            Err(CubeError::CornerPermutation)
        );
    }

    #[test]
    fn test_duplicate_piece_caught_by_verify() {
        // swapping two stickers within one corner decodes, but the doubled
        // piece fails validation
        let mut s: Vec<char> = SOLVED_FACELETS.chars().collect();
        s.swap(9, 20);
        let cc = to_cubie(&s.iter().collect::<String>()).unwrap();
        assert_eq!(cc.verify(), Err(CubeError::CornerPermutation));
    }
}
