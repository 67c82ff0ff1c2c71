//! Score Tally
//!
//! Truco scores are kept with matchsticks ("fósforos"): blocks of five
//! strokes, four sides of a square plus a diagonal. A 30-point match is
//! split into two halves, "malas" (first 15) and "buenas" (last 15).

use serde::{Serialize, Deserialize};

/// Strokes in one complete tally block.
pub const STROKES_PER_BLOCK: u32 = 5;

/// Points in one half of a 30-point match.
pub const HALF_POINTS: u32 = 15;

/// Break a score into tally blocks of up to five strokes each.
///
/// Only the last block may be partial. Zero points yields no blocks.
pub fn tally(points: u32) -> Vec<u8> {
    let full = points / STROKES_PER_BLOCK;
    let rest = points % STROKES_PER_BLOCK;

    let mut blocks = vec![STROKES_PER_BLOCK as u8; full as usize];
    if rest > 0 {
        blocks.push(rest as u8);
    }
    blocks
}

/// Which half of a match a score sits in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Half {
    /// First half ("las malas").
    Malas,
    /// Second half ("las buenas").
    Buenas,
}

impl Half {
    /// Half a score belongs to.
    ///
    /// Matches to 15 are played entirely in the malas.
    pub fn of(score: u32, max_points: u32) -> Half {
        if max_points > HALF_POINTS && score >= HALF_POINTS {
            Half::Buenas
        } else {
            Half::Malas
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_blocks() {
        assert!(tally(0).is_empty());
        assert_eq!(tally(3), vec![3]);
        assert_eq!(tally(5), vec![5]);
        assert_eq!(tally(12), vec![5, 5, 2]);
        assert_eq!(tally(30).len(), 6);
    }

    #[test]
    fn test_half() {
        assert_eq!(Half::of(0, 30), Half::Malas);
        assert_eq!(Half::of(14, 30), Half::Malas);
        assert_eq!(Half::of(15, 30), Half::Buenas);
        assert_eq!(Half::of(15, 15), Half::Malas);
    }
}
