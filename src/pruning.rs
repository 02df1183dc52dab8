//! Admissible lower bounds on the number of moves needed to repair a set of
//! mismatched goal-face facelets.
//!
//! A single move can rewrite the goal face in only two ways: an incoming
//! neighbor transfer replaces one three-facelet slot, or a turn of the goal
//! face itself rotates the whole edge ring. The table plays an optimistic
//! cover game with exactly those operations: each probe step deletes one
//! operation's facelets from the mismatch mask, and the depth at which the
//! mask empties bounds the true repair distance from below. Real moves can
//! never fix more per step than the game allows, so the bound is admissible.

use crate::{start, success};
use log::{debug, info};
use std::time::Instant;

const MASK_COUNT: usize = 512;

/// Cover operations in the packed ring-field domain: the six slots plus the
/// full edge ring.
const CLEAR_OPS: [u16; 7] = [
    0b0_0000_0111, // top slot
    0b0_0001_1100, // right slot
    0b0_0111_0000, // bottom slot
    0b0_1100_0001, // left slot
    0b1_1000_1000, // equator slot
    0b1_0010_0010, // middle slot
    0b0_1111_1111, // edge ring, rotated in place by a goal-face turn
];

/// Every mask empties within two steps (ring, then a center-bearing slot),
/// so the probe never runs this deep.
const MAX_PROBE_DEPTH: u8 = 4;

fn probe(mask: u16, depth: u8) -> u8 {
    if mask == 0 {
        return 0;
    }
    if depth == MAX_PROBE_DEPTH {
        return MAX_PROBE_DEPTH;
    }
    CLEAR_OPS
        .iter()
        .filter(|&&op| mask & op != 0)
        .map(|&op| 1 + probe(mask & !op, depth + 1))
        .min()
        .unwrap_or(MAX_PROBE_DEPTH)
}

fn flat_to_ring(flat_mask: u16) -> u16 {
    let mut ring_mask = 0;
    for (pos, &field) in crate::puzzle::POS_TO_FIELD.iter().enumerate() {
        if flat_mask & (1 << pos) != 0 {
            ring_mask |= 1 << field;
        }
    }
    ring_mask
}

/// Lower-bound table indexed by a 9-bit mismatch mask over the goal face,
/// bit `j` marking row-major position `j`.
pub struct PruneTable(Box<[u8; MASK_COUNT]>);

impl PruneTable {
    #[must_use]
    pub fn generate() -> Self {
        debug!(start!("Generating the mismatch lower bound table"));
        let start_time = Instant::now();
        let mut table = Box::new([0u8; MASK_COUNT]);
        for (flat_mask, entry) in table.iter_mut().enumerate() {
            *entry = probe(flat_to_ring(flat_mask as u16), 0);
        }
        info!(
            success!("Generated the mismatch lower bound table in {:?}"),
            start_time.elapsed()
        );
        Self(table)
    }

    #[must_use]
    pub fn lower_bound(&self, flat_mask: u16) -> u8 {
        self.0[flat_mask as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mask_is_zero() {
        assert_eq!(PruneTable::generate().lower_bound(0), 0);
    }

    #[test]
    fn test_single_positions_are_one() {
        let table = PruneTable::generate();
        for pos in 0..9 {
            assert_eq!(table.lower_bound(1 << pos), 1);
        }
    }

    #[test]
    fn test_bounds_stay_small() {
        // One ring rotation plus one center-bearing slot covers any mask.
        let table = PruneTable::generate();
        for mask in 0..MASK_COUNT as u16 {
            assert!(table.lower_bound(mask) <= 2, "mask {mask:#b}");
        }
    }

    #[test]
    fn test_monotone_under_supersets() {
        let table = PruneTable::generate();
        for mask in 0..MASK_COUNT as u16 {
            for pos in 0..9 {
                assert!(
                    table.lower_bound(mask | (1 << pos)) >= table.lower_bound(mask),
                    "mask {mask:#b} position {pos}"
                );
            }
        }
    }

    #[test]
    fn test_slot_masks_are_one() {
        let table = PruneTable::generate();
        // Row-major slot footprints on the face.
        for flat in [
            0b000_000_111, // top row
            0b100_100_100, // right column
            0b111_000_000, // bottom row
            0b001_001_001, // left column
            0b000_111_000, // middle row
            0b010_010_010, // middle column
        ] {
            assert_eq!(table.lower_bound(flat), 1, "mask {flat:#b}");
        }
    }

    #[test]
    fn test_misrotated_ring_is_one() {
        // Four alternating edge-ring mismatches are fixable by one turn of
        // the goal face, and the bound must not claim otherwise.
        let table = PruneTable::generate();
        assert_eq!(table.lower_bound(0b010_101_010), 1);
    }

    #[test]
    fn test_full_face_is_two() {
        assert_eq!(PruneTable::generate().lower_bound(0b111_111_111), 2);
    }
}
