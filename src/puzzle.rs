//! Bit-packed facelet cube state and direct transform execution.
//!
//! The state is six `u32` words, one per face. Each word holds nine 3-bit
//! color fields: fields 0..=7 are the clockwise edge ring starting at the
//! top-left corner (row-major positions 0, 1, 2, 5, 8, 7, 6, 3) and field 8
//! is the center. The high five bits of every word are unused. This layout
//! makes a quarter turn of a face a single 24-bit rotation and makes moving
//! three facelets between adjacent faces a mask-and-or through a precomputed
//! spread table.

use itertools::Itertools;
use std::fmt;

pub const FACELET_COUNT: usize = 54;
pub const FACE_SIZE: usize = 9;
pub const COLOR_COUNT: u8 = 6;

const FIELD_BITS: u32 = 3;
const FIELD_MASK: u32 = 0b111;
const RING_BITS: u32 = 8 * FIELD_BITS;
const RING_MASK: u32 = (1 << RING_BITS) - 1;

/// A quarter turn advances the ring by two fields.
pub(crate) const QUARTER_SHIFT: u32 = 2 * FIELD_BITS;

/// Row-major position within a face -> packed field index.
pub(crate) const POS_TO_FIELD: [usize; FACE_SIZE] = [0, 1, 2, 7, 8, 3, 6, 5, 4];

/// The six faces, in color-value order: the solved state holds color
/// `face as u8` on every facelet of `face`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    U = 0,
    L = 1,
    F = 2,
    R = 3,
    B = 4,
    D = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [Face::U, Face::L, Face::F, Face::R, Face::B, Face::D];
}

/// One of the six canonical three-facelet groups of a face, identified by
/// the packed fields it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Slot {
    Top = 0,
    Right = 1,
    Bottom = 2,
    Left = 3,
    Equator = 4,
    Middle = 5,
}

/// Packed field indices of each slot, in the slot's canonical reading order.
const SLOT_FIELDS: [[usize; 3]; 6] = [
    [0, 1, 2], // Top: row-major 0,1,2
    [2, 3, 4], // Right: row-major 2,5,8
    [4, 5, 6], // Bottom: row-major 8,7,6
    [6, 7, 0], // Left: row-major 6,3,0
    [7, 8, 3], // Equator: row-major 3,4,5
    [1, 8, 5], // Middle: row-major 1,4,7
];

const fn build_slot_masks() -> [u32; 6] {
    let mut masks = [0u32; 6];
    let mut slot = 0;
    while slot < 6 {
        let mut i = 0;
        while i < 3 {
            masks[slot] |= FIELD_MASK << (SLOT_FIELDS[slot][i] as u32 * FIELD_BITS);
            i += 1;
        }
        slot += 1;
    }
    masks
}

const SLOT_MASKS: [u32; 6] = build_slot_masks();

/// `SPREAD[slot * 2 + reversed][key]` positions the three 3-bit digits of a
/// 9-bit group key into the slot's fields of a face word (digit 0 lands in
/// the slot's last field when reversed). Twelve arrangements cover the six
/// slots in both orderings, folding mirrored transfers into the same pass.
const fn build_spread() -> [[u32; 512]; 12] {
    let mut table = [[0u32; 512]; 12];
    let mut slot = 0;
    while slot < 6 {
        let mut rev = 0;
        while rev < 2 {
            let mut key = 0;
            while key < 512 {
                let mut word = 0u32;
                let mut i = 0;
                while i < 3 {
                    let digit = ((key >> (i * 3)) & 0b111) as u32;
                    let field = if rev == 1 {
                        SLOT_FIELDS[slot][2 - i]
                    } else {
                        SLOT_FIELDS[slot][i]
                    };
                    word |= digit << (field as u32 * FIELD_BITS);
                    i += 1;
                }
                table[slot * 2 + rev][key] = word;
                key += 1;
            }
            rev += 1;
        }
        slot += 1;
    }
    table
}

static SPREAD: [[u32; 512]; 12] = build_spread();

/// A three-facelet group: a slot on a face, read canonically or reversed.
#[derive(Debug, Clone, Copy)]
pub struct GroupRef {
    pub(crate) face: Face,
    pub(crate) slot: Slot,
    pub(crate) reversed: bool,
}

impl GroupRef {
    pub(crate) const fn new(face: Face, slot: Slot, reversed: bool) -> Self {
        Self {
            face,
            slot,
            reversed,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Transfer {
    pub(crate) from: GroupRef,
    pub(crate) to: GroupRef,
}

/// A directly executable basic-move transform: an optional ring rotation of
/// the turned face plus four neighbor group transfers.
#[derive(Debug, Clone)]
pub struct FaceTurn {
    pub(crate) face: Option<Face>,
    pub(crate) ring_shift: u32,
    pub(crate) transfers: [Transfer; 4],
}

/// How a move executes against the packed state. Basic moves compile to
/// [`FaceTurn`]s; derived moves (rotations and wide moves) flatten to plain
/// facelet permutations, `new[i] = old[perm[i]]`.
#[derive(Debug, Clone)]
pub enum Transform {
    Turn(FaceTurn),
    Perm(Box<[u8; FACELET_COUNT]>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CubeState([u32; 6]);

/// Nine fields each holding 0b001.
const SOLVED_FACE_UNIT: u32 = 0b001_001_001_001_001_001_001_001_001;

impl CubeState {
    #[must_use]
    pub fn solved() -> Self {
        Self(std::array::from_fn(|face| face as u32 * SOLVED_FACE_UNIT))
    }

    pub(crate) const fn zeroed() -> Self {
        Self([0; 6])
    }

    /// Color value at a flat facelet index (`face * 9 + row-major position`).
    #[must_use]
    pub fn get(&self, facelet: usize) -> u8 {
        debug_assert!(facelet < FACELET_COUNT);
        let shift = POS_TO_FIELD[facelet % FACE_SIZE] as u32 * FIELD_BITS;
        ((self.0[facelet / FACE_SIZE] >> shift) & FIELD_MASK) as u8
    }

    pub(crate) fn set(&mut self, facelet: usize, color: u8) {
        debug_assert!(facelet < FACELET_COUNT);
        debug_assert!(color < 8);
        let shift = POS_TO_FIELD[facelet % FACE_SIZE] as u32 * FIELD_BITS;
        let word = &mut self.0[facelet / FACE_SIZE];
        *word = (*word & !(FIELD_MASK << shift)) | (u32::from(color) << shift);
    }

    /// Flat color read-out, face-major and row-major within each face.
    #[must_use]
    pub fn to_facelets(&self) -> [u8; FACELET_COUNT] {
        std::array::from_fn(|i| self.get(i))
    }

    pub fn apply(&mut self, transform: &Transform) {
        match transform {
            Transform::Turn(turn) => self.apply_turn(turn),
            Transform::Perm(perm) => self.apply_perm(perm),
        }
    }

    fn apply_turn(&mut self, turn: &FaceTurn) {
        // All four groups are read before any word is written; a transfer's
        // destination face is another transfer's source face.
        let keys: [usize; 4] = std::array::from_fn(|i| self.extract_group(turn.transfers[i].from));
        if let Some(face) = turn.face {
            let word = self.0[face as usize];
            let ring = word & RING_MASK;
            let rotated =
                ((ring << turn.ring_shift) | (ring >> (RING_BITS - turn.ring_shift))) & RING_MASK;
            self.0[face as usize] = (word & !RING_MASK) | rotated;
        }
        for (key, transfer) in keys.into_iter().zip(&turn.transfers) {
            let to = transfer.to;
            let spread = &SPREAD[to.slot as usize * 2 + usize::from(to.reversed)];
            let word = &mut self.0[to.face as usize];
            *word = (*word & !SLOT_MASKS[to.slot as usize]) | spread[key];
        }
    }

    fn apply_perm(&mut self, perm: &[u8; FACELET_COUNT]) {
        let old = *self;
        for (i, &src) in perm.iter().enumerate() {
            self.set(i, old.get(src as usize));
        }
    }

    fn extract_group(&self, group: GroupRef) -> usize {
        let word = self.0[group.face as usize];
        let fields = SLOT_FIELDS[group.slot as usize];
        let mut key = 0;
        for i in 0..3 {
            let field = if group.reversed { fields[2 - i] } else { fields[i] };
            key |= (((word >> (field as u32 * FIELD_BITS)) & FIELD_MASK) as usize) << (i * 3);
        }
        key
    }
}

impl Default for CubeState {
    fn default() -> Self {
        Self::solved()
    }
}

impl fmt::Display for CubeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let facelets = self.to_facelets();
        for (face, chunk) in Face::ALL.iter().zip(facelets.chunks(FACE_SIZE)) {
            writeln!(f, "{face:?}: {}", chunk.iter().join(""))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solved_colors() {
        let solved = CubeState::solved();
        for facelet in 0..FACELET_COUNT {
            assert_eq!(solved.get(facelet), (facelet / FACE_SIZE) as u8);
        }
    }

    #[test]
    fn test_set_get_round_trip() {
        let mut state = CubeState::zeroed();
        for facelet in 0..FACELET_COUNT {
            let color = (facelet % COLOR_COUNT as usize) as u8;
            state.set(facelet, color);
            assert_eq!(state.get(facelet), color);
        }
        // Later writes must not have clobbered earlier fields.
        for facelet in 0..FACELET_COUNT {
            assert_eq!(state.get(facelet), (facelet % COLOR_COUNT as usize) as u8);
        }
    }

    #[test]
    fn test_extract_spread_round_trip() {
        let mut state = CubeState::zeroed();
        for (pos, color) in [3, 1, 4, 1, 5, 0, 2, 6, 5].into_iter().enumerate() {
            state.set(pos, color);
        }
        let word = state.0[0];
        for slot in [
            Slot::Top,
            Slot::Right,
            Slot::Bottom,
            Slot::Left,
            Slot::Equator,
            Slot::Middle,
        ] {
            for reversed in [false, true] {
                let key = state.extract_group(GroupRef::new(Face::U, slot, reversed));
                let spread = SPREAD[slot as usize * 2 + usize::from(reversed)][key];
                assert_eq!(spread, word & SLOT_MASKS[slot as usize]);
            }
        }
    }

    #[test]
    fn test_reversed_extraction_mirrors() {
        let mut state = CubeState::zeroed();
        state.set(0, 1);
        state.set(1, 2);
        state.set(2, 3);
        let forward = state.extract_group(GroupRef::new(Face::U, Slot::Top, false));
        let backward = state.extract_group(GroupRef::new(Face::U, Slot::Top, true));
        assert_eq!(forward, 0b011_010_001);
        assert_eq!(backward, 0b001_010_011);
    }

    #[test]
    fn test_display_solved() {
        let rendered = CubeState::solved().to_string();
        assert!(rendered.contains("U: 000000000"));
        assert!(rendered.contains("D: 555555555"));
    }
}
