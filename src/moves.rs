//! Move table compilation: nine physical generators expand into the full
//! 54-entry notation vocabulary.
//!
//! Basic moves (face turns and slice turns) compile to [`FaceTurn`] transforms
//! that execute directly against the packed words. Derived moves (whole-cube
//! rotations and wide turns) are declared as short basic-move recipes and
//! flattened at compile time into facelet permutations, so applying `x` costs
//! the same as applying any other single move.

use crate::puzzle::{
    CubeState, Face, FaceTurn, GroupRef, QUARTER_SHIFT, Slot, Transfer, Transform, FACELET_COUNT,
};
use std::fmt;
use thiserror::Error;

/// Rotation axis of a move. Two moves commute exactly when they share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

pub(crate) const CLASS_COUNT: usize = 9;

/// Moves eligible during search: the three twists of each basic class.
pub(crate) const SEARCH_MOVE_COUNT: usize = CLASS_COUNT * 3;

struct GeneratorDef {
    class: &'static str,
    face: Option<Face>,
    axis: Axis,
    /// Neighbor groups in clockwise transfer order: a quarter twist sends
    /// `cycle[i]` to `cycle[i + 1]`. Each group carries its own reading
    /// direction so that facelet order is preserved through every hand-off.
    cycle: [GroupRef; 4],
}

const GENERATORS: [GeneratorDef; CLASS_COUNT] = [
    GeneratorDef {
        class: "U",
        face: Some(Face::U),
        axis: Axis::Y,
        cycle: [
            GroupRef::new(Face::F, Slot::Top, false),
            GroupRef::new(Face::L, Slot::Top, false),
            GroupRef::new(Face::B, Slot::Top, false),
            GroupRef::new(Face::R, Slot::Top, false),
        ],
    },
    GeneratorDef {
        class: "L",
        face: Some(Face::L),
        axis: Axis::X,
        cycle: [
            GroupRef::new(Face::U, Slot::Left, false),
            GroupRef::new(Face::F, Slot::Left, false),
            GroupRef::new(Face::D, Slot::Left, false),
            GroupRef::new(Face::B, Slot::Right, false),
        ],
    },
    GeneratorDef {
        class: "F",
        face: Some(Face::F),
        axis: Axis::Z,
        cycle: [
            GroupRef::new(Face::U, Slot::Bottom, false),
            GroupRef::new(Face::R, Slot::Left, false),
            GroupRef::new(Face::D, Slot::Top, false),
            GroupRef::new(Face::L, Slot::Right, false),
        ],
    },
    GeneratorDef {
        class: "R",
        face: Some(Face::R),
        axis: Axis::X,
        cycle: [
            GroupRef::new(Face::F, Slot::Right, false),
            GroupRef::new(Face::U, Slot::Right, false),
            GroupRef::new(Face::B, Slot::Left, false),
            GroupRef::new(Face::D, Slot::Right, false),
        ],
    },
    GeneratorDef {
        class: "B",
        face: Some(Face::B),
        axis: Axis::Z,
        cycle: [
            GroupRef::new(Face::U, Slot::Top, false),
            GroupRef::new(Face::L, Slot::Left, false),
            GroupRef::new(Face::D, Slot::Bottom, false),
            GroupRef::new(Face::R, Slot::Right, false),
        ],
    },
    GeneratorDef {
        class: "D",
        face: Some(Face::D),
        axis: Axis::Y,
        cycle: [
            GroupRef::new(Face::F, Slot::Bottom, false),
            GroupRef::new(Face::R, Slot::Bottom, false),
            GroupRef::new(Face::B, Slot::Bottom, false),
            GroupRef::new(Face::L, Slot::Bottom, false),
        ],
    },
    GeneratorDef {
        class: "M",
        face: None,
        axis: Axis::X,
        cycle: [
            GroupRef::new(Face::U, Slot::Middle, false),
            GroupRef::new(Face::F, Slot::Middle, false),
            GroupRef::new(Face::D, Slot::Middle, false),
            GroupRef::new(Face::B, Slot::Middle, true),
        ],
    },
    GeneratorDef {
        class: "E",
        face: None,
        axis: Axis::Y,
        cycle: [
            GroupRef::new(Face::F, Slot::Equator, false),
            GroupRef::new(Face::R, Slot::Equator, false),
            GroupRef::new(Face::B, Slot::Equator, false),
            GroupRef::new(Face::L, Slot::Equator, false),
        ],
    },
    GeneratorDef {
        class: "S",
        face: None,
        axis: Axis::Z,
        cycle: [
            GroupRef::new(Face::U, Slot::Equator, false),
            GroupRef::new(Face::R, Slot::Middle, false),
            GroupRef::new(Face::D, Slot::Equator, true),
            GroupRef::new(Face::L, Slot::Middle, true),
        ],
    },
];

/// Derived moves as basic-move recipes, with the axis they rotate about.
const DERIVED: [(&str, &str, Axis); 9] = [
    ("x", "L' M' R", Axis::X),
    ("y", "U E' D'", Axis::Y),
    ("z", "F S B'", Axis::Z),
    ("u", "U E'", Axis::Y),
    ("l", "L M", Axis::X),
    ("f", "F S", Axis::Z),
    ("r", "R M'", Axis::X),
    ("b", "B S'", Axis::Z),
    ("d", "D E", Axis::Y),
];

#[derive(Error, Debug)]
pub enum MoveCompileError {
    #[error("derived move {name} references unknown basic token {token:?}")]
    UnknownBasicToken { name: &'static str, token: String },
    #[error("move classes {a} and {b} contradict their axis assignment")]
    AxisCommutationMismatch { a: &'static str, b: &'static str },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NotationError {
    #[error("unknown move token {0:?}")]
    UnknownToken(String),
}

#[derive(Debug)]
pub struct Move {
    name: String,
    pub(crate) transform: Transform,
    pub(crate) class_index: usize,
    pub(crate) axis: Axis,
    pub(crate) inverse_index: usize,
}

impl Move {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn variant_name(class: &str, twist: usize) -> String {
    match twist {
        1 => class.to_string(),
        2 => format!("{class}2"),
        _ => format!("{class}'"),
    }
}

/// Recovers the flat facelet permutation a transform performs by pushing a
/// one-hot probe through it from every source position. Exactly one facelet
/// is lit per probe, so the scan over destinations never misses.
fn extract_perm(transform: &Transform) -> [u8; FACELET_COUNT] {
    let mut perm = [0u8; FACELET_COUNT];
    for src in 0..FACELET_COUNT {
        let mut probe = CubeState::zeroed();
        probe.set(src, 1);
        probe.apply(transform);
        for dst in 0..FACELET_COUNT {
            if probe.get(dst) == 1 {
                perm[dst] = src as u8;
            }
        }
    }
    perm
}

/// Permutation of `first` followed by `second`, in application order.
pub(crate) fn compose(
    first: &[u8; FACELET_COUNT],
    second: &[u8; FACELET_COUNT],
) -> [u8; FACELET_COUNT] {
    std::array::from_fn(|i| first[second[i] as usize])
}

fn invert(perm: &[u8; FACELET_COUNT]) -> [u8; FACELET_COUNT] {
    let mut inverse = [0u8; FACELET_COUNT];
    for (i, &src) in perm.iter().enumerate() {
        inverse[src as usize] = i as u8;
    }
    inverse
}

fn basic_move_index(token: &str) -> Option<usize> {
    let (class_str, twist) = if let Some(base) = token.strip_suffix('\'') {
        (base, 3)
    } else if let Some(base) = token.strip_suffix('2') {
        (base, 2)
    } else {
        (token, 1)
    };
    let class = GENERATORS.iter().position(|def| def.class == class_str)?;
    Some(class * 3 + twist - 1)
}

/// The compiled move vocabulary: 27 basic moves followed by 27 derived moves,
/// each class laid out as `[quarter, double, counterclockwise]`.
pub struct MoveTables {
    moves: Vec<Move>,
    /// Quarter-turn permutation of each basic class, kept for the
    /// commutation audit of the redundancy filter.
    pub(crate) quarter_perms: [[u8; FACELET_COUNT]; CLASS_COUNT],
}

impl MoveTables {
    pub fn compile() -> Result<Self, MoveCompileError> {
        let mut moves = Vec::with_capacity(SEARCH_MOVE_COUNT + DERIVED.len() * 3);
        for (class_index, def) in GENERATORS.iter().enumerate() {
            for twist in 1..=3usize {
                let transfers: [Transfer; 4] = std::array::from_fn(|i| Transfer {
                    from: def.cycle[i],
                    to: def.cycle[(i + twist) % 4],
                });
                moves.push(Move {
                    name: variant_name(def.class, twist),
                    transform: Transform::Turn(FaceTurn {
                        face: def.face,
                        ring_shift: QUARTER_SHIFT * twist as u32,
                        transfers,
                    }),
                    class_index,
                    axis: def.axis,
                    inverse_index: class_index * 3 + (4 - twist) - 1,
                });
            }
        }

        let mut basic_perms = [[0u8; FACELET_COUNT]; SEARCH_MOVE_COUNT];
        for (perm, mv) in basic_perms.iter_mut().zip(&moves) {
            *perm = extract_perm(&mv.transform);
        }

        for (offset, &(name, recipe, axis)) in DERIVED.iter().enumerate() {
            let mut base: [u8; FACELET_COUNT] = std::array::from_fn(|i| i as u8);
            for token in recipe.split_whitespace() {
                let index =
                    basic_move_index(token).ok_or_else(|| MoveCompileError::UnknownBasicToken {
                        name,
                        token: token.to_string(),
                    })?;
                base = compose(&base, &basic_perms[index]);
            }
            let class_index = CLASS_COUNT + offset;
            for twist in 1..=3usize {
                let perm = match twist {
                    1 => base,
                    2 => compose(&base, &base),
                    _ => invert(&base),
                };
                moves.push(Move {
                    name: variant_name(name, twist),
                    transform: Transform::Perm(Box::new(perm)),
                    class_index,
                    axis,
                    inverse_index: SEARCH_MOVE_COUNT + offset * 3 + (4 - twist) - 1,
                });
            }
        }

        let mut quarter_perms = [[0u8; FACELET_COUNT]; CLASS_COUNT];
        for (class, perm) in quarter_perms.iter_mut().enumerate() {
            *perm = basic_perms[class * 3];
        }

        Ok(Self {
            moves,
            quarter_perms,
        })
    }

    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// The basic moves, in search ordering.
    pub(crate) fn search_moves(&self) -> &[Move] {
        &self.moves[..SEARCH_MOVE_COUNT]
    }

    #[must_use]
    pub fn find_move(&self, name: &str) -> Option<&Move> {
        self.moves.iter().find(|mv| mv.name == name)
    }

    pub(crate) fn inverse_of(&self, mv: &Move) -> &Move {
        &self.moves[mv.inverse_index]
    }

    pub(crate) fn class_axis(class: usize) -> Axis {
        GENERATORS[class].axis
    }

    pub(crate) fn class_name(class: usize) -> &'static str {
        GENERATORS[class].class
    }

    /// Resolves whitespace-separated notation into move references. The whole
    /// sequence resolves or nothing does, so callers can apply atomically.
    pub fn resolve(&self, notation: &str) -> Result<Vec<&Move>, NotationError> {
        notation
            .split_whitespace()
            .map(|token| {
                self.find_move(token)
                    .ok_or_else(|| NotationError::UnknownToken(token.to_string()))
            })
            .collect()
    }

    /// Applies a notation sequence to the state. The state is untouched if
    /// any token fails to resolve.
    pub fn apply(&self, state: &mut CubeState, notation: &str) -> Result<(), NotationError> {
        for mv in self.resolve(notation)? {
            state.apply(&mv.transform);
        }
        Ok(())
    }

    /// Applies the inverse of a notation sequence: inverse moves in reverse
    /// order.
    pub fn apply_inverse(
        &self,
        state: &mut CubeState,
        notation: &str,
    ) -> Result<(), NotationError> {
        for mv in self.resolve(notation)?.into_iter().rev() {
            state.apply(&self.inverse_of(mv).transform);
        }
        Ok(())
    }
}
