//! An optimal pattern solver for the 3x3 cube.
//!
//! The crate answers one question: starting from a reachable cube state, what
//! is the shortest move sequence whose result matches a target color pattern
//! on a prefix of one face? The building blocks are a bit-packed facelet
//! state ([`puzzle`]), a move table compiler that expands nine physical
//! generators into the full notation vocabulary ([`moves`]), an admissible
//! lower-bound table over mismatch masks ([`pruning`]), and an IDA* search
//! engine ([`solver`]).
//!
//! Everything is built once into a [`solver::PatternSolver`] context and
//! shared by reference; there is no global mutable state and no allocation
//! inside the search loop.

#![warn(clippy::pedantic)]
#![allow(
    clippy::similar_names,
    clippy::too_many_lines,
    clippy::cast_possible_truncation
)]

pub(crate) mod canonical_fsm;
pub mod moves;
pub mod pruning;
pub mod puzzle;
pub mod solver;

pub use moves::{Move, MoveCompileError, MoveTables, NotationError};
pub use puzzle::{CubeState, Face};
pub use solver::{Goal, GoalError, PatternSolver, SearchError};

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
