//! Iterative deepening A* over basic moves, driven by the mismatch lower
//! bound table and the canonical sequence filter.

use crate::canonical_fsm::{CanonicalFsm, FsmState};
use crate::moves::{Move, MoveCompileError, MoveTables};
use crate::pruning::PruneTable;
use crate::puzzle::{CubeState, Face, Transform, COLOR_COUNT, FACE_SIZE};
use crate::{start, success, working};
use log::{debug, info, log_enabled, Level};
use std::time::Instant;
use thiserror::Error;

const DEFAULT_MAX_DEPTH: u32 = 24;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GoalError {
    #[error("a goal covers at most {limit} positions, got {actual}")]
    TooManyPositions { limit: usize, actual: usize },
    #[error("color value {0} is out of range")]
    ValueOutOfRange(u8),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SearchError {
    #[error("no matching sequence within {cap} moves")]
    DepthCapExceeded { cap: u32 },
}

/// A target color pattern on a row-major prefix of one face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    face: Face,
    values: Vec<u8>,
}

impl Goal {
    pub fn new(face: Face, values: &[u8]) -> Result<Self, GoalError> {
        if values.len() > FACE_SIZE {
            return Err(GoalError::TooManyPositions {
                limit: FACE_SIZE,
                actual: values.len(),
            });
        }
        if let Some(&bad) = values.iter().find(|&&value| value >= COLOR_COUNT) {
            return Err(GoalError::ValueOutOfRange(bad));
        }
        Ok(Self {
            face,
            values: values.to_vec(),
        })
    }

    /// A goal on the up face, the common case for pattern chaining.
    pub fn prefix(values: &[u8]) -> Result<Self, GoalError> {
        Self::new(Face::U, values)
    }

    #[must_use]
    pub fn face(&self) -> Face {
        self.face
    }

    #[must_use]
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    /// Bit `j` set when row-major position `j` of the goal face disagrees
    /// with the wanted value. Positions past the prefix never mismatch.
    fn mismatch_mask(&self, state: &CubeState) -> u16 {
        let base = self.face as usize * FACE_SIZE;
        let mut mask = 0;
        for (j, &want) in self.values.iter().enumerate() {
            if state.get(base + j) != want {
                mask |= 1 << j;
            }
        }
        mask
    }
}

/// Scoped move application. The move is applied on construction and its
/// inverse on scope exit, so no branch can leak a mutation no matter how it
/// returns.
struct AppliedMove<'s> {
    state: &'s mut CubeState,
    inverse: &'s Transform,
}

impl<'s> AppliedMove<'s> {
    fn new(state: &'s mut CubeState, forward: &Transform, inverse: &'s Transform) -> Self {
        state.apply(forward);
        Self { state, inverse }
    }
}

impl Drop for AppliedMove<'_> {
    fn drop(&mut self) {
        self.state.apply(self.inverse);
    }
}

struct SearchScratch<'a> {
    solution: Vec<&'a Move>,
    nodes: u64,
    count_nodes: bool,
}

/// Shared search context: compiled moves, the sequence filter, and the lower
/// bound table. Build it once and solve any number of goals with it.
pub struct PatternSolver {
    tables: MoveTables,
    canonical_fsm: CanonicalFsm,
    prune_table: PruneTable,
    max_depth: u32,
}

impl PatternSolver {
    pub fn new() -> Result<Self, MoveCompileError> {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: u32) -> Result<Self, MoveCompileError> {
        debug!(start!("Compiling the move tables"));
        let start_time = Instant::now();
        let tables = MoveTables::compile()?;
        let canonical_fsm = CanonicalFsm::build(&tables)?;
        let prune_table = PruneTable::generate();
        info!(
            success!("Built the solver context in {:?}"),
            start_time.elapsed()
        );
        Ok(Self {
            tables,
            canonical_fsm,
            prune_table,
            max_depth,
        })
    }

    #[must_use]
    pub fn move_tables(&self) -> &MoveTables {
        &self.tables
    }

    /// Finds a minimal basic-move sequence taking `state` to a state matching
    /// `goal`. On success the moves have been applied to `state`, so chained
    /// calls continue where the previous sequence ended; on failure `state`
    /// is unchanged.
    pub fn solve_toward(
        &self,
        state: &mut CubeState,
        goal: &Goal,
    ) -> Result<Vec<&Move>, SearchError> {
        let start_time = Instant::now();
        let mut scratch = SearchScratch {
            solution: Vec::with_capacity(self.max_depth as usize),
            nodes: 0,
            count_nodes: log_enabled!(Level::Debug),
        };
        let root_bound = u32::from(self.prune_table.lower_bound(goal.mismatch_mask(state)));
        for bound in root_bound..=self.max_depth {
            debug!(working!("Searching at bound {}"), bound);
            if self.search(state, goal, CanonicalFsm::START, bound, &mut scratch) {
                // The search itself unwinds every application, so the found
                // sequence is replayed onto the caller's state here.
                for mv in &scratch.solution {
                    state.apply(&mv.transform);
                }
                info!(
                    success!("Matched the goal with {} moves in {:?}"),
                    scratch.solution.len(),
                    start_time.elapsed()
                );
                if scratch.count_nodes {
                    debug!(working!("Visited {} search nodes"), scratch.nodes);
                }
                return Ok(scratch.solution);
            }
        }
        Err(SearchError::DepthCapExceeded {
            cap: self.max_depth,
        })
    }

    fn search<'a>(
        &'a self,
        state: &mut CubeState,
        goal: &Goal,
        fsm_state: FsmState,
        remaining: u32,
        scratch: &mut SearchScratch<'a>,
    ) -> bool {
        if scratch.count_nodes {
            scratch.nodes += 1;
        }
        let mask = goal.mismatch_mask(state);
        if remaining == 0 {
            return mask == 0;
        }
        if u32::from(self.prune_table.lower_bound(mask)) > remaining {
            return false;
        }
        for mv in self.tables.search_moves() {
            let Some(next_fsm_state) = self.canonical_fsm.next_state(fsm_state, mv.class_index)
            else {
                continue;
            };
            scratch.solution.push(mv);
            let matched = {
                let mut applied = AppliedMove::new(
                    state,
                    &mv.transform,
                    &self.tables.inverse_of(mv).transform,
                );
                self.search(&mut *applied.state, goal, next_fsm_state, remaining - 1, scratch)
            };
            if matched {
                return true;
            }
            scratch.solution.pop();
        }
        false
    }
}
