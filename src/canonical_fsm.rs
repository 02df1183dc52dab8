//! Redundancy filter over basic-move sequences.
//!
//! Moves on the same axis commute, so any same-axis run of a sequence can be
//! reordered without changing the composed permutation. The search therefore
//! only emits the representative ordering in which same-axis runs carry
//! strictly increasing class indices; every other ordering is a duplicate of
//! one it already visits. Repeating a class inside a run is likewise filtered
//! since the pair collapses into a single twist of that class.
//!
//! The filter is a small finite state machine: one start state plus one state
//! per class, remembering which class a run currently ends in.

use crate::moves::{compose, MoveCompileError, MoveTables, CLASS_COUNT};

const STATE_COUNT: usize = CLASS_COUNT + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FsmState(usize);

pub(crate) struct CanonicalFsm {
    next_state_lookup: [[Option<FsmState>; CLASS_COUNT]; STATE_COUNT],
}

impl CanonicalFsm {
    pub(crate) const START: FsmState = FsmState(0);

    /// Builds the filter from the class axis assignment, after auditing that
    /// assignment against the compiled quarter-turn permutations: two classes
    /// must commute exactly when they share an axis, or the filter would
    /// discard sequences that are not actually redundant.
    pub(crate) fn build(tables: &MoveTables) -> Result<Self, MoveCompileError> {
        for a in 0..CLASS_COUNT {
            for b in (a + 1)..CLASS_COUNT {
                let ab = compose(&tables.quarter_perms[a], &tables.quarter_perms[b]);
                let ba = compose(&tables.quarter_perms[b], &tables.quarter_perms[a]);
                let same_axis = MoveTables::class_axis(a) == MoveTables::class_axis(b);
                if (ab == ba) != same_axis {
                    return Err(MoveCompileError::AxisCommutationMismatch {
                        a: MoveTables::class_name(a),
                        b: MoveTables::class_name(b),
                    });
                }
            }
        }

        let mut next_state_lookup = [[None; CLASS_COUNT]; STATE_COUNT];
        for (state, row) in next_state_lookup.iter_mut().enumerate() {
            for (class, entry) in row.iter_mut().enumerate() {
                let allowed = match state.checked_sub(1) {
                    None => true,
                    Some(last) => {
                        MoveTables::class_axis(last) != MoveTables::class_axis(class)
                            || class > last
                    }
                };
                if allowed {
                    *entry = Some(FsmState(class + 1));
                }
            }
        }
        Ok(Self { next_state_lookup })
    }

    pub(crate) fn next_state(&self, state: FsmState, class: usize) -> Option<FsmState> {
        self.next_state_lookup[state.0][class]
    }
}
