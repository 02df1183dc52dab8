use cube_pattern_solver::{CubeState, Face, Goal, MoveTables, PatternSolver};

const FACE_SIZE: usize = 9;
const BASIC_MOVE_COUNT: usize = 27;

fn matches(state: &CubeState, goal: &Goal) -> bool {
    goal.values()
        .iter()
        .enumerate()
        .all(|(j, &want)| state.get(goal.face() as usize * FACE_SIZE + j) == want)
}

fn notation_of(sequence: &[&cube_pattern_solver::Move]) -> String {
    sequence
        .iter()
        .map(|mv| mv.name())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Exhaustively checks whether some basic-move sequence of exactly
/// `remaining` moves takes `state` to a match, without any pruning or
/// redundancy filtering.
fn exists_sequence(tables: &MoveTables, state: CubeState, goal: &Goal, remaining: usize) -> bool {
    if remaining == 0 {
        return matches(&state, goal);
    }
    tables.moves()[..BASIC_MOVE_COUNT].iter().any(|mv| {
        let mut next = state;
        tables.apply(&mut next, mv.name()).unwrap();
        exists_sequence(tables, next, goal, remaining - 1)
    })
}

fn shortest_within(tables: &MoveTables, state: CubeState, goal: &Goal, cap: usize) -> Option<usize> {
    (0..=cap).find(|&len| exists_sequence(tables, state, goal, len))
}

fn random_scramble(tables: &MoveTables, rng: &mut fastrand::Rng, len: usize) -> CubeState {
    let mut state = CubeState::solved();
    for _ in 0..len {
        let mv = &tables.moves()[rng.usize(0..BASIC_MOVE_COUNT)];
        tables.apply(&mut state, mv.name()).unwrap();
    }
    state
}

#[test_log::test]
fn test_minimality_matches_exhaustive_search() {
    let solver = PatternSolver::new().unwrap();
    let tables = solver.move_tables();
    let mut rng = fastrand::Rng::with_seed(2024);
    let goals = [
        Goal::prefix(&[0; 9]).unwrap(),
        Goal::prefix(&[0, 0, 0]).unwrap(),
        Goal::new(Face::R, &[3, 3, 3]).unwrap(),
    ];
    for scramble_len in 0..=3 {
        for trial in 0..4 {
            let scramble = random_scramble(tables, &mut rng, scramble_len);
            for goal in &goals {
                // Undoing the scramble restores everything, so the true
                // distance is within reach of the exhaustive check.
                let truth = shortest_within(tables, scramble, goal, scramble_len)
                    .unwrap_or_else(|| panic!("unreachable goal at length {scramble_len}"));
                let mut state = scramble;
                let sequence = solver.solve_toward(&mut state, goal).unwrap();
                assert_eq!(
                    sequence.len(),
                    truth,
                    "trial {trial}, scramble length {scramble_len}, goal {goal:?}, got {}",
                    notation_of(&sequence)
                );
                assert!(matches(&state, goal));

                // The returned notation reproduces the same end state.
                let mut replayed = scramble;
                tables.apply(&mut replayed, &notation_of(&sequence)).unwrap();
                assert_eq!(replayed, state);
            }
        }
    }
}

#[test_log::test]
fn test_deterministic_sequences() {
    let solver = PatternSolver::new().unwrap();
    let tables = solver.move_tables();
    let goal = Goal::prefix(&[0; 9]).unwrap();
    let mut scramble = CubeState::solved();
    tables.apply(&mut scramble, "F M2 D'").unwrap();

    let mut first_state = scramble;
    let first = solver.solve_toward(&mut first_state, &goal).unwrap();
    let mut second_state = scramble;
    let second = solver.solve_toward(&mut second_state, &goal).unwrap();
    assert_eq!(notation_of(&first), notation_of(&second));
    assert_eq!(first_state, second_state);
}

#[test_log::test]
fn test_chained_goals_continue_from_previous_state() {
    let solver = PatternSolver::new().unwrap();
    let mut state = CubeState::solved();

    let first_goal = Goal::new(Face::R, &[0, 3, 3]).unwrap();
    let first = solver.solve_toward(&mut state, &first_goal).unwrap();
    assert_eq!(first.len(), 1);
    assert!(matches(&state, &first_goal));

    // The second chunk starts where the first sequence left the cube.
    let second_goal = Goal::new(Face::R, &[3, 3, 3]).unwrap();
    let second = solver.solve_toward(&mut state, &second_goal).unwrap();
    assert_eq!(second.len(), 1);
    assert!(matches(&state, &second_goal));
}

#[test_log::test]
fn test_t_perm_has_order_two() {
    let solver = PatternSolver::new().unwrap();
    let tables = solver.move_tables();
    let t_perm = "R U R' U' R' F R2 U' R' U' R U R' F'";

    let mut state = CubeState::solved();
    tables.apply(&mut state, t_perm).unwrap();
    assert_ne!(state, CubeState::solved());
    // The permutation only rearranges top-layer pieces among themselves, so
    // the top face stays uniformly colored.
    for pos in 0..FACE_SIZE {
        assert_eq!(state.get(pos), 0);
    }

    tables.apply(&mut state, t_perm).unwrap();
    assert_eq!(state, CubeState::solved());
}

#[test_log::test]
fn test_goal_on_scrambled_colors() {
    // A goal can ask for any color arrangement, not just the solved one.
    let solver = PatternSolver::new().unwrap();
    let tables = solver.move_tables();
    let mut state = CubeState::solved();
    tables.apply(&mut state, "U").unwrap();

    // After U the front top row shows the right face's color.
    let goal = Goal::new(Face::F, &[3, 3, 3]).unwrap();
    let sequence = solver.solve_toward(&mut state, &goal).unwrap();
    assert!(sequence.is_empty());

    // Asking for the left face's color there instead takes a half turn of
    // the top layer, and nothing shorter.
    let goal = Goal::new(Face::F, &[1, 1, 1]).unwrap();
    let sequence = solver.solve_toward(&mut state, &goal).unwrap();
    assert_eq!(sequence.len(), 1);
    assert!(matches(&state, &goal));
}
