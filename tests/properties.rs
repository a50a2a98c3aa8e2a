use std::collections::VecDeque;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use maze_search::algorithms::Algorithm;
use maze_search::algorithms::run_all;
use maze_search::algorithms::solve;
use maze_search::heuristics::Heuristic;
use maze_search::problems::generators::GeneratorKind;
use maze_search::problems::generators::SolverConfig;
use maze_search::problems::maze_2d::Endpoint;
use maze_search::problems::maze_2d::EndpointReason;
use maze_search::problems::maze_2d::Maze2DCell;
use maze_search::problems::maze_2d::Maze2DProblem;
use maze_search::problems::maze_2d::Maze2DProblemError;
use maze_search::problems::maze_2d::Maze2DSpace;
use maze_search::problems::maze_2d::Maze2DState;
use maze_search::search::TraceObserver;
use maze_search::space::Problem;
use maze_search::space::Space;

/// Every algorithm worth checking, including heuristics left out of the
/// line-up.
fn every_algorithm() -> Vec<Algorithm> {
    let mut all = Algorithm::lineup().to_vec();
    all.push(Algorithm::AStar(Heuristic::Chebyshev));
    all.push(Algorithm::Greedy(Heuristic::Euclidean));
    all.push(Algorithm::Greedy(Heuristic::Chebyshev));
    all
}

/// Shortest number of steps between the endpoints, walking the grid by hand.
fn oracle(problem: &Maze2DProblem) -> Option<usize> {
    let space = problem.space();
    let (rows, cols) = space.dimensions();
    let open = |r: usize, c: usize| {
        space.cell(&Maze2DState::new_from_usize(r, c).unwrap()) == Some(Maze2DCell::Empty)
    };
    let at = |s: Maze2DState| (s.row as usize, s.col as usize);
    let (start, goal) = (at(problem.start()), at(problem.goal()));

    let mut distance = vec![vec![usize::MAX; cols]; rows];
    let mut queue = VecDeque::from([start]);
    distance[start.0][start.1] = 0;
    while let Some((r, c)) = queue.pop_front() {
        if (r, c) == goal {
            return Some(distance[r][c]);
        }
        let d = distance[r][c];
        let mut next = vec![];
        if r > 0 {
            next.push((r - 1, c));
        }
        if r + 1 < rows {
            next.push((r + 1, c));
        }
        if c > 0 {
            next.push((r, c - 1));
        }
        if c + 1 < cols {
            next.push((r, c + 1));
        }
        for (nr, nc) in next {
            if open(nr, nc) && distance[nr][nc] == usize::MAX {
                distance[nr][nc] = d + 1;
                queue.push_back((nr, nc));
            }
        }
    }
    None
}

/// Seeded random mazes of assorted shapes, some of them unsolvable.
fn mazes(count: u64) -> Vec<Maze2DProblem> {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    (0..count)
        .map(|seed| {
            let config = SolverConfig {
                rows: rng.random_range(5..25),
                cols: rng.random_range(5..25),
                generator: match seed % 3 {
                    0 => GeneratorKind::RandomWalls,
                    1 => GeneratorKind::Perfect,
                    _ => GeneratorKind::Rooms,
                },
                wall_probability: 0.3,
                seed,
                ..SolverConfig::default()
            };
            config.generate().unwrap()
        })
        .collect()
}

#[test]
fn optimal_algorithms_match_the_oracle() {
    for problem in mazes(60) {
        let expected = oracle(&problem);
        for algorithm in every_algorithm().into_iter().filter(Algorithm::is_optimal) {
            let result = solve(&problem, algorithm, &mut ());
            assert_eq!(
                result.path.as_ref().map(|p| p.steps()),
                expected,
                "{algorithm} on\n{problem}"
            );
        }
    }
}

#[test]
fn every_algorithm_is_complete() {
    for problem in mazes(60) {
        let expected = oracle(&problem);
        for algorithm in every_algorithm() {
            let result = solve(&problem, algorithm, &mut ());
            assert_eq!(result.path_found(), expected.is_some(), "{algorithm}");
            if let (Some(path), Some(shortest)) = (&result.path, expected) {
                assert!(path.steps() >= shortest, "{algorithm}");
            }
        }
    }
}

#[test]
fn paths_are_walkable_and_connected() {
    for problem in mazes(40) {
        for result in run_all(&problem) {
            let Some(path) = result.path else {
                continue;
            };
            assert_eq!(path.start(), problem.start(), "{}", result.algorithm);
            assert_eq!(path.end(), problem.goal(), "{}", result.algorithm);
            assert!(
                problem.space().valid_path(&path),
                "{} returned {path}",
                result.algorithm
            );
            assert!(result.nodes_explored >= 1);
        }
    }
}

#[test]
fn runs_are_deterministic() {
    for problem in mazes(20) {
        for algorithm in every_algorithm() {
            let mut trace_a = TraceObserver::new();
            let mut trace_b = TraceObserver::new();
            let a = solve(&problem, algorithm, &mut trace_a);
            let b = solve(&problem, algorithm, &mut trace_b);
            assert_eq!(a.path, b.path, "{algorithm}");
            assert_eq!(a.nodes_explored, b.nodes_explored, "{algorithm}");
            assert_eq!(a.max_frontier_size, b.max_frontier_size, "{algorithm}");
            assert_eq!(a.memory_bytes, b.memory_bytes, "{algorithm}");

            assert_eq!(trace_a.expanded, trace_b.expanded, "{algorithm}");
            assert_eq!(trace_a.discovered, trace_b.discovered, "{algorithm}");
            assert_eq!(trace_a.expanded.len(), a.nodes_explored, "{algorithm}");
        }
    }
}

#[test]
fn start_on_the_goal() {
    let space = Maze2DSpace::new_walled(6, 6).unwrap();
    let s = Maze2DState::new(2, 3);
    let problem = Maze2DProblem::new(space, s, s).unwrap();
    for algorithm in every_algorithm() {
        let result = solve(&problem, algorithm, &mut ());
        let path = result.path.unwrap();
        assert_eq!(path.states(), &[s], "{algorithm}");
        assert_eq!(result.nodes_explored, 1, "{algorithm}");
    }
}

#[test]
fn invalid_endpoints_are_rejected() {
    let space = Maze2DSpace::new_walled(5, 5).unwrap();
    let inside = Maze2DState::new(2, 2);

    let err = Maze2DProblem::new(space.clone(), Maze2DState::new(0, 0), inside).unwrap_err();
    assert!(matches!(
        err,
        Maze2DProblemError::InvalidEndpoint {
            which: Endpoint::Start,
            reason: EndpointReason::Blocked,
            ..
        }
    ));

    let err = Maze2DProblem::new(space, inside, Maze2DState::new(9, 2)).unwrap_err();
    assert!(matches!(
        err,
        Maze2DProblemError::InvalidEndpoint {
            which: Endpoint::Goal,
            reason: EndpointReason::OutOfBounds,
            ..
        }
    ));
}
