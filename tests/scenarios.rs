use std::path::PathBuf;

use indoc::indoc;

use maze_search::algorithms::Algorithm;
use maze_search::algorithms::run_all;
use maze_search::algorithms::solve;
use maze_search::heuristics::Heuristic;
use maze_search::metrics::Comparator;
use maze_search::metrics::Metric;
use maze_search::metrics::ResultRecord;
use maze_search::metrics::export_csv;
use maze_search::metrics::export_json;
use maze_search::problems::generators::GeneratorKind;
use maze_search::problems::generators::SolverConfig;
use maze_search::problems::maze_2d::Maze2DProblem;
use maze_search::problems::maze_2d::Maze2DSpace;
use maze_search::problems::maze_2d::Maze2DState;
use maze_search::space::Space;

fn maze_file(name: &str) -> Maze2DProblem {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data/mazes")
        .join(name);
    Maze2DProblem::try_from(path.as_path()).unwrap()
}

#[test]
fn small_room() {
    for space in [
        Maze2DSpace::new_empty(5, 5).unwrap(),
        Maze2DSpace::new_walled(5, 5).unwrap(),
    ] {
        let problem =
            Maze2DProblem::new(space, Maze2DState::new(1, 1), Maze2DState::new(3, 3)).unwrap();

        let bfs = solve(&problem, Algorithm::Bfs, &mut ());
        let astar = solve(&problem, Algorithm::AStar(Heuristic::Manhattan), &mut ());
        assert_eq!(bfs.path_length(), 5);
        assert_eq!(astar.path_length(), 5);
        assert!(astar.nodes_explored <= bfs.nodes_explored);
    }
}

#[test]
fn small_walled_room_explores_every_cell_with_bfs() {
    let space = Maze2DSpace::new_walled(5, 5).unwrap();
    let problem =
        Maze2DProblem::new(space, Maze2DState::new(1, 1), Maze2DState::new(3, 3)).unwrap();
    // (3,3) is the only cell 4 steps away.
    assert_eq!(solve(&problem, Algorithm::Bfs, &mut ()).nodes_explored, 9);
}

#[test]
fn separated_endpoints() {
    let problem = Maze2DProblem::try_from(indoc! {"
        S..#...
        ...#...
        ...#..G
    "})
    .unwrap();
    for result in run_all(&problem) {
        assert!(result.path.is_none(), "{}", result.algorithm);
        assert_eq!(result.path_length(), 0);
        assert!(result.nodes_explored >= 1);
    }

    let walled_off = maze_file("walled_off.txt");
    assert!(run_all(&walled_off).iter().all(|r| !r.path_found()));
}

#[test]
fn corridor_with_dead_ends() {
    let problem = Maze2DProblem::try_from(indoc! {"
        #########
        #S....#.#
        ###.#.#.#
        #...#...#
        #.###.###
        #.#...#G#
        #.#.#...#
        #########
    "})
    .unwrap();

    let results = run_all(&problem);
    let expected = results[0].path.clone().unwrap();
    assert_eq!(expected.steps(), 12);
    assert!(problem.space().valid_path(&expected));
    for result in &results {
        assert_eq!(result.path.as_ref(), Some(&expected), "{}", result.algorithm);
        assert!(result.nodes_explored >= 1);
    }
    let bfs = &results[1];
    assert!(bfs.nodes_explored >= expected.len());
}

#[test]
fn single_route_corridor_file() {
    let problem = maze_file("corridor.txt");
    for result in run_all(&problem) {
        let path = result.path.unwrap();
        assert_eq!(path.steps(), 48, "{}", result.algorithm);
    }
}

#[test]
fn open_room_file() {
    let problem = maze_file("open_room.txt");
    let bfs = solve(&problem, Algorithm::Bfs, &mut ());
    let astar = solve(&problem, Algorithm::AStar(Heuristic::Manhattan), &mut ());
    let greedy = solve(&problem, Algorithm::Greedy(Heuristic::Manhattan), &mut ());

    assert_eq!(bfs.path.as_ref().map(|p| p.steps()), Some(35));
    assert_eq!(astar.path.as_ref().map(|p| p.steps()), Some(35));
    assert!(astar.nodes_explored < bfs.nodes_explored);
    assert!(greedy.nodes_explored <= bfs.nodes_explored);
}

#[test]
fn bidirectional_agrees_with_bfs() {
    let mut checked = 0;
    for seed in 0..200 {
        let config = SolverConfig {
            rows: 25,
            cols: 35,
            generator: GeneratorKind::RandomWalls,
            wall_probability: 0.3,
            seed,
            ..SolverConfig::default()
        };
        let problem = config.generate().unwrap();
        let bfs = solve(&problem, Algorithm::Bfs, &mut ());
        let bidirectional = solve(&problem, Algorithm::Bidirectional, &mut ());
        assert_eq!(bfs.path_found(), bidirectional.path_found(), "seed {seed}");

        if bfs.path_found() {
            assert_eq!(bfs.path_length(), bidirectional.path_length(), "seed {seed}");
            checked += 1;
        }
        if checked == 20 {
            break;
        }
    }
    assert_eq!(checked, 20);
}

#[test]
fn perfect_mazes_are_solvable() {
    for seed in 0..10 {
        let config = SolverConfig {
            rows: 21,
            cols: 31,
            generator: GeneratorKind::Perfect,
            seed,
            ..SolverConfig::default()
        };
        let problem = config.generate().unwrap();
        let results = run_all(&problem);
        let first = results[0].path.clone();
        assert!(first.is_some(), "seed {seed}");
        // A single route connects any two rooms.
        for r in &results {
            assert_eq!(r.path, first, "{} with seed {seed}", r.algorithm);
        }
    }
}

#[test]
fn comparison_exports() {
    let problem = maze_file("open_room.txt");
    let comparator: Comparator<Maze2DState> = run_all(&problem).into_iter().collect();
    let records = comparator.records();
    assert_eq!(records.len(), 7);
    assert!(comparator.best_by(Metric::NodesExplored).is_some());
    assert_eq!(
        comparator.best_by(Metric::PathLength).map(|r| r.path_length()),
        Some(36)
    );

    let mut json = vec![];
    export_json(&records, &mut json).unwrap();
    let back: Vec<ResultRecord> = serde_json::from_slice(&json).unwrap();
    assert_eq!(back.len(), 7);
    assert_eq!(back[0].algorithm, "DFS (Stack)");
    assert_eq!(back[3].heuristic.as_deref(), Some("Manhattan"));
    assert!(back.iter().all(|r| r.path_found));
    assert!(back.iter().all(|r| r.memory_kb > 0.0));
    assert_eq!(back[0].time_complexity, "O(V + E)");
    assert_eq!(back[6].space_complexity, "O(b^(d/2))");

    let mut csv = vec![];
    export_csv(&records, &mut csv).unwrap();
    let csv = String::from_utf8(csv).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 8);
    assert!(lines[0].starts_with("algorithm,nodes_explored,path_length"));
    assert!(lines[0].contains("memory_kb"));
    assert!(lines[4].starts_with("A* (Manhattan),"));
}
