//! Implementation of search algorithms.
//!
//! Every algorithm works on a generic `Problem`, informed ones additionally
//! need states with grid coordinates to estimate distances.

use std::str::FromStr;

use derive_more::Display;
use hrsw::Stopwatch;
use thiserror::Error;

use crate::heuristics::GridPosition;
use crate::heuristics::Heuristic;
use crate::heuristics::HeuristicParseError;
use crate::metrics::SearchResult;
use crate::search::Search;
use crate::search::SearchObserver;
use crate::search::SearchStep;
use crate::search::SearchTree;
use crate::space::Problem;
use crate::space::State;

pub mod astar;
pub mod bfs;
pub mod bidirectional;
pub mod dfs;
pub mod dijkstra;
pub mod greedy;

use astar::AStarSearch;
use bfs::BfsSearch;
use bidirectional::BidirectionalSearch;
use dfs::DfsSearch;
use dijkstra::DijkstraSearch;
use greedy::GreedySearch;

/// Wraps up a search that just expanded its goal.
fn found<St: State>(tree: &SearchTree<St>, goal: &St) -> SearchStep<St> {
    match tree.path(goal) {
        Some(path) => SearchStep::Found(path),
        None => SearchStep::Exhausted,
    }
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum Algorithm {
    #[display("DFS (Stack)")]
    Dfs,
    #[display("BFS (Queue)")]
    Bfs,
    #[display("Dijkstra (Min-Heap)")]
    Dijkstra,
    #[display("A* ({_0})")]
    AStar(Heuristic),
    #[display("Greedy Best-First ({_0})")]
    Greedy(Heuristic),
    #[display("Bidirectional BFS")]
    Bidirectional,
}

impl Algorithm {
    /// The default line-up, one run per strategy plus Euclidean A*.
    pub fn lineup() -> [Algorithm; 7] {
        [
            Algorithm::Dfs,
            Algorithm::Bfs,
            Algorithm::Dijkstra,
            Algorithm::AStar(Heuristic::Manhattan),
            Algorithm::AStar(Heuristic::Euclidean),
            Algorithm::Greedy(Heuristic::Manhattan),
            Algorithm::Bidirectional,
        ]
    }

    /// Display name, like `"A* (Manhattan)"`.
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Short name accepted by `FromStr`.
    pub fn key(&self) -> String {
        match self {
            Algorithm::Dfs => "dfs".to_string(),
            Algorithm::Bfs => "bfs".to_string(),
            Algorithm::Dijkstra => "dijkstra".to_string(),
            Algorithm::AStar(Heuristic::Manhattan) => "astar".to_string(),
            Algorithm::AStar(h) => format!("astar-{}", h.name()),
            Algorithm::Greedy(Heuristic::Manhattan) => "greedy".to_string(),
            Algorithm::Greedy(h) => format!("greedy-{}", h.name()),
            Algorithm::Bidirectional => "bidirectional".to_string(),
        }
    }

    pub fn heuristic(&self) -> Option<Heuristic> {
        match self {
            Algorithm::AStar(h) | Algorithm::Greedy(h) => Some(*h),
            _ => None,
        }
    }

    /// Worst case time, in terms of vertices `V`, edges `E`, branching
    /// factor `b`, solution depth `d` and maximum depth `m`.
    pub fn time_complexity(&self) -> &'static str {
        match self {
            Algorithm::Dfs | Algorithm::Bfs => "O(V + E)",
            Algorithm::Dijkstra => "O((V + E) log V)",
            Algorithm::AStar(_) => "O(b^d)",
            Algorithm::Greedy(_) => "O(b^m)",
            Algorithm::Bidirectional => "O(b^(d/2))",
        }
    }

    pub fn space_complexity(&self) -> &'static str {
        match self {
            Algorithm::Bidirectional => "O(b^(d/2))",
            _ => "O(V)",
        }
    }

    /// Whether the returned paths are always shortest.
    pub fn is_optimal(&self) -> bool {
        match self {
            Algorithm::Dfs | Algorithm::Greedy(_) => false,
            Algorithm::Bfs | Algorithm::Dijkstra | Algorithm::Bidirectional => true,
            Algorithm::AStar(h) => h.is_admissible(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlgorithmParseError {
    #[error(
        "Unknown algorithm '{0}', expected dfs, bfs, dijkstra, astar[-heuristic], greedy[-heuristic] or bidirectional"
    )]
    Unknown(String),
    #[error(transparent)]
    Heuristic(#[from] HeuristicParseError),
}

impl FromStr for Algorithm {
    type Err = AlgorithmParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let (name, heuristic) = match lower.split_once('-') {
            Some((name, h)) => (name, Some(Heuristic::from_str(h)?)),
            None => (lower.as_str(), None),
        };

        match (name, heuristic) {
            ("dfs", None) => Ok(Algorithm::Dfs),
            ("bfs", None) => Ok(Algorithm::Bfs),
            ("dijkstra", None) => Ok(Algorithm::Dijkstra),
            ("astar" | "a*", h) => Ok(Algorithm::AStar(h.unwrap_or_default())),
            ("greedy", h) => Ok(Algorithm::Greedy(h.unwrap_or_default())),
            ("bidirectional" | "bidir", None) => Ok(Algorithm::Bidirectional),
            _ => Err(AlgorithmParseError::Unknown(s.to_string())),
        }
    }
}

/// Runs a search to completion, timing only the search loop.
pub fn measure<S, O>(
    algorithm: Algorithm,
    mut search: S,
    observer: &mut O,
) -> SearchResult<S::State>
where
    S: Search,
    O: SearchObserver<S::State>,
{
    log::debug!("Running {algorithm}");
    let mut stopwatch = Stopwatch::new_started();
    let path = search.run(observer);
    stopwatch.stop();

    let result = SearchResult {
        algorithm,
        path,
        nodes_explored: search.expanded(),
        elapsed: stopwatch.elapsed(),
        max_frontier_size: search.max_frontier_len(),
        memory_bytes: search.memory_estimate(),
    };
    log::debug!(
        "{algorithm} expanded {} states, path length {}",
        result.nodes_explored,
        result.path_length()
    );
    result
}

/// Solves a problem with the given algorithm.
pub fn solve<P, O>(problem: &P, algorithm: Algorithm, observer: &mut O) -> SearchResult<P::State>
where
    P: Problem,
    P::State: GridPosition,
    O: SearchObserver<P::State>,
{
    match algorithm {
        Algorithm::Dfs => measure(algorithm, DfsSearch::new(problem), observer),
        Algorithm::Bfs => measure(algorithm, BfsSearch::new(problem), observer),
        Algorithm::Dijkstra => measure(algorithm, DijkstraSearch::new(problem), observer),
        Algorithm::AStar(h) => measure(algorithm, AStarSearch::new(problem, h), observer),
        Algorithm::Greedy(h) => measure(algorithm, GreedySearch::new(problem, h), observer),
        Algorithm::Bidirectional => {
            measure(algorithm, BidirectionalSearch::new(problem), observer)
        }
    }
}

/// Runs the line-up, one algorithm after the other.
pub fn run_all<P>(problem: &P) -> Vec<SearchResult<P::State>>
where
    P: Problem,
    P::State: GridPosition,
{
    Algorithm::lineup()
        .into_iter()
        .map(|a| solve(problem, a, &mut ()))
        .collect()
}

/// Runs the line-up with a thread per algorithm.
///
/// Searches only borrow the problem, so they can share it. Results come back
/// in line-up order, but their timings are taken under contention.
pub fn run_all_parallel<P>(problem: &P) -> Vec<SearchResult<P::State>>
where
    P: Problem + Sync,
    P::State: GridPosition + Send,
{
    std::thread::scope(|scope| {
        let handles: Vec<_> = Algorithm::lineup()
            .into_iter()
            .map(|a| scope.spawn(move || solve(problem, a, &mut ())))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect()
    })
}
