//! Implementation of Dijkstra's path-finding algorithm.

use std::cmp::max;

use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;

use crate::cost::FloatCost;
use crate::data_structures::priority_queue::PriorityQueue;
use crate::search::Search;
use crate::search::SearchObserver;
use crate::search::SearchStep;
use crate::search::SearchTree;
use crate::space::Problem;
use crate::space::Space;

/// The ranking value for Dijkstra
///
/// We prefer better g-values.
///
/// ```
/// use maze_search::algorithms::dijkstra::DijkstraRank;
/// use maze_search::cost::FloatCost;
///
/// let l0 = FloatCost::new(0.0);
/// let l1 = FloatCost::new(1.0);
/// assert!(DijkstraRank::new(l0) < DijkstraRank::new(l1));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct DijkstraRank {
    g: FloatCost,
}
impl DijkstraRank {
    pub fn new(g: FloatCost) -> Self {
        Self { g }
    }
    pub fn g(&self) -> FloatCost {
        self.g
    }
}

/// Dijkstra closes states when popping them.
///
/// A cheaper route to a queued state re-links its parent and queues it again,
/// the outdated entry is skipped once popped.
#[derive(Debug)]
pub struct DijkstraSearch<'a, P>
where
    P: Problem,
{
    problem: &'a P,
    open: PriorityQueue<P::State, DijkstraRank>,
    /// Best known cost to reach each state.
    g: FxHashMap<P::State, FloatCost>,
    closed: FxHashSet<P::State>,
    tree: SearchTree<P::State>,
    expanded: usize,
    max_open: usize,
}

impl<'a, P> DijkstraSearch<'a, P>
where
    P: Problem,
{
    #[must_use]
    pub fn new(problem: &'a P) -> Self {
        let mut search = Self {
            problem,
            open: PriorityQueue::with_capacity(256),
            g: FxHashMap::default(),
            closed: FxHashSet::default(),
            tree: SearchTree::new(),
            expanded: 0,
            max_open: 0,
        };

        let start = problem.start();
        if problem.space().walkable(&start) {
            search.g.insert(start, FloatCost::zero());
            search.tree = SearchTree::with_root(start);
            search.open.push(start, DijkstraRank::new(FloatCost::zero()));
        }
        search
    }
}

impl<P> Search for DijkstraSearch<'_, P>
where
    P: Problem,
{
    type State = P::State;

    fn step<O>(&mut self, observer: &mut O) -> SearchStep<P::State>
    where
        O: SearchObserver<P::State>,
    {
        loop {
            self.max_open = max(self.max_open, self.open.len());
            let Some((s, rank)) = self.open.pop() else {
                return SearchStep::Exhausted;
            };
            if !self.closed.insert(s) {
                // Stale entry
                continue;
            }
            self.expanded += 1;
            observer.on_expand(&s);

            if self.problem.is_goal(&s) {
                self.open.clear();
                return super::found(&self.tree, &s);
            }

            let new_g = rank.g() + FloatCost::from(1u32);
            for n in self.problem.space().neighbours(&s) {
                if self.closed.contains(&n) {
                    continue;
                }
                if self.g.get(&n).is_none_or(|old| new_g < *old) {
                    log::trace!("Relaxing {n:?} to {new_g} through {s:?}");
                    self.g.insert(n, new_g);
                    self.tree.relink(n, s);
                    self.open.push(n, DijkstraRank::new(new_g));
                    observer.on_discover(&n);
                }
            }
            return SearchStep::Expanded(s);
        }
    }

    fn expanded(&self) -> usize {
        self.expanded
    }
    fn frontier_len(&self) -> usize {
        self.open.len()
    }
    fn max_frontier_len(&self) -> usize {
        self.max_open
    }
    fn visited(&self) -> usize {
        self.tree.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::maze_2d::Maze2DProblem;
    use crate::search::TraceObserver;
    use indoc::indoc;

    #[test]
    fn finds_shortest_path() {
        let problem = Maze2DProblem::try_from(indoc! {"
            S....
            .###.
            .#G..
            .#.#.
            ...#.
        "})
        .unwrap();
        let mut search = DijkstraSearch::new(&problem);
        let path = search.run(&mut ()).unwrap();
        assert_eq!(path.steps(), 8);
        assert!(problem.space().valid_path(&path));
    }

    #[test]
    fn never_expands_twice() {
        let problem = Maze2DProblem::try_from(indoc! {"
            S....
            .....
            .....
            ....G
        "})
        .unwrap();
        let mut trace = TraceObserver::new();
        DijkstraSearch::new(&problem).run(&mut trace).unwrap();

        let unique: FxHashSet<_> = trace.expanded.iter().collect();
        assert_eq!(unique.len(), trace.expanded.len());
    }

    #[test]
    fn expands_by_cost() {
        let problem = Maze2DProblem::try_from("..S..\n....G").unwrap();
        let mut trace = TraceObserver::new();
        DijkstraSearch::new(&problem).run(&mut trace).unwrap();

        let start = problem.start();
        let distances: Vec<u64> = trace
            .expanded
            .iter()
            .map(|s| u64::from(s.row.abs_diff(start.row) + s.col.abs_diff(start.col)))
            .collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]), "{distances:?}");
    }
}
