//! Implementation of A*.

use std::cmp::max;

use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;

use crate::cost::FloatCost;
use crate::data_structures::priority_queue::PriorityQueue;
use crate::heuristics::GridPosition;
use crate::heuristics::Heuristic;
use crate::search::Search;
use crate::search::SearchObserver;
use crate::search::SearchStep;
use crate::search::SearchTree;
use crate::space::Problem;
use crate::space::Space;

/// The ranking tuple for A*
///
/// We prefer better f-values, and tie break for lower h.
///
/// Intuition around higher g-value might be slightly easier, but keeping the
/// raw h value helps to avoid recomputing it later.
///
/// ```
/// use maze_search::algorithms::astar::AStarRank;
/// use maze_search::cost::FloatCost;
///
/// let l0 = FloatCost::new(0.0);
/// let l1 = FloatCost::new(1.0);
/// let l2 = FloatCost::new(2.0);
/// assert!(AStarRank::new(l2, l0) < AStarRank::new(l1, l1));
/// assert!(AStarRank::new(l0, l1) < AStarRank::new(l2, l0));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct AStarRank {
    f: FloatCost,
    h: FloatCost,
}
impl AStarRank {
    pub fn new(g: FloatCost, h: FloatCost) -> Self {
        Self { f: g + h, h }
    }
    pub fn f(&self) -> FloatCost {
        self.f
    }
    pub fn h(&self) -> FloatCost {
        self.h
    }
}

/// A* closes states when popping them, exactly like Dijkstra, but ranks the
/// frontier by `f = g + h`.
#[derive(Debug)]
pub struct AStarSearch<'a, P>
where
    P: Problem,
    P::State: GridPosition,
{
    problem: &'a P,
    heuristic: Heuristic,
    /// `(state, g)` entries.
    open: PriorityQueue<(P::State, FloatCost), AStarRank>,
    g: FxHashMap<P::State, FloatCost>,
    closed: FxHashSet<P::State>,
    tree: SearchTree<P::State>,
    expanded: usize,
    max_open: usize,
}

impl<'a, P> AStarSearch<'a, P>
where
    P: Problem,
    P::State: GridPosition,
{
    #[must_use]
    pub fn new(problem: &'a P, heuristic: Heuristic) -> Self {
        let mut search = Self {
            problem,
            heuristic,
            open: PriorityQueue::with_capacity(256),
            g: FxHashMap::default(),
            closed: FxHashSet::default(),
            tree: SearchTree::new(),
            expanded: 0,
            max_open: 0,
        };

        let start = problem.start();
        if problem.space().walkable(&start) {
            let g = FloatCost::zero();
            let rank = AStarRank::new(g, search.h(&start));
            search.g.insert(start, g);
            search.tree = SearchTree::with_root(start);
            search.open.push((start, g), rank);
        }
        search
    }

    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    #[inline(always)]
    fn h(&self, s: &P::State) -> FloatCost {
        self.heuristic.h(s, &self.problem.goal())
    }
}

impl<P> Search for AStarSearch<'_, P>
where
    P: Problem,
    P::State: GridPosition,
{
    type State = P::State;

    fn step<O>(&mut self, observer: &mut O) -> SearchStep<P::State>
    where
        O: SearchObserver<P::State>,
    {
        loop {
            self.max_open = max(self.max_open, self.open.len());
            let Some(((s, g), _rank)) = self.open.pop() else {
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

            let new_g = g + FloatCost::from(1u32);
            for n in self.problem.space().neighbours(&s) {
                if self.closed.contains(&n) {
                    continue;
                }
                if self.g.get(&n).is_none_or(|old| new_g < *old) {
                    let rank = AStarRank::new(new_g, self.h(&n));
                    log::trace!("Reaching {n:?} with {rank:?} through {s:?}");
                    self.g.insert(n, new_g);
                    self.tree.relink(n, s);
                    self.open.push((n, new_g), rank);
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
