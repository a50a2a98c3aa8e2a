//! Greedy best-first search.

use std::cmp::max;

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

/// Greedy ranks states by their heuristic alone.
///
/// States are marked when queued, each one is queued at most once and keeps
/// the parent that first reached it.
#[derive(Debug)]
pub struct GreedySearch<'a, P>
where
    P: Problem,
    P::State: GridPosition,
{
    problem: &'a P,
    heuristic: Heuristic,
    open: PriorityQueue<P::State, FloatCost>,
    tree: SearchTree<P::State>,
    expanded: usize,
    max_open: usize,
}

impl<'a, P> GreedySearch<'a, P>
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
            tree: SearchTree::new(),
            expanded: 0,
            max_open: 0,
        };

        let start = problem.start();
        if problem.space().walkable(&start) {
            let h = search.h(&start);
            search.tree = SearchTree::with_root(start);
            search.open.push(start, h);
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

impl<P> Search for GreedySearch<'_, P>
where
    P: Problem,
    P::State: GridPosition,
{
    type State = P::State;

    fn step<O>(&mut self, observer: &mut O) -> SearchStep<P::State>
    where
        O: SearchObserver<P::State>,
    {
        self.max_open = max(self.max_open, self.open.len());
        let Some((s, _h)) = self.open.pop() else {
            return SearchStep::Exhausted;
        };
        self.expanded += 1;
        observer.on_expand(&s);

        if self.problem.is_goal(&s) {
            self.open.clear();
            return super::found(&self.tree, &s);
        }

        for n in self.problem.space().neighbours(&s) {
            if self.tree.reach(n, s) {
                let h = self.h(&n);
                self.open.push(n, h);
                observer.on_discover(&n);
            }
        }
        SearchStep::Expanded(s)
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
    use crate::problems::maze_2d::Maze2DState;
    use crate::search::TraceObserver;
    use indoc::indoc;

    #[test]
    fn heads_for_the_goal() {
        let problem = Maze2DProblem::try_from(indoc! {"
            .......
            ...S...
            .......
            ......G
        "})
        .unwrap();
        let mut trace = TraceObserver::new();
        let mut search = GreedySearch::new(&problem, Heuristic::Manhattan);
        let path = search.run(&mut trace).unwrap();

        assert_eq!(path.steps(), 5);
        assert_eq!(search.expanded(), path.len());
        assert!(!trace.expanded.contains(&Maze2DState::new(0, 3)));
    }

    #[test]
    fn falls_into_dead_ends() {
        // The pocket right of S looks closer to G than the way around.
        let problem = Maze2DProblem::try_from(indoc! {"
            ........
            .######.
            .S...#G.
            .#####..
            ........
        "})
        .unwrap();
        let mut search = GreedySearch::new(&problem, Heuristic::Manhattan);
        let mut trace = TraceObserver::new();
        let path = search.run(&mut trace).unwrap();

        assert!(trace.expanded.contains(&Maze2DState::new(2, 4)));
        assert!(problem.space().valid_path(&path));
        assert!(path.steps() >= 11);
    }
}
