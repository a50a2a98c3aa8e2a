//! Depth-first search over an explicit stack.

use std::cmp::max;

use crate::search::Search;
use crate::search::SearchObserver;
use crate::search::SearchStep;
use crate::search::SearchTree;
use crate::space::Problem;
use crate::space::Space;

/// DFS marks states when pushing them, so each state is stacked at most once.
///
/// Neighbours are pushed in order, and the last one pushed is expanded first.
#[derive(Debug)]
pub struct DfsSearch<'a, P>
where
    P: Problem,
{
    problem: &'a P,
    open: Vec<P::State>,
    tree: SearchTree<P::State>,
    expanded: usize,
    max_open: usize,
}

impl<'a, P> DfsSearch<'a, P>
where
    P: Problem,
{
    #[must_use]
    pub fn new(problem: &'a P) -> Self {
        let start = problem.start();
        let (open, tree) = if problem.space().walkable(&start) {
            (vec![start], SearchTree::with_root(start))
        } else {
            (vec![], SearchTree::new())
        };

        Self {
            problem,
            open,
            tree,
            expanded: 0,
            max_open: 0,
        }
    }
}

impl<P> Search for DfsSearch<'_, P>
where
    P: Problem,
{
    type State = P::State;

    fn step<O>(&mut self, observer: &mut O) -> SearchStep<P::State>
    where
        O: SearchObserver<P::State>,
    {
        self.max_open = max(self.max_open, self.open.len());
        let Some(s) = self.open.pop() else {
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
                self.open.push(n);
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
