//! Breadth-first search over a FIFO queue.

use std::cmp::max;
use std::collections::VecDeque;

use crate::search::Search;
use crate::search::SearchObserver;
use crate::search::SearchStep;
use crate::search::SearchTree;
use crate::space::Problem;
use crate::space::Space;
use crate::space::State;

/// A single BFS wavefront growing out of one root.
///
/// States are marked when queued, so each state is queued at most once. Both
/// plain BFS and each side of the bidirectional search are built on this.
#[derive(Debug)]
pub struct BfsDirection<St>
where
    St: State,
{
    open: VecDeque<St>,
    tree: SearchTree<St>,
}

impl<St> BfsDirection<St>
where
    St: State,
{
    /// A wavefront out of `root`, or a dry one if `root` can't be stood on.
    pub fn new<Sp: Space<St>>(space: &Sp, root: St) -> Self {
        if space.walkable(&root) {
            Self {
                open: VecDeque::from([root]),
                tree: SearchTree::with_root(root),
            }
        } else {
            Self {
                open: VecDeque::new(),
                tree: SearchTree::new(),
            }
        }
    }

    #[inline(always)]
    pub fn pop(&mut self) -> Option<St> {
        self.open.pop_front()
    }

    /// Queues the unseen neighbours of `s`.
    #[inline(always)]
    pub fn push_neighbours<Sp, O>(&mut self, space: &Sp, s: &St, observer: &mut O)
    where
        Sp: Space<St>,
        O: SearchObserver<St>,
    {
        for n in space.neighbours(s) {
            if self.tree.reach(n, *s) {
                self.open.push_back(n);
                observer.on_discover(&n);
            }
        }
    }

    /// Whether `s` was ever queued on this side.
    #[inline(always)]
    pub fn reached(&self, s: &St) -> bool {
        self.tree.contains(s)
    }

    pub fn tree(&self) -> &SearchTree<St> {
        &self.tree
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
    pub fn clear(&mut self) {
        self.open.clear();
    }
}

#[derive(Debug)]
pub struct BfsSearch<'a, P>
where
    P: Problem,
{
    problem: &'a P,
    wave: BfsDirection<P::State>,
    expanded: usize,
    max_open: usize,
}

impl<'a, P> BfsSearch<'a, P>
where
    P: Problem,
{
    #[must_use]
    pub fn new(problem: &'a P) -> Self {
        Self {
            problem,
            wave: BfsDirection::new(problem.space(), problem.start()),
            expanded: 0,
            max_open: 0,
        }
    }
}

impl<P> Search for BfsSearch<'_, P>
where
    P: Problem,
{
    type State = P::State;

    fn step<O>(&mut self, observer: &mut O) -> SearchStep<P::State>
    where
        O: SearchObserver<P::State>,
    {
        self.max_open = max(self.max_open, self.wave.len());
        let Some(s) = self.wave.pop() else {
            return SearchStep::Exhausted;
        };
        self.expanded += 1;
        observer.on_expand(&s);

        if self.problem.is_goal(&s) {
            self.wave.clear();
            return super::found(self.wave.tree(), &s);
        }

        self.wave.push_neighbours(self.problem.space(), &s, observer);
        SearchStep::Expanded(s)
    }

    fn expanded(&self) -> usize {
        self.expanded
    }
    fn frontier_len(&self) -> usize {
        self.wave.len()
    }
    fn max_frontier_len(&self) -> usize {
        self.max_open
    }
    fn visited(&self) -> usize {
        self.wave.tree().len()
    }
}
