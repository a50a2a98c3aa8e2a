use std::fmt::Debug;

use rustc_hash::FxHashMap;

use crate::space::Path;
use crate::space::State;

/// The parent map of a single search direction.
///
/// Every reached state points to the state that reached it, except for the
/// root which has no parent.
#[derive(Clone, Debug)]
pub struct SearchTree<St>
where
    St: State,
{
    parents: FxHashMap<St, Option<St>>,
}

impl<St> SearchTree<St>
where
    St: State,
{
    #[inline(always)]
    #[must_use]
    pub fn new() -> Self {
        Self {
            parents: FxHashMap::default(),
        }
    }

    /// A tree holding just its root.
    #[must_use]
    pub fn with_root(root: St) -> Self {
        let mut tree = Self::new();
        tree.parents.insert(root, None);
        tree
    }

    #[inline(always)]
    pub fn contains(&self, s: &St) -> bool {
        self.parents.contains_key(s)
    }

    /// The parent of a reached state, `None` for the root and unknown states.
    pub fn parent(&self, s: &St) -> Option<St> {
        self.parents.get(s).copied().flatten()
    }

    /// Records `s` as reached from `parent` unless it was already reached.
    ///
    /// Returns whether `s` is new.
    #[inline(always)]
    pub fn reach(&mut self, s: St, parent: St) -> bool {
        match self.parents.entry(s) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(e) => {
                e.insert(Some(parent));
                true
            }
        }
    }

    /// Points `s` to a new parent, replacing any previous one.
    #[inline(always)]
    pub fn relink(&mut self, s: St, parent: St) {
        self.parents.insert(s, Some(parent));
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.parents.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// The chain of states from `end` back to the root, both included.
    ///
    /// Returns `None` if `end` was never reached.
    pub fn chain_to_root(&self, end: &St) -> Option<Vec<St>> {
        if !self.contains(end) {
            return None;
        }

        let mut chain = vec![*end];
        let mut current = *end;
        while let Some(p) = self.parent(&current) {
            // A cycle would mean a corrupted tree, a chain can't be longer
            // than the tree itself.
            if chain.len() > self.len() {
                return None;
            }
            chain.push(p);
            current = p;
        }
        Some(chain)
    }

    /// Reconstructs the path from the root to `end`.
    pub fn path(&self, end: &St) -> Option<Path<St>> {
        let mut chain = self.chain_to_root(end)?;
        chain.reverse();
        Path::from_states(chain)
    }
}

impl<St> Default for SearchTree<St>
where
    St: State,
{
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

/// The outcome of advancing a search by a single expansion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchStep<St>
where
    St: State,
{
    /// A state was expanded, and the search goes on.
    Expanded(St),
    /// The goal was expanded.
    Found(Path<St>),
    /// The frontier ran dry without reaching the goal. Stepping a finished
    /// search also lands here.
    Exhausted,
}

/// Receives search events as they happen.
///
/// Searches never depend on their observer, `()` can be used to drive one
/// headlessly.
pub trait SearchObserver<St>
where
    St: State,
{
    /// Called once per expansion, in expansion order.
    #[inline(always)]
    fn on_expand(&mut self, _s: &St) {}
    /// Called when a state is pushed into a frontier.
    #[inline(always)]
    fn on_discover(&mut self, _s: &St) {}
}

impl<St: State> SearchObserver<St> for () {}

impl<St, O> SearchObserver<St> for &mut O
where
    St: State,
    O: SearchObserver<St> + ?Sized,
{
    fn on_expand(&mut self, s: &St) {
        (**self).on_expand(s);
    }
    fn on_discover(&mut self, s: &St) {
        (**self).on_discover(s);
    }
}

/// Records the expansion order and the discovered states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceObserver<St>
where
    St: State,
{
    pub expanded: Vec<St>,
    pub discovered: Vec<St>,
}

impl<St: State> TraceObserver<St> {
    pub fn new() -> Self {
        Self {
            expanded: vec![],
            discovered: vec![],
        }
    }
}

impl<St: State> Default for TraceObserver<St> {
    fn default() -> Self {
        Self::new()
    }
}

impl<St: State> SearchObserver<St> for TraceObserver<St> {
    fn on_expand(&mut self, s: &St) {
        self.expanded.push(*s);
    }
    fn on_discover(&mut self, s: &St) {
        self.discovered.push(*s);
    }
}

/// Forwards expansions to a closure.
pub struct FnObserver<F>(pub F);

impl<St, F> SearchObserver<St> for FnObserver<F>
where
    St: State,
    F: FnMut(&St),
{
    fn on_expand(&mut self, s: &St) {
        (self.0)(s)
    }
}

/// A search that can be advanced one expansion at a time.
pub trait Search: Debug {
    type State: State;

    /// Expands one state from the frontier.
    fn step<O>(&mut self, observer: &mut O) -> SearchStep<Self::State>
    where
        O: SearchObserver<Self::State>;

    /// Number of expansions so far.
    fn expanded(&self) -> usize;

    /// Number of entries currently waiting in the frontier, stale ones included.
    fn frontier_len(&self) -> usize;

    /// Largest frontier seen right before an expansion.
    fn max_frontier_len(&self) -> usize;

    /// Number of states held by the search trees.
    fn visited(&self) -> usize;

    /// Rough peak memory in bytes: the largest frontier plus the parent maps.
    fn memory_estimate(&self) -> usize {
        self.max_frontier_len() * std::mem::size_of::<Self::State>()
            + self.visited() * std::mem::size_of::<(Self::State, Option<Self::State>)>()
    }

    /// Steps until the goal is found or the frontier runs out.
    fn run<O>(&mut self, observer: &mut O) -> Option<Path<Self::State>>
    where
        O: SearchObserver<Self::State>,
    {
        loop {
            match self.step(observer) {
                SearchStep::Expanded(_) => continue,
                SearchStep::Found(path) => return Some(path),
                SearchStep::Exhausted => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    struct N(u8);
    impl State for N {}

    #[test]
    fn reach_keeps_first_parent() {
        let mut tree = SearchTree::with_root(N(0));
        assert!(tree.reach(N(1), N(0)));
        assert!(!tree.reach(N(1), N(7)));
        assert_eq!(tree.parent(&N(1)), Some(N(0)));
        assert_eq!(tree.parent(&N(0)), None);
        assert!(!tree.reach(N(0), N(1)));
    }

    #[test]
    fn relink_overwrites() {
        let mut tree = SearchTree::with_root(N(0));
        tree.reach(N(1), N(0));
        tree.reach(N(2), N(1));
        tree.relink(N(2), N(0));
        assert_eq!(tree.path(&N(2)).unwrap().states(), &[N(0), N(2)]);
    }

    #[test]
    fn path_goes_root_to_end() {
        let mut tree = SearchTree::with_root(N(0));
        tree.reach(N(1), N(0));
        tree.reach(N(2), N(1));
        tree.reach(N(3), N(0));

        let path = tree.path(&N(2)).unwrap();
        assert_eq!(path.states(), &[N(0), N(1), N(2)]);
        assert_eq!(tree.chain_to_root(&N(2)).unwrap(), vec![N(2), N(1), N(0)]);
        assert_eq!(tree.path(&N(0)).unwrap().states(), &[N(0)]);
        assert!(tree.path(&N(9)).is_none());
    }

    #[test]
    fn trace_observer_records() {
        let mut trace = TraceObserver::new();
        trace.on_discover(&N(1));
        trace.on_expand(&N(0));
        let observer = &mut trace;
        observer.on_expand(&N(1));
        assert_eq!(trace.expanded, vec![N(0), N(1)]);
        assert_eq!(trace.discovered, vec![N(1)]);
    }

    #[test]
    fn fn_observer_sees_expansions() {
        let mut count = 0;
        {
            let mut observer = FnObserver(|_: &N| count += 1);
            observer.on_expand(&N(0));
            observer.on_discover(&N(1));
            observer.on_expand(&N(2));
        }
        assert_eq!(count, 2);
    }
}
