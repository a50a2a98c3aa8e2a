use std::fmt::Debug;
use std::hash::Hash;

use smallvec::SmallVec;

const MAX_ELEMENTS_DISPLAYED: usize = 20;

/// A vertex of the search graph.
///
/// States are used as keys of visited sets and parent maps, so they need to
/// be cheap to copy and hash.
pub trait State: Copy + Clone + Debug + PartialEq + Eq + Hash {}

/// Neighbours of a state. Grids expand into at most 4 of them.
pub type Neighbours<St> = SmallVec<[St; 4]>;

/// A read-only graph of unit-cost edges.
pub trait Space<St>: Clone + Debug
where
    St: State,
{
    /// Expands a State.
    ///
    /// The order MUST be stable across calls as it drives tie-breaking in
    /// every frontier.
    fn neighbours(&self, s: &St) -> Neighbours<St>;

    /// Whether the State lies within the Space.
    fn valid(&self, s: &St) -> bool;

    /// Whether the State can be stood on.
    fn walkable(&self, s: &St) -> bool;

    /// Whether `b` is reachable from `a` in a single step.
    fn adjacent(&self, a: &St, b: &St) -> bool {
        self.neighbours(a).contains(b)
    }

    /// Verifies a Path only steps through walkable, adjacent states.
    fn valid_path(&self, p: &Path<St>) -> bool {
        p.states().iter().all(|s| self.walkable(s))
            && p.states().windows(2).all(|w| self.adjacent(&w[0], &w[1]))
    }

    fn size(&self) -> Option<usize> {
        None
    }
}

/// A search instance: a Space plus a single start and goal.
pub trait Problem: Debug {
    type State: State;
    type Space: Space<Self::State>;

    fn space(&self) -> &Self::Space;
    fn start(&self) -> Self::State;
    fn goal(&self) -> Self::State;

    fn is_goal(&self, s: &Self::State) -> bool {
        *s == self.goal()
    }
}

/// A sequence of states from a start to an end.
///
/// Paths are never empty. A trivial Path holds only its start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path<St>
where
    St: State,
{
    states: Vec<St>,
}

impl<St> Path<St>
where
    St: State,
{
    #[inline(always)]
    pub fn new_from_start(start: St) -> Self {
        Self {
            states: vec![start],
        }
    }

    /// Builds a Path out of a non-empty list of states.
    pub fn from_states(states: Vec<St>) -> Option<Self> {
        (!states.is_empty()).then_some(Self { states })
    }

    #[inline(always)]
    pub fn start(&self) -> St {
        self.states[0]
    }
    #[inline(always)]
    pub fn end(&self) -> St {
        self.states[self.states.len() - 1]
    }

    /// Number of states, endpoints included.
    #[inline(always)]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.states.len()
    }
    /// Number of moves.
    #[inline(always)]
    pub fn steps(&self) -> usize {
        self.states.len() - 1
    }

    #[inline(always)]
    pub fn states(&self) -> &[St] {
        &self.states
    }
    pub fn contains(&self, s: &St) -> bool {
        self.states.contains(s)
    }
    pub fn iter(&self) -> std::slice::Iter<'_, St> {
        self.states.iter()
    }

    #[inline(always)]
    pub fn append(&mut self, s: St) {
        self.states.push(s);
    }

    /// Reverses the Path.
    ///
    /// Useful when naturally reconstructing paths from their end.
    pub fn reverse(&mut self) {
        self.states.reverse();
    }

    pub fn into_states(self) -> Vec<St> {
        self.states
    }
}

impl<'a, St> IntoIterator for &'a Path<St>
where
    St: State,
{
    type Item = &'a St;
    type IntoIter = std::slice::Iter<'a, St>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}

impl<St> std::fmt::Display for Path<St>
where
    St: State,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Path({} steps, {:?}:{:?}:{:?})",
            self.steps(),
            self.start(),
            self.states
                .iter()
                .take(MAX_ELEMENTS_DISPLAYED)
                .collect::<Vec<_>>(),
            self.end()
        )
    }
}
