//! Bidirectional BFS.
//!
//! Two BFS wavefronts, one out of the start and one out of the goal, take
//! turns expanding a single state. The search stops when a side expands a
//! state the other side has already reached.

use std::cmp::max;

use derive_more::Display;

use super::bfs::BfsDirection;
use crate::search::Search;
use crate::search::SearchObserver;
use crate::search::SearchStep;
use crate::space::Path;
use crate::space::Problem;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum Side {
    #[display("forward")]
    Forward,
    #[display("backward")]
    Backward,
}

impl Side {
    fn other(&self) -> Self {
        match self {
            Side::Forward => Side::Backward,
            Side::Backward => Side::Forward,
        }
    }
}

#[derive(Debug)]
pub struct BidirectionalSearch<'a, P>
where
    P: Problem,
{
    problem: &'a P,
    forward: BfsDirection<P::State>,
    backward: BfsDirection<P::State>,
    /// The side expanding next.
    turn: Side,
    expanded: usize,
    max_open: usize,
    done: bool,
}

impl<'a, P> BidirectionalSearch<'a, P>
where
    P: Problem,
{
    #[must_use]
    pub fn new(problem: &'a P) -> Self {
        let space = problem.space();
        Self {
            problem,
            forward: BfsDirection::new(space, problem.start()),
            backward: BfsDirection::new(space, problem.goal()),
            turn: Side::Forward,
            expanded: 0,
            max_open: 0,
            done: false,
        }
    }

    /// The side expanding next.
    pub fn turn(&self) -> Side {
        self.turn
    }

    fn sides(&mut self, side: Side) -> (&mut BfsDirection<P::State>, &BfsDirection<P::State>) {
        match side {
            Side::Forward => (&mut self.forward, &self.backward),
            Side::Backward => (&mut self.backward, &self.forward),
        }
    }

    /// Joins the start side chain to the goal side chain at `meet`.
    fn join(&self, meet: &P::State) -> Option<Path<P::State>> {
        let mut states = self.forward.tree().chain_to_root(meet)?;
        states.reverse();
        let to_goal = self.backward.tree().chain_to_root(meet)?;
        states.extend(to_goal.into_iter().skip(1));
        Path::from_states(states)
    }
}

impl<P> Search for BidirectionalSearch<'_, P>
where
    P: Problem,
{
    type State = P::State;

    fn step<O>(&mut self, observer: &mut O) -> SearchStep<P::State>
    where
        O: SearchObserver<P::State>,
    {
        // A round starts with the forward side and needs both sides alive.
        // The backward side only needs itself to finish its round.
        let alive = match self.turn {
            Side::Forward => !self.forward.is_empty() && !self.backward.is_empty(),
            Side::Backward => !self.backward.is_empty(),
        };
        if self.done || !alive {
            self.done = true;
            return SearchStep::Exhausted;
        }
        if self.turn == Side::Forward {
            self.max_open = max(self.max_open, self.forward.len() + self.backward.len());
        }

        let side = self.turn;
        self.turn = side.other();
        let problem = self.problem;
        let (this, other) = self.sides(side);
        let Some(s) = this.pop() else {
            return SearchStep::Exhausted;
        };
        observer.on_expand(&s);
        let met = other.reached(&s);
        if !met {
            this.push_neighbours(problem.space(), &s, observer);
        }
        self.expanded += 1;

        if met {
            log::trace!("The {side} side met the other one at {s:?}");
            self.done = true;
            return match self.join(&s) {
                Some(path) => SearchStep::Found(path),
                None => SearchStep::Exhausted,
            };
        }
        SearchStep::Expanded(s)
    }

    fn expanded(&self) -> usize {
        self.expanded
    }
    fn frontier_len(&self) -> usize {
        self.forward.len() + self.backward.len()
    }
    fn max_frontier_len(&self) -> usize {
        self.max_open
    }
    fn visited(&self) -> usize {
        self.forward.tree().len() + self.backward.tree().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::bfs::BfsSearch;
    use crate::problems::maze_2d::Maze2DProblem;
    use crate::problems::maze_2d::Maze2DSpace;
    use crate::problems::maze_2d::Maze2DState;
    use crate::search::TraceObserver;
    use crate::space::Space;
    use indoc::indoc;

    #[test]
    fn sides_alternate() {
        let problem = Maze2DProblem::try_from(indoc! {"
            S.....
            ......
            .....G
        "})
        .unwrap();
        let mut trace = TraceObserver::new();
        let mut search = BidirectionalSearch::new(&problem);
        assert_eq!(search.turn(), Side::Forward);
        search.step(&mut trace);
        assert_eq!(search.turn(), Side::Backward);
        search.step(&mut trace);

        assert_eq!(
            trace.expanded,
            vec![Maze2DState::new(0, 0), Maze2DState::new(2, 5)]
        );
    }

    #[test]
    fn matches_bfs_length() {
        let problem = Maze2DProblem::try_from(indoc! {"
            S.#.....
            ..#.##..
            ....#..#
            .##...#.
            ...#...G
        "})
        .unwrap();
        let bfs = BfsSearch::new(&problem).run(&mut ()).unwrap();
        let mut search = BidirectionalSearch::new(&problem);
        let path = search.run(&mut ()).unwrap();

        assert_eq!(path.steps(), bfs.steps());
        assert_eq!(path.start(), problem.start());
        assert_eq!(path.end(), problem.goal());
        assert!(problem.space().valid_path(&path));
        // The meeting state shows up only once.
        let mut states = path.states().to_vec();
        states.sort();
        states.dedup();
        assert_eq!(states.len(), path.len());
    }

    #[test]
    fn start_is_goal() {
        let space = Maze2DSpace::new_empty(3, 3).unwrap();
        let s = Maze2DState::new(1, 1);
        let problem = Maze2DProblem::new(space, s, s).unwrap();
        let mut search = BidirectionalSearch::new(&problem);
        let path = search.run(&mut ()).unwrap();
        assert_eq!(path.states(), &[s]);
        assert_eq!(search.expanded(), 1);
    }

    #[test]
    fn adjacent_endpoints() {
        let problem = Maze2DProblem::try_from("SG").unwrap();
        let mut search = BidirectionalSearch::new(&problem);
        let path = search.run(&mut ()).unwrap();
        assert_eq!(path.steps(), 1);
        assert_eq!(search.expanded(), 2);
    }

    #[test]
    fn separated_sides_run_dry() {
        let problem = Maze2DProblem::try_from("S.#..\n..#.G").unwrap();
        let mut search = BidirectionalSearch::new(&problem);
        assert!(search.run(&mut ()).is_none());
        assert_eq!(search.step(&mut ()), SearchStep::Exhausted);
    }
}
