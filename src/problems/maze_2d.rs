use std::hash::Hash;

use derive_more::Display;
use rustc_hash::FxHashSet;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::space::Neighbours;
use crate::space::Path;
use crate::space::Problem;
use crate::space::Space;
use crate::space::State;

const MAX_ELEMENTS_DISPLAYED: usize = 120;
const RANDOM_STATE_MAX_TRIES: usize = 10_000;

// Simple colours
const WHITE: [u8; 3] = [u8::MAX, u8::MAX, u8::MAX];
const BLACK: [u8; 3] = [u8::MIN, u8::MIN, u8::MIN];
const GREEN: [u8; 3] = [u8::MIN, u8::MAX, u8::MIN];
const BLUE: [u8; 3] = [u8::MIN, u8::MIN, u8::MAX];

pub type Coord = u32;

/// A `(row, col)` cell coordinate.
#[derive(
    Copy, Clone, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[display("({row},{col})")]
pub struct Maze2DState {
    pub row: Coord,
    pub col: Coord,
}

impl Maze2DState {
    #[inline(always)]
    pub const fn new(row: Coord, col: Coord) -> Self {
        Self { row, col }
    }
    pub fn new_from_usize(row: usize, col: usize) -> Option<Maze2DState> {
        Some(Maze2DState {
            row: Coord::try_from(row).ok()?,
            col: Coord::try_from(col).ok()?,
        })
    }
}
impl State for Maze2DState {}

impl From<(Coord, Coord)> for Maze2DState {
    fn from((row, col): (Coord, Coord)) -> Self {
        Self::new(row, col)
    }
}

/// The 4 moves, in the order neighbours are generated.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, PartialOrd)]
pub enum Maze2DAction {
    #[display("↑")]
    Up = 0, // row--
    #[display("↓")]
    Down = 1, // row++
    #[display("←")]
    Left = 2, // col--
    #[display("→")]
    Right = 3, // col++
}

impl Maze2DAction {
    pub const ALL: [Maze2DAction; 4] = [
        Maze2DAction::Up,
        Maze2DAction::Down,
        Maze2DAction::Left,
        Maze2DAction::Right,
    ];

    /// Moves a state, without looking at the map.
    ///
    /// Moving past coordinate 0 yields `None`.
    #[inline(always)]
    pub fn apply(&self, s: &Maze2DState) -> Option<Maze2DState> {
        let (row, col) = (s.row, s.col);

        #[rustfmt::skip]
        let (row, col) = match self {
            Maze2DAction::Up    => (row.checked_sub(1)?, col                ),
            Maze2DAction::Down  => (row.checked_add(1)?, col                ),
            Maze2DAction::Left  => (row,                 col.checked_sub(1)?),
            Maze2DAction::Right => (row,                 col.checked_add(1)?),
        };

        Some(Maze2DState { row, col })
    }
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Maze2DCell {
    #[display("░")]
    Empty,
    #[display("█")]
    Wall,
}

impl Maze2DCell {
    #[inline(always)]
    pub fn walkable(&self) -> bool {
        *self == Maze2DCell::Empty
    }
    pub fn toggled(&self) -> Self {
        match self {
            Maze2DCell::Empty => Maze2DCell::Wall,
            Maze2DCell::Wall => Maze2DCell::Empty,
        }
    }
}

#[derive(Debug, Error)]
pub enum Maze2DCellParseError {
    #[error("Invalid character '{0}' found.")]
    InvalidCharacter(char),
}

impl std::convert::TryFrom<char> for Maze2DCell {
    type Error = Maze2DCellParseError;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        match ch {
            ' ' | '.' | '░' => Ok(Maze2DCell::Empty),
            '#' | '█' => Ok(Maze2DCell::Wall),
            ch => Err(Maze2DCellParseError::InvalidCharacter(ch)),
        }
    }
}

#[derive(Debug, Error)]
pub enum Maze2DSpaceError {
    #[error("Malformed grid: {rows}x{cols} has no cells")]
    MalformedGrid { rows: usize, cols: usize },
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Grid of {rows}x{cols} does not fit in coordinates")]
    TooLarge { rows: usize, cols: usize },
}

/// A rectangular grid of walkable and blocked cells.
///
/// Dimensions are fixed on construction and are never zero.
#[derive(Clone, PartialEq, Eq)]
pub struct Maze2DSpace {
    rows: usize,
    cols: usize,
    /// Row-major cells.
    cells: Vec<Maze2DCell>,
}

impl Maze2DSpace {
    fn check_dimensions(rows: usize, cols: usize) -> Result<(), Maze2DSpaceError> {
        if rows == 0 || cols == 0 {
            return Err(Maze2DSpaceError::MalformedGrid { rows, cols });
        }
        if rows >= Coord::MAX as usize || cols >= Coord::MAX as usize {
            return Err(Maze2DSpaceError::TooLarge { rows, cols });
        }
        Ok(())
    }

    pub fn new_filled(
        rows: usize,
        cols: usize,
        cell: Maze2DCell,
    ) -> Result<Self, Maze2DSpaceError> {
        Self::check_dimensions(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            cells: vec![cell; rows * cols],
        })
    }
    pub fn new_empty(rows: usize, cols: usize) -> Result<Self, Maze2DSpaceError> {
        Self::new_filled(rows, cols, Maze2DCell::Empty)
    }
    /// An empty room surrounded by a wall.
    pub fn new_walled(rows: usize, cols: usize) -> Result<Self, Maze2DSpaceError> {
        let mut space = Self::new_empty(rows, cols)?;
        for row in 0..rows {
            for col in 0..cols {
                if row == 0 || col == 0 || row == rows - 1 || col == cols - 1 {
                    space.cells[row * cols + col] = Maze2DCell::Wall;
                }
            }
        }
        Ok(space)
    }
    pub fn new_from_map(map: Vec<Vec<Maze2DCell>>) -> Result<Self, Maze2DSpaceError> {
        let rows = map.len();
        let cols = map.first().map_or(0, Vec::len);
        Self::check_dimensions(rows, cols)?;

        let mut cells = Vec::with_capacity(rows * cols);
        for (row, line) in map.into_iter().enumerate() {
            if line.len() != cols {
                return Err(Maze2DSpaceError::RaggedRow {
                    row,
                    expected: cols,
                    found: line.len(),
                });
            }
            cells.extend(line);
        }
        Ok(Self { rows, cols, cells })
    }

    /// `(rows, cols)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    fn index(&self, state: &Maze2DState) -> Option<usize> {
        let (row, col) = (state.row as usize, state.col as usize);
        (row < self.rows && col < self.cols).then_some(row * self.cols + col)
    }

    /// The cell at `state`, or `None` when out of bounds.
    #[inline(always)]
    pub fn cell(&self, state: &Maze2DState) -> Option<Maze2DCell> {
        self.index(state).map(|i| self.cells[i])
    }
    /// Overwrites a cell. Out of bounds writes are ignored and return `false`.
    pub fn set_cell(&mut self, state: &Maze2DState, cell: Maze2DCell) -> bool {
        match self.index(state) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }
    /// Flips a cell between wall and empty, returning the new cell.
    pub fn toggle_wall(&mut self, state: &Maze2DState) -> Option<Maze2DCell> {
        let i = self.index(state)?;
        self.cells[i] = self.cells[i].toggled();
        Some(self.cells[i])
    }
    pub fn fill(&mut self, cell: Maze2DCell) {
        self.cells.fill(cell);
    }

    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|c| c.walkable()).count()
    }

    /// All states in row-major order.
    pub fn states(&self) -> impl Iterator<Item = Maze2DState> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.cols).map(move |col| Maze2DState::new(row as Coord, col as Coord))
        })
    }

    pub fn random_state<R: rand::Rng>(&self, r: &mut R) -> Option<Maze2DState> {
        for _tries in 0..RANDOM_STATE_MAX_TRIES {
            let s = Maze2DState::new(
                r.random_range(0..self.rows as Coord),
                r.random_range(0..self.cols as Coord),
            );
            if self.walkable(&s) {
                return Some(s);
            }
        }

        None
    }
}

impl Space<Maze2DState> for Maze2DSpace {
    /// Gets the neighbours of a given position, up, down, left, then right.
    ///
    /// NOTE: These states can only be used with the current Maze
    #[inline(always)]
    fn neighbours(&self, state: &Maze2DState) -> Neighbours<Maze2DState> {
        let mut v = Neighbours::<Maze2DState>::new();
        for action in Maze2DAction::ALL {
            if let Some(s) = action.apply(state) {
                if self.walkable(&s) {
                    v.push(s);
                }
            }
        }
        v
    }

    #[inline(always)]
    fn valid(&self, state: &Maze2DState) -> bool {
        self.index(state).is_some()
    }

    #[inline(always)]
    fn walkable(&self, state: &Maze2DState) -> bool {
        self.cell(state).is_some_and(|c| c.walkable())
    }

    fn adjacent(&self, a: &Maze2DState, b: &Maze2DState) -> bool {
        a.row.abs_diff(b.row) + a.col.abs_diff(b.col) == 1 && self.walkable(b)
    }

    fn size(&self) -> Option<usize> {
        Some(self.cells.len())
    }
}

impl std::fmt::Display for Maze2DSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "Maze2D({}x{}):", self.rows, self.cols)?;
        for line in self.cells.chunks(self.cols).take(MAX_ELEMENTS_DISPLAYED) {
            for cell in line.iter().take(MAX_ELEMENTS_DISPLAYED) {
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for Maze2DSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Maze2D{:?}", self.dimensions())
    }
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum Endpoint {
    #[display("start")]
    Start,
    #[display("goal")]
    Goal,
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum EndpointReason {
    #[display("is out of bounds")]
    OutOfBounds,
    #[display("is blocked")]
    Blocked,
}

#[derive(Debug, Error)]
pub enum Maze2DProblemError {
    #[error("Invalid {which} {state}: it {reason}")]
    InvalidEndpoint {
        which: Endpoint,
        state: Maze2DState,
        reason: EndpointReason,
    },
    #[error("No {0} found")]
    MissingEndpoint(Endpoint),
    #[error("More than one {0} found")]
    DuplicateEndpoint(Endpoint),
    #[error("Can't place a wall on the {0}")]
    WallOnEndpoint(Endpoint),
    #[error("{0} is out of bounds")]
    OutOfBounds(Maze2DState),
    #[error("Empty input")]
    EmptyInput,
    #[error("Invalid cell {e} found at ({row},{col})")]
    InvalidCell {
        e: Maze2DCellParseError,
        row: usize,
        col: usize,
    },
    #[error(transparent)]
    Space(#[from] Maze2DSpaceError),
    #[error("I/O error when loading '{p}': {e}")]
    IOError {
        p: std::path::PathBuf,
        e: std::io::Error,
    },
    #[error("Image error when loading '{p}': {e}")]
    ImageError {
        p: std::path::PathBuf,
        e: image::ImageError,
    },
}

/// A Maze with a start and a goal, both on walkable cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze2DProblem {
    space: Maze2DSpace,
    start: Maze2DState,
    goal: Maze2DState,
}

impl Maze2DProblem {
    /// Validates the endpoints against the space.
    pub fn new(
        space: Maze2DSpace,
        start: Maze2DState,
        goal: Maze2DState,
    ) -> Result<Self, Maze2DProblemError> {
        check_endpoint(&space, Endpoint::Start, start)?;
        check_endpoint(&space, Endpoint::Goal, goal)?;
        Ok(Self { space, start, goal })
    }

    pub fn space(&self) -> &Maze2DSpace {
        &self.space
    }
    pub fn into_space(self) -> Maze2DSpace {
        self.space
    }

    pub fn set_start(&mut self, start: Maze2DState) -> Result<(), Maze2DProblemError> {
        check_endpoint(&self.space, Endpoint::Start, start)?;
        self.start = start;
        Ok(())
    }
    pub fn set_goal(&mut self, goal: Maze2DState) -> Result<(), Maze2DProblemError> {
        check_endpoint(&self.space, Endpoint::Goal, goal)?;
        self.goal = goal;
        Ok(())
    }

    /// Flips a wall, refusing to block either endpoint.
    pub fn toggle_wall(&mut self, s: &Maze2DState) -> Result<Maze2DCell, Maze2DProblemError> {
        if *s == self.start {
            return Err(Maze2DProblemError::WallOnEndpoint(Endpoint::Start));
        }
        if *s == self.goal {
            return Err(Maze2DProblemError::WallOnEndpoint(Endpoint::Goal));
        }
        self.space
            .toggle_wall(s)
            .ok_or(Maze2DProblemError::OutOfBounds(*s))
    }

    /// Draws the maze with an explored region and a path on top.
    ///
    /// `#` walls, `.` empty cells, `v` explored cells, `*` path cells, and
    /// `S`/`G` for the endpoints.
    pub fn render(&self, path: Option<&Path<Maze2DState>>, explored: &[Maze2DState]) -> String {
        let explored: FxHashSet<Maze2DState> = explored.iter().copied().collect();
        let on_path: FxHashSet<Maze2DState> = path
            .map(|p| p.iter().copied().collect())
            .unwrap_or_default();

        let (rows, cols) = self.space.dimensions();
        let mut out = String::with_capacity(rows * (cols + 1));
        for s in self.space.states() {
            let ch = if s == self.start {
                'S'
            } else if s == self.goal {
                'G'
            } else if on_path.contains(&s) {
                '*'
            } else if explored.contains(&s) {
                'v'
            } else if self.space.walkable(&s) {
                '.'
            } else {
                '#'
            };
            out.push(ch);
            if s.col as usize == cols - 1 {
                out.push('\n');
            }
        }
        out
    }
}

fn check_endpoint(
    space: &Maze2DSpace,
    which: Endpoint,
    state: Maze2DState,
) -> Result<(), Maze2DProblemError> {
    let reason = match space.cell(&state) {
        None => EndpointReason::OutOfBounds,
        Some(Maze2DCell::Wall) => EndpointReason::Blocked,
        Some(Maze2DCell::Empty) => return Ok(()),
    };
    Err(Maze2DProblemError::InvalidEndpoint {
        which,
        state,
        reason,
    })
}

impl Problem for Maze2DProblem {
    type State = Maze2DState;
    type Space = Maze2DSpace;

    fn space(&self) -> &Maze2DSpace {
        &self.space
    }
    fn start(&self) -> Maze2DState {
        self.start
    }
    fn goal(&self) -> Maze2DState {
        self.goal
    }
}

#[derive(Copy, Clone, Debug, Display, PartialEq)]
pub enum Maze2DProblemCell {
    Cell(Maze2DCell),
    #[display("S")]
    Start,
    #[display("G")]
    Goal,
}

impl std::convert::TryFrom<char> for Maze2DProblemCell {
    type Error = Maze2DCellParseError;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        match ch {
            'S' => Ok(Maze2DProblemCell::Start),
            'G' | 'E' => Ok(Maze2DProblemCell::Goal),
            ch => Ok(Maze2DProblemCell::Cell(Maze2DCell::try_from(ch)?)),
        }
    }
}

/// Collects endpoints while a grid is being read.
#[derive(Default)]
struct EndpointScan {
    start: Option<Maze2DState>,
    goal: Option<Maze2DState>,
}

impl EndpointScan {
    fn found(&mut self, which: Endpoint, s: Maze2DState) -> Result<(), Maze2DProblemError> {
        let slot = match which {
            Endpoint::Start => &mut self.start,
            Endpoint::Goal => &mut self.goal,
        };
        if slot.replace(s).is_some() {
            return Err(Maze2DProblemError::DuplicateEndpoint(which));
        }
        Ok(())
    }

    fn finish(self, space: Maze2DSpace) -> Result<Maze2DProblem, Maze2DProblemError> {
        let start = self
            .start
            .ok_or(Maze2DProblemError::MissingEndpoint(Endpoint::Start))?;
        let goal = self
            .goal
            .ok_or(Maze2DProblemError::MissingEndpoint(Endpoint::Goal))?;
        Maze2DProblem::new(space, start, goal)
    }
}

impl std::convert::TryFrom<&str> for Maze2DProblem {
    type Error = Maze2DProblemError;

    /// Reads a maze drawn with `#` walls, `.` floors, `S` start and `G` goal.
    ///
    /// Leading and trailing blank lines are ignored. Spaces are floors, so
    /// rows keep their trailing spaces.
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let lines: Vec<&str> = s.lines().map(|l| l.trim_end_matches('\r')).collect();
        let blank = |l: &&str| l.trim().is_empty();
        let (Some(first), Some(last)) = (
            lines.iter().position(|l| !blank(l)),
            lines.iter().rposition(|l| !blank(l)),
        ) else {
            return Err(Maze2DProblemError::EmptyInput);
        };
        let lines = &lines[first..=last];

        let mut scan = EndpointScan::default();
        let mut map = Vec::with_capacity(lines.len());
        for (row, line) in lines.iter().enumerate() {
            let mut cells = Vec::with_capacity(line.len());
            for (col, ch) in line.chars().enumerate() {
                let cell = Maze2DProblemCell::try_from(ch)
                    .map_err(|e| Maze2DProblemError::InvalidCell { e, row, col })?;
                let here = Maze2DState::new_from_usize(row, col).ok_or(
                    Maze2DSpaceError::TooLarge {
                        rows: row + 1,
                        cols: col + 1,
                    },
                )?;

                cells.push(match cell {
                    Maze2DProblemCell::Start => {
                        scan.found(Endpoint::Start, here)?;
                        Maze2DCell::Empty
                    }
                    Maze2DProblemCell::Goal => {
                        scan.found(Endpoint::Goal, here)?;
                        Maze2DCell::Empty
                    }
                    Maze2DProblemCell::Cell(c) => c,
                });
            }
            map.push(cells);
        }

        scan.finish(Maze2DSpace::new_from_map(map)?)
    }
}

impl std::convert::TryFrom<&std::path::Path> for Maze2DProblem {
    type Error = Maze2DProblemError;

    /// Loads a text maze, or a PNG where black is a wall, blue the start, and
    /// green the goal.
    fn try_from(p: &std::path::Path) -> Result<Self, Self::Error> {
        let is_image = p
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if !is_image {
            let text = std::fs::read_to_string(p).map_err(|e| Maze2DProblemError::IOError {
                p: p.to_path_buf(),
                e,
            })?;
            return Maze2DProblem::try_from(text.as_str());
        }

        use image::ImageReader;
        use image::Rgb;

        let img = ImageReader::open(p)
            .map_err(|e| Maze2DProblemError::IOError {
                p: p.to_path_buf(),
                e,
            })?
            .decode()
            .map_err(|e| Maze2DProblemError::ImageError {
                p: p.to_path_buf(),
                e,
            })?
            .into_rgb8();

        let rows = img.height() as usize;
        let cols = img.width() as usize;
        let mut space = Maze2DSpace::new_empty(rows, cols)?;
        let mut scan = EndpointScan::default();

        for (x, y, px) in img.enumerate_pixels() {
            let px: &Rgb<u8> = px;
            let here = Maze2DState::new(y, x);
            let cell = match px.0 {
                BLACK => Maze2DCell::Wall,
                WHITE => Maze2DCell::Empty,
                GREEN => {
                    scan.found(Endpoint::Goal, here)?;
                    Maze2DCell::Empty
                }
                BLUE => {
                    scan.found(Endpoint::Start, here)?;
                    Maze2DCell::Empty
                }
                _ => Maze2DCell::Empty,
            };
            space.set_cell(&here, cell);
        }

        scan.finish(space)
    }
}

impl std::fmt::Display for Maze2DProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let (rows, cols) = self.space.dimensions();
        writeln!(
            f,
            "Maze2DProblem({}x{}) (s:{}, g:{}):",
            rows, cols, self.start, self.goal
        )?;
        let shown_cols = cols.min(MAX_ELEMENTS_DISPLAYED);
        for s in self.space.states() {
            let (row, col) = (s.row as usize, s.col as usize);
            if row >= MAX_ELEMENTS_DISPLAYED || col >= shown_cols {
                continue;
            }
            match (s == self.start, s == self.goal) {
                (true, true) => write!(f, "!")?,
                (true, false) => write!(f, "S")?,
                (false, true) => write!(f, "G")?,
                (false, false) => {
                    write!(f, "{}", self.space.cell(&s).unwrap_or(Maze2DCell::Wall))?
                }
            }
            if col == shown_cols - 1 {
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn s(row: Coord, col: Coord) -> Maze2DState {
        Maze2DState::new(row, col)
    }

    #[test]
    fn neighbours_come_up_down_left_right() {
        let space = Maze2DSpace::new_empty(3, 3).unwrap();
        let n = space.neighbours(&s(1, 1));
        assert_eq!(n.as_slice(), &[s(0, 1), s(2, 1), s(1, 0), s(1, 2)]);
    }

    #[test]
    fn neighbours_skip_walls_and_edges() {
        let mut space = Maze2DSpace::new_empty(2, 2).unwrap();
        space.set_cell(&s(1, 0), Maze2DCell::Wall);
        let n = space.neighbours(&s(0, 0));
        assert_eq!(n.as_slice(), &[s(0, 1)]);
    }

    #[test]
    fn out_of_range_is_not_walkable() {
        let space = Maze2DSpace::new_empty(2, 2).unwrap();
        assert!(!space.walkable(&s(2, 0)));
        assert!(!space.walkable(&s(0, Coord::MAX)));
        assert!(space.neighbours(&s(9, 9)).is_empty());
        assert_eq!(space.cell(&s(5, 5)), None);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(
            Maze2DSpace::new_empty(0, 4),
            Err(Maze2DSpaceError::MalformedGrid { rows: 0, cols: 4 })
        ));
        assert!(matches!(
            Maze2DSpace::new_from_map(vec![]),
            Err(Maze2DSpaceError::MalformedGrid { .. })
        ));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let map = vec![vec![Maze2DCell::Empty; 3], vec![Maze2DCell::Empty; 2]];
        assert!(matches!(
            Maze2DSpace::new_from_map(map),
            Err(Maze2DSpaceError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn walled_space_has_a_border() {
        let space = Maze2DSpace::new_walled(4, 5).unwrap();
        assert_eq!(space.walkable_count(), 2 * 3);
        assert!(!space.walkable(&s(0, 2)));
        assert!(!space.walkable(&s(3, 4)));
        assert!(space.walkable(&s(1, 1)));
    }

    #[test]
    fn parses_text() {
        let problem = Maze2DProblem::try_from(indoc! {"
            #####
            #S..#
            #.#.#
            #..G#
            #####
        "})
        .unwrap();
        assert_eq!(problem.space().dimensions(), (5, 5));
        assert_eq!(problem.start, s(1, 1));
        assert_eq!(problem.goal, s(3, 3));
        assert!(!problem.space().walkable(&s(2, 2)));
    }

    #[test]
    fn trailing_spaces_are_floor() {
        let problem = Maze2DProblem::try_from("S. \r\n..G\n   \n").unwrap();
        assert_eq!(problem.space().dimensions(), (2, 3));
        assert!(problem.space().walkable(&s(0, 2)));
        assert_eq!(problem.goal, s(1, 2));

        let problem = Maze2DProblem::try_from("\n  \nS#  \n.#G \n\n").unwrap();
        assert_eq!(problem.space().dimensions(), (2, 4));
        assert_eq!(problem.start, s(0, 0));
        assert!(problem.space().walkable(&s(1, 3)));
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            Maze2DProblem::try_from(""),
            Err(Maze2DProblemError::EmptyInput)
        ));
        assert!(matches!(
            Maze2DProblem::try_from("S.x\n..G"),
            Err(Maze2DProblemError::InvalidCell { row: 0, col: 2, .. })
        ));
        assert!(matches!(
            Maze2DProblem::try_from("S..\n..."),
            Err(Maze2DProblemError::MissingEndpoint(Endpoint::Goal))
        ));
        assert!(matches!(
            Maze2DProblem::try_from("S.S\n..G"),
            Err(Maze2DProblemError::DuplicateEndpoint(Endpoint::Start))
        ));
        assert!(matches!(
            Maze2DProblem::try_from("S..\n.G"),
            Err(Maze2DProblemError::Space(Maze2DSpaceError::RaggedRow { .. }))
        ));
    }

    #[test]
    fn endpoints_are_validated() {
        let space = Maze2DSpace::new_walled(5, 5).unwrap();
        assert!(matches!(
            Maze2DProblem::new(space.clone(), s(0, 0), s(3, 3)),
            Err(Maze2DProblemError::InvalidEndpoint {
                which: Endpoint::Start,
                reason: EndpointReason::Blocked,
                ..
            })
        ));
        assert!(matches!(
            Maze2DProblem::new(space.clone(), s(1, 1), s(7, 3)),
            Err(Maze2DProblemError::InvalidEndpoint {
                which: Endpoint::Goal,
                reason: EndpointReason::OutOfBounds,
                ..
            })
        ));

        let mut problem = Maze2DProblem::new(space, s(1, 1), s(3, 3)).unwrap();
        assert!(problem.set_goal(s(0, 3)).is_err());
        assert_eq!(problem.goal(), s(3, 3));
        assert!(problem.set_goal(s(2, 2)).is_ok());
    }

    #[test]
    fn walls_never_land_on_endpoints() {
        let space = Maze2DSpace::new_walled(5, 5).unwrap();
        let mut problem = Maze2DProblem::new(space, s(1, 1), s(3, 3)).unwrap();
        assert!(matches!(
            problem.toggle_wall(&s(1, 1)),
            Err(Maze2DProblemError::WallOnEndpoint(Endpoint::Start))
        ));
        assert_eq!(problem.toggle_wall(&s(2, 2)).unwrap(), Maze2DCell::Wall);
        assert_eq!(problem.toggle_wall(&s(2, 2)).unwrap(), Maze2DCell::Empty);
        assert!(problem.toggle_wall(&s(9, 9)).is_err());
    }

    #[test]
    fn render_overlays_path_and_exploration() {
        let problem = Maze2DProblem::try_from("S..\n##.\nG..").unwrap();
        let path = Path::from_states(vec![
            s(0, 0),
            s(0, 1),
            s(0, 2),
            s(1, 2),
            s(2, 2),
            s(2, 1),
            s(2, 0),
        ])
        .unwrap();
        let rendered = problem.render(Some(&path), &[s(0, 1)]);
        assert_eq!(rendered, "S**\n##*\nG**\n");

        let rendered = problem.render(None, &[s(0, 1)]);
        assert_eq!(rendered, "Sv.\n##.\nG..\n");
    }
}
