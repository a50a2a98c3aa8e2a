//! Maze generators.
//!
//! Generators only draw walls, `SolverConfig::generate` then opens the
//! endpoints and checks them.

use derive_more::Display;
use rand::Rng;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use super::maze_2d::Maze2DCell;
use super::maze_2d::Maze2DProblem;
use super::maze_2d::Maze2DProblemError;
use super::maze_2d::Maze2DSpace;
use super::maze_2d::Maze2DSpaceError;
use super::maze_2d::Maze2DState;

/// Sets a cell given signed coordinates, ignoring anything out of bounds.
fn paint(space: &mut Maze2DSpace, row: i64, col: i64, cell: Maze2DCell) {
    let (Ok(row), Ok(col)) = (usize::try_from(row), usize::try_from(col)) else {
        return;
    };
    if let Some(s) = Maze2DState::new_from_usize(row, col) {
        space.set_cell(&s, cell);
    }
}

fn is_wall(space: &Maze2DSpace, row: i64, col: i64) -> bool {
    let (Ok(row), Ok(col)) = (usize::try_from(row), usize::try_from(col)) else {
        return false;
    };
    Maze2DState::new_from_usize(row, col)
        .and_then(|s| space.cell(&s))
        .is_some_and(|c| c == Maze2DCell::Wall)
}

/// Every cell becomes a wall with probability `p`.
///
/// `p` is clamped into `[0, 1]`, NaN counts as 0.
pub fn random_walls<R: Rng>(
    rows: usize,
    cols: usize,
    p: f64,
    rng: &mut R,
) -> Result<Maze2DSpace, Maze2DSpaceError> {
    let mut space = Maze2DSpace::new_empty(rows, cols)?;
    let p = if p.is_nan() {
        log::warn!("Wall probability is NaN, generating no walls");
        0.0
    } else {
        p.clamp(0.0, 1.0)
    };
    for s in space.states().collect::<Vec<_>>() {
        if rng.random_bool(p) {
            space.set_cell(&s, Maze2DCell::Wall);
        }
    }
    Ok(space)
}

/// A perfect maze carved by a randomised DFS out of `(1, 1)`.
///
/// Carving moves 2 cells at a time, so odd coordinates end up as rooms and
/// there's exactly one route between any two of them.
pub fn perfect<R: Rng>(
    rows: usize,
    cols: usize,
    rng: &mut R,
) -> Result<Maze2DSpace, Maze2DSpaceError> {
    const DIRECTIONS: [(i64, i64); 4] = [(-2, 0), (2, 0), (0, -2), (0, 2)];

    let mut space = Maze2DSpace::new_filled(rows, cols, Maze2DCell::Wall)?;
    if rows <= 2 || cols <= 2 {
        log::warn!("A {rows}x{cols} grid is too small to carve a maze into");
        return Ok(space);
    }

    let shuffled = |rng: &mut R| {
        let mut d = DIRECTIONS;
        d.shuffle(rng);
        d
    };

    paint(&mut space, 1, 1, Maze2DCell::Empty);
    let mut stack = vec![((1i64, 1i64), shuffled(rng), 0usize)];
    while let Some((cell, directions, next)) = stack.last_mut() {
        let Some(&(dr, dc)) = directions.get(*next) else {
            stack.pop();
            continue;
        };
        *next += 1;

        let (row, col) = *cell;
        let (to_row, to_col) = (row + dr, col + dc);
        if is_wall(&space, to_row, to_col) {
            paint(&mut space, row + dr / 2, col + dc / 2, Maze2DCell::Empty);
            paint(&mut space, to_row, to_col, Maze2DCell::Empty);
            stack.push(((to_row, to_col), shuffled(rng), 0));
        }
    }
    Ok(space)
}

/// Concentric wall segments drawn every other cell.
pub fn spiral(rows: usize, cols: usize) -> Result<Maze2DSpace, Maze2DSpaceError> {
    let mut space = Maze2DSpace::new_empty(rows, cols)?;
    let wall = Maze2DCell::Wall;

    let (mut row_start, mut row_end) = (0i64, rows as i64 - 1);
    let (mut col_start, mut col_end) = (0i64, cols as i64 - 1);
    while row_start <= row_end && col_start <= col_end {
        for col in (col_start..=col_end).step_by(2) {
            paint(&mut space, row_start, col, wall);
        }
        row_start += 2;

        for row in (row_start..=row_end).step_by(2) {
            paint(&mut space, row, col_end, wall);
        }
        col_end -= 2;

        if row_start <= row_end {
            for col in (col_start..=col_end).rev().step_by(2) {
                paint(&mut space, row_end, col, wall);
            }
            row_end -= 2;
        }

        if col_start <= col_end {
            for row in (row_start..=row_end).rev().step_by(2) {
                paint(&mut space, row, col_start, wall);
            }
            col_start += 2;
        }
    }
    Ok(space)
}

/// Rectangular rooms of 3 to 7 cells a side joined by random openings.
///
/// The cells around every state in `openings` are cleared too.
pub fn rooms<R: Rng>(
    rows: usize,
    cols: usize,
    room_count: usize,
    openings: &[Maze2DState],
    rng: &mut R,
) -> Result<Maze2DSpace, Maze2DSpaceError> {
    let mut space = Maze2DSpace::new_filled(rows, cols, Maze2DCell::Wall)?;
    let (rows_i, cols_i) = (rows as i64, cols as i64);

    for _ in 0..room_count {
        let width = rng.random_range(3..=7i64);
        let height = rng.random_range(3..=7i64);
        if cols_i < width + 2 || rows_i < height + 2 {
            log::warn!("A {width}x{height} room doesn't fit in a {rows}x{cols} grid");
            continue;
        }

        let x = rng.random_range(1..=cols_i - width - 1);
        let y = rng.random_range(1..=rows_i - height - 1);
        for row in y..y + height {
            for col in x..x + width {
                paint(&mut space, row, col, Maze2DCell::Empty);
            }
        }
    }

    if rows >= 3 && cols >= 3 {
        for _ in 0..rows * cols / 4 {
            let row = rng.random_range(1..=rows_i - 2);
            let col = rng.random_range(1..=cols_i - 2);
            paint(&mut space, row, col, Maze2DCell::Empty);
        }
    }

    for s in openings {
        let (row, col) = (i64::from(s.row), i64::from(s.col));
        for (dr, dc) in [(0, 0), (-1, 0), (1, 0), (0, -1), (0, 1)] {
            paint(&mut space, row + dr, col + dc, Maze2DCell::Empty);
        }
    }
    Ok(space)
}

/// A dotted cross through the middle plus 10% of random walls.
pub fn cross<R: Rng>(
    rows: usize,
    cols: usize,
    rng: &mut R,
) -> Result<Maze2DSpace, Maze2DSpaceError> {
    let mut space = Maze2DSpace::new_empty(rows, cols)?;
    let (mid_row, mid_col) = (rows / 2, cols / 2);

    for row in (0..rows).step_by(3).filter(|r| *r != mid_row) {
        paint(&mut space, row as i64, mid_col as i64, Maze2DCell::Wall);
    }
    for col in (0..cols).step_by(3).filter(|c| *c != mid_col) {
        paint(&mut space, mid_row as i64, col as i64, Maze2DCell::Wall);
    }
    for _ in 0..rows * cols / 10 {
        let row = rng.random_range(0..rows) as i64;
        let col = rng.random_range(0..cols) as i64;
        paint(&mut space, row, col, Maze2DCell::Wall);
    }
    Ok(space)
}

#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq, clap::ValueEnum)]
pub enum GeneratorKind {
    /// Cells are walls with a given probability.
    #[default]
    #[display("random walls")]
    RandomWalls,
    /// A maze with a single route between any two rooms.
    #[display("perfect")]
    Perfect,
    #[display("spiral")]
    Spiral,
    #[display("rooms")]
    Rooms,
    #[display("cross")]
    Cross,
    /// An empty room with a wall around it.
    #[display("open")]
    Open,
}

/// Parameters to build a problem out of a generator.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfig {
    pub rows: usize,
    pub cols: usize,
    pub generator: GeneratorKind,
    /// Used by `GeneratorKind::RandomWalls`.
    pub wall_probability: f64,
    /// Used by `GeneratorKind::Rooms`.
    pub room_count: usize,
    /// Defaults to `(1, 1)`.
    pub start: Option<Maze2DState>,
    /// Defaults to `(rows - 2, cols - 2)`.
    pub goal: Option<Maze2DState>,
    pub seed: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 30,
            generator: GeneratorKind::default(),
            wall_probability: 0.25,
            room_count: 5,
            start: None,
            goal: None,
            seed: 0,
        }
    }
}

impl SolverConfig {
    pub fn start(&self) -> Maze2DState {
        self.start.unwrap_or(Maze2DState::new(1, 1))
    }
    pub fn goal(&self) -> Maze2DState {
        self.goal.unwrap_or_else(|| {
            Maze2DState::new_from_usize(self.rows.saturating_sub(2), self.cols.saturating_sub(2))
                .unwrap_or(Maze2DState::new(0, 0))
        })
    }

    /// Generates a problem out of `seed`.
    pub fn generate(&self) -> Result<Maze2DProblem, Maze2DProblemError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.generate_with(&mut rng)
    }

    pub fn generate_with<R: Rng>(&self, rng: &mut R) -> Result<Maze2DProblem, Maze2DProblemError> {
        let (rows, cols) = (self.rows, self.cols);
        let (start, goal) = (self.start(), self.goal());

        let mut space = match self.generator {
            GeneratorKind::RandomWalls => random_walls(rows, cols, self.wall_probability, rng)?,
            GeneratorKind::Perfect => perfect(rows, cols, rng)?,
            GeneratorKind::Spiral => spiral(rows, cols)?,
            GeneratorKind::Rooms => rooms(rows, cols, self.room_count, &[start, goal], rng)?,
            GeneratorKind::Cross => cross(rows, cols, rng)?,
            GeneratorKind::Open => Maze2DSpace::new_walled(rows, cols)?,
        };
        space.set_cell(&start, Maze2DCell::Empty);
        space.set_cell(&goal, Maze2DCell::Empty);
        log::debug!(
            "Generated a {rows}x{cols} {} maze with {} walkable cells",
            self.generator,
            space.walkable_count()
        );

        Maze2DProblem::new(space, start, goal)
    }
}
