//! Distance estimates between grid positions.

use std::str::FromStr;

use derive_more::Display;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::cost::FloatCost;
use crate::space::State;

/// A state with integer grid coordinates.
pub trait GridPosition: State {
    fn row(&self) -> i64;
    fn col(&self) -> i64;
}

impl GridPosition for crate::problems::maze_2d::Maze2DState {
    #[inline(always)]
    fn row(&self) -> i64 {
        i64::from(self.row)
    }
    #[inline(always)]
    fn col(&self) -> i64 {
        i64::from(self.col)
    }
}

#[inline(always)]
fn deltas<P: GridPosition>(a: &P, b: &P) -> (u64, u64) {
    (a.row().abs_diff(b.row()), a.col().abs_diff(b.col()))
}

/// `|Δrow| + |Δcol|`, the exact distance on an open 4-connected grid.
#[inline(always)]
pub fn manhattan<P: GridPosition>(a: &P, b: &P) -> f64 {
    let (dr, dc) = deltas(a, b);
    (dr + dc) as f64
}

/// Straight-line distance.
#[inline(always)]
pub fn euclidean<P: GridPosition>(a: &P, b: &P) -> f64 {
    let (dr, dc) = deltas(a, b);
    (dr as f64).hypot(dc as f64)
}

/// `max(|Δrow|, |Δcol|)`, the exact distance on an open 8-connected grid.
#[inline(always)]
pub fn chebyshev<P: GridPosition>(a: &P, b: &P) -> f64 {
    let (dr, dc) = deltas(a, b);
    dr.max(dc) as f64
}

/// The movement model under which a heuristic is the exact open-grid distance.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum Movement {
    #[display("4-way")]
    FourWay,
    #[display("8-way")]
    EightWay,
    #[display("any-angle")]
    AnyAngle,
}

#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    Eq,
    Hash,
    clap::ValueEnum,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Heuristic {
    #[default]
    Manhattan,
    Euclidean,
    /// Matches diagonal movement, but still never exceeds the 4-way distance.
    Chebyshev,
}

impl Heuristic {
    pub const ALL: [Heuristic; 3] = [
        Heuristic::Manhattan,
        Heuristic::Euclidean,
        Heuristic::Chebyshev,
    ];

    #[inline(always)]
    pub fn estimate<P: GridPosition>(&self, a: &P, b: &P) -> f64 {
        match self {
            Heuristic::Manhattan => manhattan(a, b),
            Heuristic::Euclidean => euclidean(a, b),
            Heuristic::Chebyshev => chebyshev(a, b),
        }
    }

    #[inline(always)]
    pub fn h<P: GridPosition>(&self, a: &P, b: &P) -> FloatCost {
        FloatCost::new(self.estimate(a, b))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Heuristic::Manhattan => "manhattan",
            Heuristic::Euclidean => "euclidean",
            Heuristic::Chebyshev => "chebyshev",
        }
    }

    pub fn movement(&self) -> Movement {
        match self {
            Heuristic::Manhattan => Movement::FourWay,
            Heuristic::Euclidean => Movement::AnyAngle,
            Heuristic::Chebyshev => Movement::EightWay,
        }
    }

    /// Whether the estimate never exceeds the true 4-way distance.
    ///
    /// Chebyshev is tuned for diagonal moves, yet `max(dr, dc) <= dr + dc`
    /// keeps it below Manhattan, so it is admissible here too.
    pub fn is_admissible(&self) -> bool {
        match self {
            Heuristic::Manhattan | Heuristic::Euclidean | Heuristic::Chebyshev => true,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeuristicParseError {
    #[error("Unknown heuristic '{0}', expected one of manhattan, euclidean, chebyshev")]
    Unknown(String),
}

impl FromStr for Heuristic {
    type Err = HeuristicParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Heuristic::ALL
            .into_iter()
            .find(|h| h.name() == lower)
            .ok_or(HeuristicParseError::Unknown(s.to_string()))
    }
}
