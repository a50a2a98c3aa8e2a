use derive_more::Display;
use ordered_float::OrderedFloat;

/// A totally ordered `f64` used to rank frontier entries.
///
/// Heuristics like the Euclidean distance are real valued, so priorities
/// can't just be integers. `OrderedFloat` gives us `Ord` so these can key a
/// heap.
#[derive(Copy, Clone, Default, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
#[display("${_0}")]
pub struct FloatCost(pub OrderedFloat<f64>);

impl FloatCost {
    #[inline(always)]
    pub fn new(f: f64) -> Self {
        Self(OrderedFloat(f))
    }
    #[inline(always)]
    pub fn zero() -> Self {
        Self::new(0.0)
    }
    #[inline(always)]
    pub fn infinity() -> Self {
        Self::new(f64::INFINITY)
    }
    #[inline(always)]
    pub fn get(&self) -> f64 {
        self.0.into_inner()
    }
}

impl From<u32> for FloatCost {
    fn from(c: u32) -> Self {
        Self::new(f64::from(c))
    }
}

impl std::ops::Add for FloatCost {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for FloatCost {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}
