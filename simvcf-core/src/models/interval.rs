use std::fmt::{self, Display};

///
/// Closed genomic interval `[start, end]` in 1-based coordinates,
/// the same convention as VCF `POS`.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start: u64,
    pub end: u64,
}

impl Interval {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    pub fn single(position: u64) -> Self {
        Self::new(position, position)
    }

    /// Number of positions covered by the interval.
    pub fn width(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn contains(&self, position: u64) -> bool {
        self.start <= position && position <= self.end
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
