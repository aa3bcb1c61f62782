//! Placement policies for satisfying allocation requests.

use std::fmt;

/// How a pool chooses which gap satisfies an allocation request.
///
/// Both policies fail with `OutOfSpace` when no gap is large enough.
/// When exactly one gap can hold the request, the two policies pick the
/// same segment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlacementPolicy {
    /// Walk the segment list in address order and take the first gap
    /// that fits. Cheap per lookup; tends to fragment the low end of
    /// the pool.
    #[default]
    FirstFit,
    /// Take the smallest gap that fits, lowest offset on ties. Served
    /// directly from the size-ordered gap index.
    BestFit,
}

impl fmt::Display for PlacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstFit => write!(f, "first-fit"),
            Self::BestFit => write!(f, "best-fit"),
        }
    }
}
