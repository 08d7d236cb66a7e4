use std::fmt;

// Cardinality: how many elements a dataset produces per pass
//
// Finite datasets know their exact count (window generators, in-memory
// vectors). `repeat(None)` makes a dataset infinite. Filters or user streams
// whose length cannot be known ahead of time report Unknown.

/// Number of elements one pass over a dataset yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    Finite(usize),
    Infinite,
    Unknown,
}

impl Cardinality {
    /// The exact count, if finite.
    pub fn as_finite(&self) -> Option<usize> {
        match self {
            Cardinality::Finite(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Cardinality::Infinite)
    }

    /// Whether the dataset is known to produce nothing.
    pub fn is_empty(&self) -> bool {
        matches!(self, Cardinality::Finite(0))
    }

    /// Apply `f` to a finite count, leaving Infinite/Unknown untouched.
    pub fn map_finite(self, f: impl FnOnce(usize) -> usize) -> Self {
        match self {
            Cardinality::Finite(n) => Cardinality::Finite(f(n)),
            other => other,
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::Finite(n) => write!(f, "{n}"),
            Cardinality::Infinite => write!(f, "infinite"),
            Cardinality::Unknown => write!(f, "unknown"),
        }
    }
}
