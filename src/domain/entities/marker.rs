//! Marker entity module
//!
//! `.hold` / `.release` marker files are empty; only their presence and
//! kind matter (spec §3, §4.8). `MarkerKind` models the mutual-exclusion
//! invariant: writing one kind for a job always removes the other.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Hold,
    Release,
}

impl MarkerKind {
    pub fn extension(self) -> &'static str {
        match self {
            MarkerKind::Hold => "hold",
            MarkerKind::Release => "release",
        }
    }

    pub fn opposite(self) -> MarkerKind {
        match self {
            MarkerKind::Hold => MarkerKind::Release,
            MarkerKind::Release => MarkerKind::Hold,
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// The marker state observed for one `(family, job)` pair on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarkerState {
    pub held: bool,
    pub released: bool,
}

impl MarkerState {
    pub fn none() -> Self {
        Self::default()
    }
}
