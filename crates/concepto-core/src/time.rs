//! Time representation for timeline placement.
//!
//! The store keeps slide and track positions as fractional seconds, and
//! all sync tolerances (drift, debounce) are defined in seconds, so the
//! engine works in `f64` seconds throughout. Values arriving from
//! gestures or the store may be negative or non-finite; the clamping
//! helpers here repair them instead of rejecting, since an interactive
//! drag must never fail mid-gesture.

use serde::{Deserialize, Serialize};

use crate::constants::MIN_DURATION;

/// Timeline position or duration in seconds.
pub type Seconds = f64;

/// Clamp a proposed start time into domain: non-negative and finite.
///
/// All non-finite values, infinities included, collapse to the origin:
/// they only arise from corrupt documents, where no meaningful position
/// survives, and the origin keeps the repaired slide visible instead of
/// stranding it past every reachable scroll position.
#[inline]
pub fn clamp_start(start: Seconds) -> Seconds {
    if start.is_finite() {
        start.max(0.0)
    } else {
        0.0
    }
}

/// Clamp a proposed duration into domain: at least `MIN_DURATION` and finite.
#[inline]
pub fn clamp_duration(duration: Seconds) -> Seconds {
    if duration.is_finite() {
        duration.max(MIN_DURATION)
    } else {
        MIN_DURATION
    }
}

/// A half-open time range `[start, start + duration)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start time (inclusive)
    pub start: Seconds,
    /// Duration of the range
    pub duration: Seconds,
}

impl TimeRange {
    /// Create a new time range from start and duration.
    #[inline]
    pub fn new(start: Seconds, duration: Seconds) -> Self {
        Self { start, duration }
    }

    /// End time (exclusive).
    #[inline]
    pub fn end(self) -> Seconds {
        self.start + self.duration
    }

    /// Check if a position is within this range.
    #[inline]
    pub fn contains(self, position: Seconds) -> bool {
        position >= self.start && position < self.end()
    }

    /// Check if two ranges overlap.
    pub fn overlaps(self, other: Self) -> bool {
        self.start < other.end() && other.start < self.end()
    }

    /// Empty range starting at zero.
    pub const EMPTY: Self = Self {
        start: 0.0,
        duration: 0.0,
    };
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::EMPTY
    }
}
