//! Predicates over half-open intervals `[start, end)`.
//!
//! Callers must only pass well-formed intervals (`start < end`).

use crate::models::TimeInterval;

/// Intervals that merely touch (`a.end == b.start`) do not overlap.
pub fn overlaps(a: &TimeInterval, b: &TimeInterval) -> bool {
    a.start < b.end && b.start < a.end
}

pub fn contains(window: &TimeInterval, interval: &TimeInterval) -> bool {
    window.start <= interval.start && window.end >= interval.end
}
