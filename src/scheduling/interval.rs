//! Half-open time intervals and merge arithmetic.
//!
//! Every interval in the engine is `[start, end)` in UTC. Two intervals
//! overlap iff `s1 < e2 && s2 < e1`; touching endpoints do not overlap.

use chrono::{DateTime, Utc};

/// A half-open interval `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start <= end, "interval start must not exceed end");
        Self { start, end }
    }

    /// Half-open overlap test; sharing an endpoint is not an overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether any interval in `busy` overlaps this one.
    pub fn overlaps_any(&self, busy: &[Interval]) -> bool {
        busy.iter().any(|b| self.overlaps(b))
    }
}

/// Sorts intervals by start and merges every overlapping or touching pair
/// into a single covering interval.
pub fn merge_intervals(mut intervals: Vec<Interval>) -> Vec<Interval> {
    if intervals.is_empty() {
        return intervals;
    }

    intervals.sort_by_key(|iv| iv.start);

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for iv in intervals {
        match merged.last_mut() {
            // Touching intervals collapse too; the busy model only cares
            // about covered time, not how many sources covered it.
            Some(last) if iv.start <= last.end => {
                if iv.end > last.end {
                    last.end = iv.end;
                }
            }
            _ => merged.push(iv),
        }
    }

    merged
}
