//! Availability slot generation.
//!
//! Walks each working-hour range on the target day at a fixed step, emitting
//! every cursor whose candidate interval fits inside the range and misses
//! every busy interval. Generation is independent of "now"; filtering
//! past-dated starts is the booking path's policy, not the generator's.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::working_hour;
use crate::scheduling::interval::Interval;

pub const DEFAULT_DURATION_MINUTES: i64 = 30;
pub const DEFAULT_STEP_MINUTES: i64 = 15;
pub const MIN_STEP_MINUTES: i64 = 5;
pub const MAX_STEP_MINUTES: i64 = 60;
pub const MIN_DURATION_MINUTES: i64 = 1;
pub const MAX_DURATION_MINUTES: i64 = 480;

/// The UTC day `[midnight, midnight + 24h)` for a date.
pub fn day_bounds(date: NaiveDate) -> Interval {
    let start = date
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
        .and_utc();
    Interval::new(start, start + Duration::days(1))
}

/// Free slot start times for one day.
///
/// Ranges are evaluated in their own time order; because ranges for one
/// weekday never overlap, the output is ascending by start time.
pub fn generate_slots(
    date: NaiveDate,
    ranges: &[working_hour::Model],
    busy: &[Interval],
    duration_minutes: i64,
    step_minutes: i64,
) -> Vec<DateTime<Utc>> {
    let duration = Duration::minutes(duration_minutes);
    let step = Duration::minutes(step_minutes);

    let mut ranges: Vec<&working_hour::Model> = ranges.iter().collect();
    ranges.sort_by_key(|range| range.start_time);

    let mut slots = Vec::new();

    for range in ranges {
        let range_start = date.and_time(range.start_time).and_utc();
        let range_end = date.and_time(range.end_time).and_utc();

        let mut cursor = range_start;
        while cursor + duration <= range_end {
            let candidate = Interval::new(cursor, cursor + duration);
            if !candidate.overlaps_any(busy) {
                slots.push(cursor);
            }
            cursor += step;
        }
    }

    slots
}

/// The collapsed single-point check used by the booking path: does
/// `[start_at, end_at)` fit entirely within some declared range on the
/// start's weekday? The ranges passed in must already be the start day's.
pub fn fits_working_hours(
    ranges: &[working_hour::Model],
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
) -> bool {
    let date = start_at.date_naive();

    ranges.iter().any(|range| {
        let range_start = date.and_time(range.start_time).and_utc();
        let range_end = date.and_time(range.end_time).and_utc();
        start_at >= range_start && end_at <= range_end
    })
}
