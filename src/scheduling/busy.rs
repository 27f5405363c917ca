//! Busy interval aggregation.
//!
//! Collects every `scheduled` appointment and every time-off row
//! overlapping a range into one sorted, merged sequence of busy intervals.
//! The two sources are indistinguishable in the output; callers only see
//! covered time. Read-only.

use chrono::Utc;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::error::BookingError;
use crate::models::appointment::{self, Entity as Appointment, STATUS_SCHEDULED};
use crate::models::time_off::{self, Entity as TimeOff};
use crate::scheduling::interval::{Interval, merge_intervals};

/// Merged busy intervals for one staff member over `range`.
///
/// Generic over the connection so the availability read path can run it on
/// the pool while the booking engine can reuse it inside a transaction.
pub async fn busy_intervals<C: ConnectionTrait>(
    conn: &C,
    staff_id: Uuid,
    range: Interval,
) -> Result<Vec<Interval>, BookingError> {
    let mut busy: Vec<Interval> = Vec::new();

    let appointments = Appointment::find()
        .filter(appointment::Column::StaffId.eq(staff_id))
        .filter(appointment::Column::Status.eq(STATUS_SCHEDULED))
        .filter(appointment::Column::StartAt.lt(range.end))
        .filter(appointment::Column::EndAt.gt(range.start))
        .all(conn)
        .await?;

    busy.extend(appointments.iter().map(|appt| {
        Interval::new(
            appt.start_at.with_timezone(&Utc),
            appt.end_at.with_timezone(&Utc),
        )
    }));

    let time_off = TimeOff::find()
        .filter(time_off::Column::StaffId.eq(staff_id))
        .filter(time_off::Column::StartAt.lt(range.end))
        .filter(time_off::Column::EndAt.gt(range.start))
        .all(conn)
        .await?;

    busy.extend(time_off.iter().map(|off| {
        Interval::new(
            off.start_at.with_timezone(&Utc),
            off.end_at.with_timezone(&Utc),
        )
    }));

    Ok(merge_intervals(busy))
}
