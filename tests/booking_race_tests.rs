//! Concurrency tests for the booking critical section.

use anyhow::Result;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use bookings::error::BookingError;
use bookings::models::appointment::{self, STATUS_SCHEDULED};
use bookings::scheduling::BookingRequest;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::*;

#[tokio::test]
async fn concurrent_bookings_for_one_slot_commit_exactly_once() -> Result<()> {
    let db = setup_test_db_arc().await?;
    let tenant = create_test_tenant(&db).await?;
    let client_a = create_client(&db, tenant).await?;
    let client_b = create_client(&db, tenant).await?;
    let staff = create_staff(&db, tenant).await?;
    let svc = create_service(&db, tenant, 60, Decimal::new(5000, 2), true).await?;
    assign_service(&db, tenant, staff, svc).await?;
    add_all_week_hours(&db, tenant, staff).await?;

    let engine = test_engine(&db);
    let tenant_id = bookings::auth::TenantId(tenant);
    let start = future_start(2, 10, 0);

    let (first, second) = tokio::join!(
        engine.book(
            tenant_id,
            BookingRequest {
                client_id: client_a,
                staff_id: staff,
                start_at: start,
                service_ids: vec![svc],
            },
        ),
        engine.book(
            tenant_id,
            BookingRequest {
                client_id: client_b,
                staff_id: staff,
                start_at: start,
                service_ids: vec![svc],
            },
        ),
    );

    let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one booking must win the slot");

    let loser = if first.is_err() { first } else { second };
    assert!(matches!(loser, Err(BookingError::Conflict)));

    let committed = appointment::Entity::find()
        .filter(appointment::Column::StaffId.eq(staff))
        .filter(appointment::Column::Status.eq(STATUS_SCHEDULED))
        .all(db.as_ref())
        .await?;
    assert_eq!(committed.len(), 1);

    Ok(())
}

#[tokio::test]
async fn scheduled_rows_for_one_staff_member_never_overlap() -> Result<()> {
    let db = setup_test_db_arc().await?;
    let tenant = create_test_tenant(&db).await?;
    let client = create_client(&db, tenant).await?;
    let staff = create_staff(&db, tenant).await?;
    let svc = create_service(&db, tenant, 30, Decimal::new(3000, 2), true).await?;
    assign_service(&db, tenant, staff, svc).await?;
    add_all_week_hours(&db, tenant, staff).await?;

    let engine = test_engine(&db);
    let tenant_id = bookings::auth::TenantId(tenant);

    // Fire a burst of attempts over a lattice of overlapping start times.
    let mut results = Vec::new();
    for minute in [0u32, 15, 30, 45] {
        for hour in [9u32, 10] {
            results.push(
                engine
                    .book(
                        tenant_id,
                        BookingRequest {
                            client_id: client,
                            staff_id: staff,
                            start_at: future_start(2, hour, minute),
                            service_ids: vec![svc],
                        },
                    )
                    .await,
            );
        }
    }
    assert!(results.iter().any(|r| r.is_ok()));

    let committed = appointment::Entity::find()
        .filter(appointment::Column::StaffId.eq(staff))
        .filter(appointment::Column::Status.eq(STATUS_SCHEDULED))
        .all(db.as_ref())
        .await?;

    for a in &committed {
        for b in &committed {
            if a.id == b.id {
                continue;
            }
            let disjoint = a.end_at.with_timezone(&Utc) <= b.start_at.with_timezone(&Utc)
                || b.end_at.with_timezone(&Utc) <= a.start_at.with_timezone(&Utc);
            assert!(disjoint, "scheduled rows {:?} and {:?} overlap", a.id, b.id);
        }
    }

    Ok(())
}
