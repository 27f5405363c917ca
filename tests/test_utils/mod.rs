//! Test utilities for database testing.
//!
//! This module provides utilities for setting up in-memory SQLite databases
//! with migrations for testing purposes, plus fixture helpers for the
//! booking domain.

use anyhow::Result;
use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Set, Statement};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use bookings::auth::{AuthContext, Capability, TenantId};
use bookings::models::{
    service, staff_service, tenant, time_off, user,
    user::{ROLE_ADMIN, ROLE_CLIENT, ROLE_STAFF},
    working_hour,
};
use bookings::scheduling::BookingEngine;
use migration::{Migrator, MigratorTrait};

/// Sets up an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;

    Migrator::up(&db, None).await?;

    // SQLite does not enforce our Postgres foreign key semantics; disable FK
    // checks so fixtures can be inserted in any order.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "PRAGMA foreign_keys = OFF".to_string(),
    ))
    .await?;

    Ok(db)
}

/// Sets up an in-memory SQLite database and returns an Arc.
pub async fn setup_test_db_arc() -> Result<Arc<DatabaseConnection>> {
    let db = setup_test_db().await?;
    Ok(Arc::new(db))
}

/// Builds a booking engine over the shared test connection with a short
/// lock timeout.
#[allow(dead_code)]
pub fn test_engine(db: &Arc<DatabaseConnection>) -> BookingEngine {
    BookingEngine::new(Arc::clone(db), Duration::from_millis(2_000))
}

/// Creates a test tenant and returns its id.
pub async fn create_test_tenant(db: &DatabaseConnection) -> Result<Uuid> {
    let id = Uuid::new_v4();
    tenant::ActiveModel {
        id: Set(id),
        name: Set("Test Tenant".to_string()),
        created_at: Set(Utc::now().fixed_offset()),
    }
    .insert(db)
    .await?;
    Ok(id)
}

/// Creates a client principal in the tenant.
#[allow(dead_code)]
pub async fn create_client(db: &DatabaseConnection, tenant_id: Uuid) -> Result<Uuid> {
    create_user(db, tenant_id, ROLE_CLIENT, false).await
}

/// Creates a bookable staff principal in the tenant.
#[allow(dead_code)]
pub async fn create_staff(db: &DatabaseConnection, tenant_id: Uuid) -> Result<Uuid> {
    create_user(db, tenant_id, ROLE_STAFF, true).await
}

/// Creates an admin principal in the tenant.
#[allow(dead_code)]
pub async fn create_admin(db: &DatabaseConnection, tenant_id: Uuid) -> Result<Uuid> {
    create_user(db, tenant_id, ROLE_ADMIN, false).await
}

/// Creates a principal with an explicit role and bookable flag.
pub async fn create_user(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    role: &str,
    bookable_active: bool,
) -> Result<Uuid> {
    let id = Uuid::new_v4();
    user::ActiveModel {
        id: Set(id),
        tenant_id: Set(tenant_id),
        name: Set(format!("{role}-{}", &id.to_string()[..8])),
        email: Set(format!("{}@example.test", &id.to_string()[..8])),
        role: Set(role.to_string()),
        bookable_active: Set(bookable_active),
        created_at: Set(Utc::now().fixed_offset()),
    }
    .insert(db)
    .await?;
    Ok(id)
}

/// Creates a service in the tenant.
#[allow(dead_code)]
pub async fn create_service(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    duration_minutes: i32,
    price: Decimal,
    active: bool,
) -> Result<Uuid> {
    let id = Uuid::new_v4();
    service::ActiveModel {
        id: Set(id),
        tenant_id: Set(tenant_id),
        name: Set(format!("Service {}", &id.to_string()[..8])),
        duration_minutes: Set(duration_minutes),
        price: Set(price),
        active: Set(active),
        created_at: Set(Utc::now().fixed_offset()),
    }
    .insert(db)
    .await?;
    Ok(id)
}

/// Assigns a service to a staff member.
#[allow(dead_code)]
pub async fn assign_service(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    staff_id: Uuid,
    service_id: Uuid,
) -> Result<()> {
    staff_service::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        staff_id: Set(staff_id),
        service_id: Set(service_id),
    }
    .insert(db)
    .await?;
    Ok(())
}

/// Declares a recurring working-hour range for a staff member.
#[allow(dead_code)]
pub async fn add_working_hours(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    staff_id: Uuid,
    weekday: i16,
    start: (u32, u32),
    end: (u32, u32),
) -> Result<Uuid> {
    let id = Uuid::new_v4();
    working_hour::ActiveModel {
        id: Set(id),
        tenant_id: Set(tenant_id),
        staff_id: Set(staff_id),
        weekday: Set(weekday),
        start_time: Set(NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap()),
        end_time: Set(NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap()),
    }
    .insert(db)
    .await?;
    Ok(id)
}

/// Declares working hours covering every weekday, 00:00 to 23:59.
#[allow(dead_code)]
pub async fn add_all_week_hours(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    staff_id: Uuid,
) -> Result<()> {
    for weekday in 0..7 {
        add_working_hours(db, tenant_id, staff_id, weekday, (0, 0), (23, 59)).await?;
    }
    Ok(())
}

/// Declares a one-off time-off interval for a staff member.
#[allow(dead_code)]
pub async fn add_time_off(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    staff_id: Uuid,
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
) -> Result<Uuid> {
    let id = Uuid::new_v4();
    time_off::ActiveModel {
        id: Set(id),
        tenant_id: Set(tenant_id),
        staff_id: Set(staff_id),
        start_at: Set(start_at.fixed_offset()),
        end_at: Set(end_at.fixed_offset()),
        reason: Set(None),
    }
    .insert(db)
    .await?;
    Ok(id)
}

/// Builds an auth context for a principal.
#[allow(dead_code)]
pub fn auth_ctx(tenant_id: Uuid, user_id: Uuid, capability: Capability) -> AuthContext {
    AuthContext {
        tenant_id: TenantId(tenant_id),
        user_id,
        capability,
    }
}

/// A start time safely in the future, aligned to midnight plus the given
/// hour so it always lands inside all-week working hours.
#[allow(dead_code)]
pub fn future_start(days_ahead: i64, hour: u32, minute: u32) -> DateTime<Utc> {
    let date = Utc::now().date_naive() + chrono::Duration::days(days_ahead);
    date.and_hms_opt(hour, minute, 0)
        .expect("valid fixture time")
        .and_utc()
}
