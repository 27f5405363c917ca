//! Database migrations for the Bookings API.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2026_02_01_000001_create_tenants;
mod m2026_02_01_000002_create_users;
mod m2026_02_01_000003_create_services;
mod m2026_02_01_000004_create_staff_services;
mod m2026_02_01_000005_create_working_hours;
mod m2026_02_01_000006_create_time_off;
mod m2026_02_01_000007_create_appointments;
mod m2026_02_01_000008_create_appointment_services;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2026_02_01_000001_create_tenants::Migration),
            Box::new(m2026_02_01_000002_create_users::Migration),
            Box::new(m2026_02_01_000003_create_services::Migration),
            Box::new(m2026_02_01_000004_create_staff_services::Migration),
            Box::new(m2026_02_01_000005_create_working_hours::Migration),
            Box::new(m2026_02_01_000006_create_time_off::Migration),
            Box::new(m2026_02_01_000007_create_appointments::Migration),
            Box::new(m2026_02_01_000008_create_appointment_services::Migration),
        ]
    }
}
