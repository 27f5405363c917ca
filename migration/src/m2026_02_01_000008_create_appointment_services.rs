//! Migration to create the appointment_services snapshot table.
//!
//! Each row freezes a service's price and duration as they were at booking
//! time, so later service edits cannot rewrite appointment history.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AppointmentServices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AppointmentServices::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AppointmentServices::AppointmentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AppointmentServices::ServiceId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AppointmentServices::PriceSnapshot)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AppointmentServices::DurationSnapshot)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointment_services_appointment_id")
                            .from(
                                AppointmentServices::Table,
                                AppointmentServices::AppointmentId,
                            )
                            .to(Appointments::Table, Appointments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointment_services_service_id")
                            .from(AppointmentServices::Table, AppointmentServices::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_appointment_services_appointment")
                    .table(AppointmentServices::Table)
                    .col(AppointmentServices::AppointmentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_appointment_services_appointment")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(AppointmentServices::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AppointmentServices {
    Table,
    Id,
    AppointmentId,
    ServiceId,
    PriceSnapshot,
    DurationSnapshot,
}

#[derive(DeriveIden)]
enum Appointments {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Services {
    Table,
    Id,
}
