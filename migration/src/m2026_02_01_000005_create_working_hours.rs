//! Migration to create the working_hours table.
//!
//! Recurring weekly open intervals per staff member. Times are stored as
//! time-of-day; the weekday is 0 (Sunday) through 6 (Saturday).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkingHours::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkingHours::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WorkingHours::TenantId).uuid().not_null())
                    .col(ColumnDef::new(WorkingHours::StaffId).uuid().not_null())
                    .col(
                        ColumnDef::new(WorkingHours::Weekday)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WorkingHours::StartTime).time().not_null())
                    .col(ColumnDef::new(WorkingHours::EndTime).time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_working_hours_staff_id")
                            .from(WorkingHours::Table, WorkingHours::StaffId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_working_hours_staff_weekday")
                    .table(WorkingHours::Table)
                    .col(WorkingHours::StaffId)
                    .col(WorkingHours::Weekday)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_working_hours_staff_weekday")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(WorkingHours::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum WorkingHours {
    Table,
    Id,
    TenantId,
    StaffId,
    Weekday,
    StartTime,
    EndTime,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
