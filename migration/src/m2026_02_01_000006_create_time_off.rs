//! Migration to create the time_off table.
//!
//! One-off closed intervals (vacation, breaks) per staff member.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TimeOff::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TimeOff::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(TimeOff::TenantId).uuid().not_null())
                    .col(ColumnDef::new(TimeOff::StaffId).uuid().not_null())
                    .col(
                        ColumnDef::new(TimeOff::StartAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TimeOff::EndAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TimeOff::Reason).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_time_off_staff_id")
                            .from(TimeOff::Table, TimeOff::StaffId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_time_off_staff_start")
                    .table(TimeOff::Table)
                    .col(TimeOff::StaffId)
                    .col(TimeOff::StartAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_time_off_staff_start").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TimeOff::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TimeOff {
    Table,
    Id,
    TenantId,
    StaffId,
    StartAt,
    EndAt,
    Reason,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
