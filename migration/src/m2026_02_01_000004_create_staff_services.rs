//! Migration to create the staff_services assignment table.
//!
//! A staff member can only be booked for services assigned to them here.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StaffServices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StaffServices::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StaffServices::TenantId).uuid().not_null())
                    .col(ColumnDef::new(StaffServices::StaffId).uuid().not_null())
                    .col(ColumnDef::new(StaffServices::ServiceId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_staff_services_staff_id")
                            .from(StaffServices::Table, StaffServices::StaffId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_staff_services_service_id")
                            .from(StaffServices::Table, StaffServices::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_staff_services_staff_service")
                    .table(StaffServices::Table)
                    .col(StaffServices::StaffId)
                    .col(StaffServices::ServiceId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_staff_services_staff_service")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(StaffServices::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum StaffServices {
    Table,
    Id,
    TenantId,
    StaffId,
    ServiceId,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Services {
    Table,
    Id,
}
