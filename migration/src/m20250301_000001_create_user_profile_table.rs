use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(UserProfile::Table)
                .if_not_exists()
                .col(ColumnDef::new(UserProfile::Id).string().not_null().primary_key())
                .col(ColumnDef::new(UserProfile::Email).string().not_null())
                .col(ColumnDef::new(UserProfile::Balance).decimal().not_null().default(0))
                .col(ColumnDef::new(UserProfile::WithdrawalNequi).string_len(32).null())
                .col(ColumnDef::new(UserProfile::NequiOwnerName).string().null())
                .col(ColumnDef::new(UserProfile::WithdrawalUsdtBep20).string_len(64).null())
                .col(
                    ColumnDef::new(UserProfile::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .col(
                    ColumnDef::new(UserProfile::UpdatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .to_owned()
        ).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserProfile::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UserProfile {
    Table,
    Id,
    Email,
    Balance,
    WithdrawalNequi,
    NequiOwnerName,
    WithdrawalUsdtBep20,
    CreatedAt,
    UpdatedAt,
}
