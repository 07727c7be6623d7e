use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Singleton rows keyed "main", maintained by the admin process
        manager.create_table(
            Table::create()
                .table(WithdrawalConfig::Table)
                .if_not_exists()
                .col(ColumnDef::new(WithdrawalConfig::Id).string_len(16).not_null().primary_key())
                .col(ColumnDef::new(WithdrawalConfig::FeePercentage).decimal().not_null())
                .col(ColumnDef::new(WithdrawalConfig::MinWithdrawal).decimal().not_null())
                .col(ColumnDef::new(WithdrawalConfig::DailyLimit).integer().not_null())
                .col(ColumnDef::new(WithdrawalConfig::AllowedDays).string().not_null())
                .col(ColumnDef::new(WithdrawalConfig::StartTime).string_len(5).not_null())
                .col(ColumnDef::new(WithdrawalConfig::EndTime).string_len(5).not_null())
                .col(
                    ColumnDef::new(WithdrawalConfig::UpdatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .to_owned()
        ).await?;

        manager.create_table(
            Table::create()
                .table(AppConfig::Table)
                .if_not_exists()
                .col(ColumnDef::new(AppConfig::Id).string_len(16).not_null().primary_key())
                .col(ColumnDef::new(AppConfig::CopExchangeRate).decimal().not_null())
                .col(
                    ColumnDef::new(AppConfig::UpdatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(AppConfig::Table).to_owned()).await?;

        manager.drop_table(Table::drop().table(WithdrawalConfig::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum WithdrawalConfig {
    Table,
    Id,
    FeePercentage,
    MinWithdrawal,
    DailyLimit,
    AllowedDays,
    StartTime,
    EndTime,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AppConfig {
    Table,
    Id,
    CopExchangeRate,
    UpdatedAt,
}
