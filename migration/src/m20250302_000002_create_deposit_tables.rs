use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(DepositNetwork::Table)
                .if_not_exists()
                .col(ColumnDef::new(DepositNetwork::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(DepositNetwork::Name).string().not_null())
                .col(ColumnDef::new(DepositNetwork::Address).string().not_null())
                .col(ColumnDef::new(DepositNetwork::QrCodeUrl).string().null())
                .col(ColumnDef::new(DepositNetwork::Kind).string_len(10).not_null())
                .col(
                    ColumnDef::new(DepositNetwork::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .to_owned()
        ).await?;

        manager.create_table(
            Table::create()
                .table(DepositRequest::Table)
                .if_not_exists()
                .col(ColumnDef::new(DepositRequest::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(DepositRequest::UserId).string().not_null())
                .col(ColumnDef::new(DepositRequest::WalletId).uuid().not_null())
                .col(ColumnDef::new(DepositRequest::NetworkName).string().not_null())
                .col(ColumnDef::new(DepositRequest::Amount).decimal().not_null())
                .col(ColumnDef::new(DepositRequest::Currency).string_len(3).not_null())
                .col(ColumnDef::new(DepositRequest::AmountUsd).decimal().not_null())
                .col(ColumnDef::new(DepositRequest::ReferenceNumber).string().not_null())
                .col(ColumnDef::new(DepositRequest::Status).string_len(20).not_null())
                .col(
                    ColumnDef::new(DepositRequest::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_deposit_request_user")
                .table(DepositRequest::Table)
                .col(DepositRequest::UserId)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(DepositRequest::Table).to_owned()).await?;

        manager.drop_table(Table::drop().table(DepositNetwork::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum DepositNetwork {
    Table,
    Id,
    Name,
    Address,
    QrCodeUrl,
    Kind,
    CreatedAt,
}

#[derive(DeriveIden)]
enum DepositRequest {
    Table,
    Id,
    UserId,
    WalletId,
    NetworkName,
    Amount,
    Currency,
    AmountUsd,
    ReferenceNumber,
    Status,
    CreatedAt,
}
