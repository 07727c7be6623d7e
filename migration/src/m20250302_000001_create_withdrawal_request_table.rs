use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(WithdrawalRequest::Table)
                .if_not_exists()
                .col(ColumnDef::new(WithdrawalRequest::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(WithdrawalRequest::UserId).string().not_null())
                .col(ColumnDef::new(WithdrawalRequest::UserEmail).string().not_null())
                .col(ColumnDef::new(WithdrawalRequest::WalletId).uuid().not_null())
                .col(ColumnDef::new(WithdrawalRequest::TransactionId).uuid().not_null())
                .col(ColumnDef::new(WithdrawalRequest::TotalAmount).decimal().not_null())
                .col(ColumnDef::new(WithdrawalRequest::FeeAmount).decimal().not_null())
                .col(ColumnDef::new(WithdrawalRequest::NetAmount).decimal().not_null())
                .col(ColumnDef::new(WithdrawalRequest::Method).string_len(20).not_null())
                .col(ColumnDef::new(WithdrawalRequest::WalletAddress).string().not_null())
                .col(ColumnDef::new(WithdrawalRequest::NequiOwnerName).string().null())
                .col(ColumnDef::new(WithdrawalRequest::Status).string_len(20).not_null())
                .col(ColumnDef::new(WithdrawalRequest::RequestDay).string_len(10).not_null())
                .col(ColumnDef::new(WithdrawalRequest::IdempotencyKey).uuid().not_null())
                .col(
                    ColumnDef::new(WithdrawalRequest::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_withdrawal_request_transaction")
                        .from(WithdrawalRequest::Table, WithdrawalRequest::TransactionId)
                        .to(WalletTransaction::Table, WalletTransaction::Id)
                        .on_delete(ForeignKeyAction::Restrict)
                )
                .to_owned()
        ).await?;

        // Daily limit counting
        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_withdrawal_request_user_day")
                .table(WithdrawalRequest::Table)
                .col(WithdrawalRequest::UserId)
                .col(WithdrawalRequest::RequestDay)
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_withdrawal_request_idempotency")
                .table(WithdrawalRequest::Table)
                .col(WithdrawalRequest::UserId)
                .col(WithdrawalRequest::IdempotencyKey)
                .unique()
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(WithdrawalRequest::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum WithdrawalRequest {
    Table,
    Id,
    UserId,
    UserEmail,
    WalletId,
    TransactionId,
    TotalAmount,
    FeeAmount,
    NetAmount,
    Method,
    WalletAddress,
    NequiOwnerName,
    Status,
    RequestDay,
    IdempotencyKey,
    CreatedAt,
}

#[derive(DeriveIden)]
enum WalletTransaction {
    Table,
    Id,
}
