use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(WalletTransaction::Table)
                .if_not_exists()
                .col(ColumnDef::new(WalletTransaction::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(WalletTransaction::WalletId).uuid().not_null())
                .col(ColumnDef::new(WalletTransaction::Amount).decimal().not_null())
                .col(ColumnDef::new(WalletTransaction::Description).text().not_null())
                .col(ColumnDef::new(WalletTransaction::Kind).string_len(32).not_null())
                .col(ColumnDef::new(WalletTransaction::Status).string_len(20).not_null())
                .col(
                    ColumnDef::new(WalletTransaction::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_wallet_transaction_wallet")
                        .from(WalletTransaction::Table, WalletTransaction::WalletId)
                        .to(Wallet::Table, Wallet::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_wallet_transaction_wallet_created")
                .table(WalletTransaction::Table)
                .col(WalletTransaction::WalletId)
                .col(WalletTransaction::CreatedAt)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(WalletTransaction::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum WalletTransaction {
    Table,
    Id,
    WalletId,
    Amount,
    Description,
    Kind,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Wallet {
    Table,
    Id,
}
