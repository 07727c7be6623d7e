use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(Wallet::Table)
                .if_not_exists()
                .col(ColumnDef::new(Wallet::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Wallet::UserId).string().not_null())
                .col(ColumnDef::new(Wallet::Name).string().not_null())
                .col(ColumnDef::new(Wallet::Balance).decimal().not_null().default(0))
                .col(
                    ColumnDef::new(Wallet::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_wallet_user_profile")
                        .from(Wallet::Table, Wallet::UserId)
                        .to(UserProfile::Table, UserProfile::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .to_owned()
        ).await?;

        // Main wallet lookup is by owner, oldest first
        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_wallet_user_created")
                .table(Wallet::Table)
                .col(Wallet::UserId)
                .col(Wallet::CreatedAt)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Wallet::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Wallet {
    Table,
    Id,
    UserId,
    Name,
    Balance,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserProfile {
    Table,
    Id,
}
