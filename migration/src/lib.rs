pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_user_profile_table;
mod m20250301_000002_create_wallet_table;
mod m20250301_000003_create_wallet_transaction_table;
mod m20250302_000001_create_withdrawal_request_table;
mod m20250302_000002_create_deposit_tables;
mod m20250303_000001_create_config_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_user_profile_table::Migration),
            Box::new(m20250301_000002_create_wallet_table::Migration),
            Box::new(m20250301_000003_create_wallet_transaction_table::Migration),
            Box::new(m20250302_000001_create_withdrawal_request_table::Migration),
            Box::new(m20250302_000002_create_deposit_tables::Migration),
            Box::new(m20250303_000001_create_config_tables::Migration)
        ]
    }
}
