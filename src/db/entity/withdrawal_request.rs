use sea_orm::entity::prelude::*;
use serde::{ Deserialize, Serialize };

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "withdrawal_request")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub user_email: String,
    pub wallet_id: Uuid,
    pub transaction_id: Uuid,
    pub total_amount: Decimal,
    pub fee_amount: Decimal,
    pub net_amount: Decimal,
    pub method: String,
    pub wallet_address: String,
    pub nequi_owner_name: Option<String>,
    pub status: String,
    /// Business-timezone calendar day, `YYYY-MM-DD`.
    pub request_day: String,
    pub idempotency_key: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallet_transaction::Entity",
        from = "Column::TransactionId",
        to = "super::wallet_transaction::Column::Id"
    )]
    WalletTransaction,
}

impl Related<super::wallet_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WalletTransaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
