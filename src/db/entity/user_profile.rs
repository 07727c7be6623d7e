use sea_orm::entity::prelude::*;
use serde::{ Deserialize, Serialize };

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_profile")]
pub struct Model {
    /// External identity id supplied by the auth provider.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub email: String,
    /// Mirror of the main wallet balance, in USD.
    pub balance: Decimal,
    pub withdrawal_nequi: Option<String>,
    pub nequi_owner_name: Option<String>,
    pub withdrawal_usdt_bep20: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::wallet::Entity")]
    Wallet,
}

impl Related<super::wallet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
