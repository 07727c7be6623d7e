use sea_orm::entity::prelude::*;
use serde::{ Deserialize, Serialize };

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "withdrawal_config")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Fraction, e.g. 0.05 for 5%.
    pub fee_percentage: Decimal,
    /// USD.
    pub min_withdrawal: Decimal,
    pub daily_limit: i32,
    /// Comma-separated weekday names.
    pub allowed_days: String,
    pub start_time: String,
    pub end_time: String,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
