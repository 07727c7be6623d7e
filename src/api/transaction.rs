use axum::{ extract::{ Path, Query, State }, Json };
use serde::Deserialize;

use crate::db::entity::wallet_transaction;
use crate::error::Result;

use super::AppState;

#[derive(Deserialize)]
pub struct TransactionQueryParams {
    #[serde(default)]
    pub limit: Option<u64>,
}

pub async fn get_transactions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<TransactionQueryParams>
) -> Result<Json<Vec<wallet_transaction::Model>>> {
    let transactions = state.profile_service.transactions(&user_id, params.limit).await?;

    Ok(Json(transactions))
}
