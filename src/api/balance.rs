use axum::{ extract::{ Path, Query, State }, Json };
use serde::Deserialize;

use crate::enums::Currency;
use crate::error::Result;
use crate::services::profile_service::BalanceView;

use super::AppState;

#[derive(Deserialize)]
pub struct BalanceQuery {
    #[serde(default)]
    pub currency: Option<String>,
}

pub async fn get_balance(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<BalanceQuery>
) -> Result<Json<BalanceView>> {
    let currency = match query.currency {
        Some(c) => c.parse::<Currency>()?,
        None => Currency::default(),
    };

    let balance = state.profile_service.balance(&user_id, currency).await?;

    Ok(Json(balance))
}
