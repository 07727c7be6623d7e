use axum::{ extract::{ Path, State }, http::StatusCode, Json };
use rust_decimal::Decimal;
use serde::{ Deserialize, Serialize };

use crate::db::entity::withdrawal_request;
use crate::enums::PayoutRail;
use crate::error::Result;
use crate::schedule::{ weekday_label, WindowStatus };
use crate::services::withdrawal_service::{ SubmitWithdrawal, WithdrawalQuote, WithdrawalReceipt };

use super::AppState;

#[derive(Serialize)]
pub struct WindowResponse {
    #[serde(flatten)]
    pub status: WindowStatus,
    pub is_open: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_time: Option<String>,
    pub allowed_days: Vec<&'static str>,
    pub opens_at: String,
    pub closes_at: String,
}

#[derive(Deserialize)]
pub struct QuoteRequest {
    pub rail: PayoutRail,
    pub amount: Decimal,
}

pub async fn get_window(State(state): State<AppState>) -> Result<Json<WindowResponse>> {
    let (window, status) = state.withdrawal_service.window().await?;

    Ok(
        Json(WindowResponse {
            status,
            is_open: status.is_open(),
            message: status.message().to_string(),
            remaining_time: status.remaining_time(),
            allowed_days: window
                .allowed_days()
                .iter()
                .map(|day| weekday_label(*day))
                .collect(),
            opens_at: window.opens_at().format("%H:%M").to_string(),
            closes_at: window.closes_at().format("%H:%M").to_string(),
        })
    )
}

pub async fn quote_withdrawal(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>
) -> Result<Json<WithdrawalQuote>> {
    let quote = state.withdrawal_service.quote(request.rail, request.amount).await?;

    Ok(Json(quote))
}

pub async fn submit_withdrawal(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<SubmitWithdrawal>
) -> Result<(StatusCode, Json<WithdrawalReceipt>)> {
    let receipt = state.withdrawal_service.submit(&user_id, request).await?;

    let status = if receipt.replayed { StatusCode::OK } else { StatusCode::CREATED };

    Ok((status, Json(receipt)))
}

pub async fn list_withdrawals(
    State(state): State<AppState>,
    Path(user_id): Path<String>
) -> Result<Json<Vec<withdrawal_request::Model>>> {
    let requests = state.withdrawal_service.list(&user_id).await?;

    Ok(Json(requests))
}
