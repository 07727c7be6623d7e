use axum::{
    extract::{ Path, Query, State },
    http::{ header, StatusCode },
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::entity::{ deposit_network, deposit_request };
use crate::enums::DepositKind;
use crate::error::Result;
use crate::services::deposit_service::SubmitDeposit;

use super::AppState;

#[derive(Deserialize)]
pub struct NetworkQuery {
    #[serde(default)]
    pub kind: Option<String>,
}

pub async fn list_networks(
    State(state): State<AppState>,
    Query(query): Query<NetworkQuery>
) -> Result<Json<Vec<deposit_network::Model>>> {
    let kind = query.kind.map(|k| k.parse::<DepositKind>()).transpose()?;

    let networks = state.deposit_service.networks(kind).await?;

    Ok(Json(networks))
}

pub async fn network_qr(
    State(state): State<AppState>,
    Path(network_id): Path<Uuid>
) -> Result<impl IntoResponse> {
    let png = state.deposit_service.network_qr_png(network_id).await?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

pub async fn submit_deposit(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<SubmitDeposit>
) -> Result<(StatusCode, Json<deposit_request::Model>)> {
    let deposit = state.deposit_service.submit(&user_id, request).await?;

    Ok((StatusCode::CREATED, Json(deposit)))
}

pub async fn list_deposits(
    State(state): State<AppState>,
    Path(user_id): Path<String>
) -> Result<Json<Vec<deposit_request::Model>>> {
    let deposits = state.deposit_service.list(&user_id).await?;

    Ok(Json(deposits))
}
