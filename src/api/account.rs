use axum::{ extract::{ Path, State }, Json };
use serde::Deserialize;

use crate::db::entity::user_profile;
use crate::error::Result;
use crate::services::profile_service::Account;

use super::AppState;

#[derive(Deserialize)]
pub struct CreateAccountRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize)]
pub struct NequiDetailsRequest {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
}

#[derive(Deserialize)]
pub struct UsdtAddressRequest {
    #[serde(default)]
    pub address: Option<String>,
}

pub async fn ensure_account(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<CreateAccountRequest>
) -> Result<Json<Account>> {
    let account = state.profile_service.ensure_account(&user_id, &request.email).await?;

    Ok(Json(account))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>
) -> Result<Json<user_profile::Model>> {
    let profile = state.profile_service.get_profile(&user_id).await?;

    Ok(Json(profile))
}

pub async fn update_nequi(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<NequiDetailsRequest>
) -> Result<Json<user_profile::Model>> {
    let profile = state.profile_service.update_nequi(&user_id, request.phone, request.owner_name).await?;

    Ok(Json(profile))
}

pub async fn update_usdt(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<UsdtAddressRequest>
) -> Result<Json<user_profile::Model>> {
    let profile = state.profile_service.update_usdt(&user_id, request.address).await?;

    Ok(Json(profile))
}
