//! Address handlers

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};

use domain_address::{Address, AddressInput, LookupResult};

use crate::dto::MessageResponse;
use crate::{error::ApiError, AppState};

/// Lists addresses, filtered by any address field passed as query parameter
pub async fn list_addresses(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Address>>, ApiError> {
    Ok(Json(state.addresses.list(&params).await?))
}

pub async fn create_address(
    State(state): State<AppState>,
    payload: Result<Json<AddressInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Address>), ApiError> {
    let Json(input) = payload?;
    let address = state.addresses.create(input).await?;
    Ok((StatusCode::CREATED, Json(address)))
}

pub async fn get_address(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Address>, ApiError> {
    Ok(Json(state.addresses.retrieve(&id).await?))
}

/// Partially updates an address; absent fields keep their values
pub async fn update_address(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AddressInput>, JsonRejection>,
) -> Result<Json<Address>, ApiError> {
    let Json(input) = payload?;
    Ok(Json(state.addresses.update(&id, input).await?))
}

/// Deletes an address and the persons living there
pub async fn delete_address(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state.addresses.delete(&id).await?;
    Ok((StatusCode::NO_CONTENT, Json(MessageResponse::address_deleted())))
}

pub async fn delete_all_addresses(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let count = state.addresses.delete_all().await?;
    Ok((StatusCode::NO_CONTENT, Json(MessageResponse::addresses_deleted(count))))
}

/// Returns the stored address for a postal code, fetching it on a miss
pub async fn find_by_postal_code(
    State(state): State<AppState>,
    Path(cep): Path<String>,
) -> Result<Json<LookupResult>, ApiError> {
    Ok(Json(state.addresses.find_or_fetch_by_code(&cep).await?))
}
