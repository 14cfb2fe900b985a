//! Person handlers

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};

use domain_person::{Person, PersonInput, PersonUpdateInput};

use crate::dto::MessageResponse;
use crate::{error::ApiError, AppState};

pub async fn list_persons(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Person>>, ApiError> {
    Ok(Json(state.persons.list(&params).await?))
}

/// Creates a person, with a new nested address when `endereco` is given
pub async fn create_person(
    State(state): State<AppState>,
    payload: Result<Json<PersonInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Person>), ApiError> {
    let Json(input) = payload?;
    let person = state.persons.create(input).await?;
    Ok((StatusCode::CREATED, Json(person)))
}

pub async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Person>, ApiError> {
    Ok(Json(state.persons.retrieve(&id).await?))
}

/// Partially updates a person; `endereco` takes an existing address id
pub async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PersonUpdateInput>, JsonRejection>,
) -> Result<Json<Person>, ApiError> {
    let Json(input) = payload?;
    Ok(Json(state.persons.update(&id, input).await?))
}

pub async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state.persons.delete(&id).await?;
    Ok((StatusCode::NO_CONTENT, Json(MessageResponse::person_deleted())))
}

pub async fn delete_all_persons(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let count = state.persons.delete_all().await?;
    Ok((StatusCode::NO_CONTENT, Json(MessageResponse::persons_deleted(count))))
}
