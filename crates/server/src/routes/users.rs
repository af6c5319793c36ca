use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use common::types::Envelope;
use serde_json::{Map, Value};
use service::user::{PublicUser, User};

use super::AppState;
use crate::errors::ApiError;

fn decode(body: &[u8]) -> Result<Map<String, Value>, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
}

async fn existing(state: &AppState, id: &str) -> Result<User, ApiError> {
    state.users.find_user(id).await?.ok_or_else(|| ApiError::NotFound(id.to_owned()))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Envelope<Vec<PublicUser>>>, ApiError> {
    let users = state.users.find_users().await?;
    Ok(Json(Envelope::data(users.iter().map(User::public_view).collect())))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<PublicUser>>, ApiError> {
    let user = existing(&state, &id).await?;
    Ok(Json(Envelope::data(user.public_view())))
}

pub async fn create(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Envelope<PublicUser>>), ApiError> {
    let body = decode(&body)?;
    let user = state.users.create_user(&body).await?;
    Ok((StatusCode::CREATED, Json(Envelope::data(user.public_view()))))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Envelope<PublicUser>>, ApiError> {
    let current = existing(&state, &id).await?;
    let body = decode(&body)?;
    let user = state.users.update_user(&body, &current).await?;
    Ok(Json(Envelope::data(user.public_view())))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let user = existing(&state, &id).await?;
    state.users.delete_user(&user).await?;
    Ok(Json(Envelope::success(format!("The user with id '{id}' was successfully deleted."))))
}
