/*
 * Responsibility
 * - /users 系の参照 handler
 * - 認可は route_layer (permission middleware) 側で済んでいる前提
 */
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{api::v1::dto::users::UserResponse, error::AppError, state::AppState};

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = state.identity.list_users().await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .identity
        .find_user(&user_id)
        .await?
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(user.into()))
}
