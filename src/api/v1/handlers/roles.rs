/*
 * Responsibility
 * - GET /roles: ロールと付与 permission の一覧
 * - token の role claim による認可 (Role:Admin) は route_layer 側
 */
use axum::{Json, extract::State};

use crate::{api::v1::dto::roles::RoleResponse, error::AppError, state::AppState};

pub async fn list_roles(State(state): State<AppState>) -> Result<Json<Vec<RoleResponse>>, AppError> {
    let roles = state.identity.list_roles().await?;

    Ok(Json(roles.into_iter().map(RoleResponse::from).collect()))
}
