/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /me, /users, /roles は access middleware 配下
 * - /users は Permissions.Users.View、/roles は token の Admin ロール (Role:Admin) を要求
 * - /notifications は ?access_token= を受け付ける唯一のパス (nest しない)
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{
    me::me,
    notifications::subscribe,
    roles::list_roles,
    users::{get_user, list_users},
};
use crate::middleware::auth::{access, permission};
use crate::services::permissions;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let users = Router::new()
        .route("/users", get(list_users))
        .route("/users/{user_id}", get(get_user));
    let users = permission::apply(users, state.clone(), permissions::USERS_VIEW);

    let roles = Router::new().route("/roles", get(list_roles));
    let roles = permission::apply(roles, state.clone(), permissions::ADMIN_ROLE_POLICY);

    let v1 = Router::new()
        .route("/me", get(me))
        .merge(users)
        .merge(roles);

    access::apply(v1, state)
}

pub fn notification_routes(state: AppState) -> Router<AppState> {
    let notifications = Router::new()
        .route("/notifications", get(subscribe))
        .route("/notifications/{*rest}", get(subscribe));

    access::apply(notifications, state)
}
