/*
 * Responsibility
 * - /notifications: streaming クライアント向けの接続口
 * - header を付けられないため token は ?access_token= で受け取る (access middleware 側)
 */
use axum::{Json, extract::OriginalUri};
use serde_json::{Value, json};

use crate::api::v1::extractors::AuthCtxExtractor;

pub async fn subscribe(
    OriginalUri(uri): OriginalUri,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Json<Value> {
    tracing::info!(user_id = ?ctx.user_id, path = %uri.path(), "notification subscriber connected");

    Json(json!({
        "subscribed": true,
        "channel": uri.path(),
        "user_id": ctx.user_id,
    }))
}
