/*
 * Responsibility
 * - GET /me: 認証済み主体 (AuthCtx) をそのまま返す
 */
use axum::Json;

use crate::api::v1::{dto::me::MeResponse, extractors::AuthCtxExtractor};

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<MeResponse> {
    Json(ctx.into())
}
