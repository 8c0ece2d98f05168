/*
 * Responsibility
 * - GET /me の response DTO (AuthCtx から組み立てる)
 * - raw token は返さない
 */
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::v1::extractors::AuthCtx;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub roles: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<AuthCtx> for MeResponse {
    fn from(ctx: AuthCtx) -> Self {
        Self {
            user_id: ctx.user_id,
            email: ctx.email,
            name: ctx.name,
            roles: ctx.roles,
            expires_at: ctx.expires_at,
        }
    }
}
