/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証ロジックは services/auth 側の責務
 */

use chrono::{DateTime, Utc};

use crate::services::auth::AccessTokenClaims;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user_id` は token の subject そのまま (UUID とは限らない)
/// - `roles` は `role` claim 由来
/// - `token` は検証済みの raw bearer token (下流へ転送する場合用)
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub roles: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub token: String,
}

impl AuthCtx {
    pub fn from_claims(claims: AccessTokenClaims, token: String) -> Self {
        let expires_at = i64::try_from(claims.exp)
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

        Self {
            user_id: claims.sub,
            email: claims.email,
            name: claims.name,
            roles: claims.roles,
            expires_at,
            token,
        }
    }

    /// Exact, case-sensitive match against the token's roles.
    pub fn is_in_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
