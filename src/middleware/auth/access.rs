//! access token（JWT）検証 → AuthCtx を extensions に入れる
//!
//! - token は `AuthEvents::on_extract_token` (notifications の query string) を先に見て、
//!   無ければ `Authorization: Bearer <jwt>` から取る
//! - 検証失敗・token 無しは `AuthEvents::on_challenge` に渡して 401 に変換する

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::{Request, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::{ResponseState, TokenError, token_source};
use crate::state::AppState;

/// 認証が必要な router の各 route に access middleware を掛ける。
///
/// `route_layer` なので、どの route にも一致しないパスは認証せず 404 になる。
///
/// 例：
/// ```ignore
/// let v1 = api::v1::routes(state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // nest された router の中では req.uri() が prefix 抜きになるので OriginalUri を優先する
    let uri: Uri = req
        .extensions()
        .get::<OriginalUri>()
        .map(|original| original.0.clone())
        .unwrap_or_else(|| req.uri().clone());

    let token = match state.events.on_extract_token(&uri).await {
        Some(token) => Some(token),
        None => token_source::bearer_from_headers(req.headers()),
    };

    let claims = match state.auth.validate(token.as_deref()) {
        Ok(claims) => claims,
        Err(err) => {
            if err == TokenError::Missing {
                tracing::debug!(path = %uri.path(), "no access token supplied");
            } else {
                tracing::warn!(error = %err, path = %uri.path(), "access token verification failed");
            }
            return challenge(&state, response_state(&req)).await;
        }
    };

    // validate() が Ok なら token は必ず Some
    let auth_ctx = AuthCtx::from_claims(claims, token.unwrap_or_default());

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}

/// Upstream layers mark a taken-over response with `ResponseState::Started`.
pub(crate) fn response_state(req: &Request<Body>) -> ResponseState {
    req.extensions()
        .get::<ResponseState>()
        .copied()
        .unwrap_or_default()
}

/// Run the challenge event; a raised failure becomes the 401 body.
pub(crate) async fn challenge(
    state: &AppState,
    response: ResponseState,
) -> Result<Response, AppError> {
    state.events.on_challenge(response).await?;

    // Handled without raising: write no body of our own.
    Ok(StatusCode::UNAUTHORIZED.into_response())
}
