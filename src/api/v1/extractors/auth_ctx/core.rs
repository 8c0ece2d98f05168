use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::AuthFailure;

use super::AuthCtx;

/// Handler で、 AuthCtx を受け取るための extractor
/// middleware が AuthCtx を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（認証がかかってない・ミドルウェア未設定）
pub struct AuthCtxExtractor(pub AuthCtx);

impl<S> FromRequestParts<S> for AuthCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthCtx>()
            .cloned()
            .map(AuthCtxExtractor)
            .ok_or(AppError::Auth(AuthFailure::Unauthorized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn missing_context_is_rejected_as_unauthorized() {
        let (mut parts, ()) = Request::new(()).into_parts();

        let rejection = AuthCtxExtractor::from_request_parts(&mut parts, &())
            .await
            .err()
            .map(IntoResponse::into_response);

        assert_eq!(
            rejection.map(|res| res.status()),
            Some(StatusCode::UNAUTHORIZED)
        );
    }
}
