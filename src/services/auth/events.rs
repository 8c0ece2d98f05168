//! Authentication events: token extraction override and failure translation.
//!
//! The middleware calls into one `AuthEvents` object at three fixed points
//! instead of registering callbacks:
//! - `on_extract_token` before the standard header lookup
//! - `on_challenge` when a protected request has no acceptable identity
//! - `on_forbidden` when an authenticated caller lacks a permission

use async_trait::async_trait;
use axum::http::{StatusCode, Uri};
use thiserror::Error;

use super::token_source::{
    ACCESS_TOKEN_QUERY_PARAM, NOTIFICATIONS_PATH, path_starts_with_segments, query_param,
};

pub const AUTHENTICATION_FAILED: &str = "Authentication Failed.";
pub const NOT_AUTHORIZED: &str = "You are not authorized to access this resource.";

/// Structured authentication/authorization failure raised by the translator.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("Authentication Failed.")]
    Unauthorized,
    #[error("You are not authorized to access this resource.")]
    Forbidden,
}

impl AuthFailure {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Unauthorized => AUTHENTICATION_FAILED,
            Self::Forbidden => NOT_AUTHORIZED,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

/// Whether something upstream already began writing the response.
///
/// Layers that take over the connection put `ResponseState::Started` into the
/// request extensions; the challenge translator then stays silent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseState {
    #[default]
    NotStarted,
    Started,
}

impl ResponseState {
    pub fn has_started(&self) -> bool {
        matches!(self, Self::Started)
    }
}

#[async_trait]
pub trait AuthEvents: Send + Sync {
    /// Token to validate instead of the `Authorization` header, if any.
    async fn on_extract_token(&self, uri: &Uri) -> Option<String>;

    /// Authentication is required but missing or invalid.
    ///
    /// `Ok(())` means the challenge was handled without raising.
    async fn on_challenge(&self, response: ResponseState) -> Result<(), AuthFailure>;

    /// The caller is authenticated but lacks the required permission.
    async fn on_forbidden(&self) -> Result<(), AuthFailure>;
}

/// Default policy object for the identity API.
#[derive(Debug, Clone, Default)]
pub struct IdentityAuthEvents;

impl IdentityAuthEvents {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuthEvents for IdentityAuthEvents {
    async fn on_extract_token(&self, uri: &Uri) -> Option<String> {
        // Streaming clients cannot set headers, so /notifications reads the query string.
        if !path_starts_with_segments(uri.path(), NOTIFICATIONS_PATH) {
            return None;
        }

        query_param(uri, ACCESS_TOKEN_QUERY_PARAM).filter(|token| !token.is_empty())
    }

    async fn on_challenge(&self, response: ResponseState) -> Result<(), AuthFailure> {
        if response.has_started() {
            tracing::debug!("response already started; challenge suppressed");
            return Ok(());
        }

        Err(AuthFailure::Unauthorized)
    }

    async fn on_forbidden(&self) -> Result<(), AuthFailure> {
        Err(AuthFailure::Forbidden)
    }
}
