/// Factory: build `AccessTokenValidator` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::AccessTokenValidator;

pub fn build_access_token_validator(config: &Config) -> Arc<AccessTokenValidator> {
    tracing::info!(
        issuer = ?config.jwt.issuer,
        audience = ?config.jwt.audience,
        "issuer and audience are not enforced on access tokens"
    );

    Arc::new(AccessTokenValidator::new(&config.jwt))
}
