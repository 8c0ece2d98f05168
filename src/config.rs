/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, APP_ENV, JwtSettings など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// `JwtSettings` section.
///
/// Only `key` takes part in token validation. Issuer, audience and lifetime
/// are carried so operators see one settings block, but they are never enforced.
#[derive(Clone, PartialEq, Eq)]
pub struct JwtSettings {
    pub key: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub token_expiration_in_minutes: Option<u64>,
}

impl JwtSettings {
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::Missing("JWT_SETTINGS_KEY"));
        }

        Ok(Self {
            key,
            issuer: None,
            audience: None,
            token_expiration_in_minutes: None,
        })
    }
}

impl fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("JwtSettings")
            .field("key", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field(
                "token_expiration_in_minutes",
                &self.token_expiration_in_minutes,
            )
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub jwt: JwtSettings,
    // Seed user granted the Admin role in the in-memory identity store.
    pub admin_user_id: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (the process env in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let key = lookup("JWT_SETTINGS_KEY").ok_or(ConfigError::Missing("JWT_SETTINGS_KEY"))?;
        let mut jwt = JwtSettings::new(key)?;
        jwt.issuer = non_empty(lookup("JWT_SETTINGS_ISSUER"));
        jwt.audience = non_empty(lookup("JWT_SETTINGS_AUDIENCE"));
        jwt.token_expiration_in_minutes = match lookup("JWT_SETTINGS_TOKEN_EXPIRATION_IN_MINUTES") {
            Some(raw) => Some(
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("JWT_SETTINGS_TOKEN_EXPIRATION_IN_MINUTES"))?,
            ),
            None => None,
        };

        let admin_user_id = non_empty(lookup("IDENTITY_ADMIN_USER_ID"));

        Ok(Self {
            addr,
            app_env,
            jwt,
            admin_user_id,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn missing_key_refuses_to_start() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SETTINGS_KEY"));
    }

    #[test]
    fn empty_key_refuses_to_start() {
        let err = Config::from_lookup(lookup_from(&[("JWT_SETTINGS_KEY", "")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SETTINGS_KEY"));
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config =
            Config::from_lookup(lookup_from(&[("JWT_SETTINGS_KEY", "S0M3RAN0MS3CR3T!1!")]))
                .unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.jwt.key, "S0M3RAN0MS3CR3T!1!");
        assert!(config.jwt.issuer.is_none());
        assert!(config.admin_user_id.is_none());
    }

    #[test]
    fn reads_optional_settings() {
        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SETTINGS_KEY", "secret"),
            ("PORT", "8080"),
            ("APP_ENV", "Prod"),
            ("JWT_SETTINGS_ISSUER", "https://issuer.example"),
            ("JWT_SETTINGS_TOKEN_EXPIRATION_IN_MINUTES", "60"),
            ("IDENTITY_ADMIN_USER_ID", " admin-1 "),
        ]))
        .unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert!(config.app_env.is_production());
        assert_eq!(config.jwt.issuer.as_deref(), Some("https://issuer.example"));
        assert_eq!(config.jwt.token_expiration_in_minutes, Some(60));
        assert_eq!(config.admin_user_id.as_deref(), Some("admin-1"));
    }

    #[test]
    fn rejects_unparsable_port() {
        let err = Config::from_lookup(lookup_from(&[
            ("JWT_SETTINGS_KEY", "secret"),
            ("PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("PORT"));
    }

    #[test]
    fn debug_output_hides_the_key() {
        let settings = JwtSettings::new("very-secret").unwrap();
        let printed = format!("{:?}", settings);
        assert!(!printed.contains("very-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
