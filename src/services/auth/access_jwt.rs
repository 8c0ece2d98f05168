use std::collections::HashMap;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::Deserialize;
use thiserror::Error;

use crate::config::JwtSettings;

/// Long-form role claim type some issuers emit instead of `role`.
pub const ROLE_CLAIM_URI: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";

// Why a bearer token was rejected. Every variant ends up as a 401.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("no bearer token supplied")]
    Missing,
    #[error("malformed token")]
    Malformed,
    #[error("token expired")]
    Expired,
    #[error("token not yet valid")]
    NotYetValid,
    #[error("invalid token signature")]
    BadSignature,
    #[error("invalid token: {0}")]
    Invalid(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => Self::Malformed,
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::ImmatureSignature => Self::NotYetValid,
            ErrorKind::InvalidSignature => Self::BadSignature,
            _ => Self::Invalid(e.to_string()),
        }
    }
}

pub type TokenValidationOutcome = Result<AccessTokenClaims, TokenError>;

/// Access token (JWT) claims.
///
/// NOTE:
/// - `iss` and `aud` are kept as raw JSON; they are never validated.
/// - `sub` falls back to `nameid`; roles are the union of `role` and the long-form role claim.
/// - identity claims that are not strings are ignored rather than rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawClaims")]
pub struct AccessTokenClaims {
    pub sub: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub roles: Vec<String>,

    pub iss: Option<serde_json::Value>,
    pub aud: Option<serde_json::Value>,

    pub exp: u64,
    pub nbf: Option<u64>,
    pub iat: Option<u64>,

    pub other: HashMap<String, serde_json::Value>,
}

// Wire shape: every claim the token may carry under either name, untyped.
#[derive(Deserialize)]
struct RawClaims {
    #[serde(default)]
    sub: Option<serde_json::Value>,
    #[serde(default)]
    nameid: Option<serde_json::Value>,
    #[serde(default)]
    email: Option<serde_json::Value>,
    #[serde(default)]
    name: Option<serde_json::Value>,
    #[serde(default)]
    unique_name: Option<serde_json::Value>,
    #[serde(default)]
    role: Option<serde_json::Value>,
    #[serde(default, rename = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role")]
    role_uri: Option<serde_json::Value>,
    #[serde(default)]
    iss: Option<serde_json::Value>,
    #[serde(default)]
    aud: Option<serde_json::Value>,
    #[serde(default)]
    exp: Option<serde_json::Value>,
    #[serde(default)]
    nbf: Option<serde_json::Value>,
    #[serde(default)]
    iat: Option<serde_json::Value>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

impl From<RawClaims> for AccessTokenClaims {
    fn from(raw: RawClaims) -> Self {
        let mut roles = Vec::new();
        for value in [raw.role, raw.role_uri].into_iter().flatten() {
            for role in string_list(value) {
                if !roles.contains(&role) {
                    roles.push(role);
                }
            }
        }

        Self {
            sub: as_string(raw.sub).or_else(|| as_string(raw.nameid)),
            email: as_string(raw.email),
            name: as_string(raw.name).or_else(|| as_string(raw.unique_name)),
            roles,
            iss: raw.iss,
            aud: raw.aud,
            // exp presence and shape are already enforced by the decoder
            exp: raw.exp.and_then(as_timestamp).unwrap_or_default(),
            nbf: raw.nbf.and_then(as_timestamp),
            iat: raw.iat.and_then(as_timestamp),
            other: raw.other,
        }
    }
}

fn as_string(value: Option<serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    }
}

fn string_list(value: serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::String(s) => vec![s],
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn as_timestamp(value: serde_json::Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
}

/// Encode the configured secret the way an ASCII encoder would:
/// anything outside the ASCII range becomes `?`.
pub fn ascii_key_bytes(secret: &str) -> Vec<u8> {
    secret
        .chars()
        .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
        .collect()
}

/// HMAC access-token validator.
///
/// - signature and lifetime are enforced with zero leeway
/// - issuer and audience are accepted as-is
/// - key material is not printable via Debug
#[derive(Clone)]
pub struct AccessTokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for AccessTokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenValidator")
            .field("validation", &self.validation)
            .finish()
    }
}

impl AccessTokenValidator {
    pub fn new(settings: &JwtSettings) -> Self {
        let decoding_key = DecodingKey::from_secret(&ascii_key_bytes(&settings.key));

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.iss = None;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            decoding_key,
            validation,
        }
    }

    /// Decide whether a bearer token is acceptable.
    pub fn validate(&self, token: Option<&str>) -> TokenValidationOutcome {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(TokenError::Missing)?;

        // Cheap structural check before handing the token to the decoder.
        if token.split('.').count() != 3 {
            return Err(TokenError::Malformed);
        }

        let data = jsonwebtoken::decode::<AccessTokenClaims>(
            token,
            &self.decoding_key,
            &self.validation,
        )
        .map_err(|err| {
            tracing::debug!(error = %err, "access token rejected");
            TokenError::from(err)
        })?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use jsonwebtoken::{EncodingKey, Header, get_current_timestamp};
    use serde_json::json;

    const SECRET: &str = "S0M3RAN0MS3CR3T!1!MAG1C!1!";

    fn validator() -> AccessTokenValidator {
        AccessTokenValidator::new(&JwtSettings::new(SECRET).unwrap())
    }

    fn sign(claims: &serde_json::Value, secret: &[u8]) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    fn fresh_claims() -> serde_json::Value {
        json!({
            "sub": "6f1c2a3e-1f0e-4f6a-9a57-2c1d9b0b8e11",
            "email": "admin@root.com",
            "role": "Admin",
            "exp": get_current_timestamp() + 3600,
        })
    }

    #[test]
    fn accepts_valid_token_and_exposes_claims() {
        let token = sign(&fresh_claims(), SECRET.as_bytes());
        let claims = validator().validate(Some(&token)).unwrap();

        assert_eq!(
            claims.sub.as_deref(),
            Some("6f1c2a3e-1f0e-4f6a-9a57-2c1d9b0b8e11")
        );
        assert_eq!(claims.roles, vec!["Admin".to_string()]);
    }

    #[test]
    fn rejects_tokens_signed_with_another_key() {
        for claims in [fresh_claims(), json!({"exp": get_current_timestamp() + 60})] {
            let token = sign(&claims, b"some-other-secret");
            assert_eq!(
                validator().validate(Some(&token)).unwrap_err(),
                TokenError::BadSignature
            );
        }
    }

    #[test]
    fn rejects_token_expired_by_one_second() {
        let mut claims = fresh_claims();
        claims["exp"] = json!(get_current_timestamp() - 1);
        let token = sign(&claims, SECRET.as_bytes());

        assert_eq!(
            validator().validate(Some(&token)).unwrap_err(),
            TokenError::Expired
        );
    }

    #[test]
    fn rejects_token_without_exp() {
        let token = sign(&json!({"sub": "u1", "role": "Basic"}), SECRET.as_bytes());
        assert!(validator().validate(Some(&token)).is_err());
    }

    #[test]
    fn rejects_token_not_yet_valid() {
        let mut claims = fresh_claims();
        claims["nbf"] = json!(get_current_timestamp() + 600);
        let token = sign(&claims, SECRET.as_bytes());

        assert_eq!(
            validator().validate(Some(&token)).unwrap_err(),
            TokenError::NotYetValid
        );
    }

    #[test]
    fn ignores_issuer_and_audience() {
        let cases = [
            json!({"iss": "https://anyone.example", "aud": "somebody-else"}),
            json!({"iss": 42, "aud": ["a", "b"]}),
            json!({"iss": {"nested": true}, "aud": null}),
            json!({}),
        ];

        for extra in cases {
            let mut claims = fresh_claims();
            for (k, v) in extra.as_object().unwrap() {
                claims[k] = v.clone();
            }
            let token = sign(&claims, SECRET.as_bytes());
            assert!(
                validator().validate(Some(&token)).is_ok(),
                "rejected claims {claims}"
            );
        }
    }

    #[test]
    fn absent_token_is_missing() {
        assert_eq!(validator().validate(None).unwrap_err(), TokenError::Missing);
        assert_eq!(
            validator().validate(Some("   ")).unwrap_err(),
            TokenError::Missing
        );
    }

    #[test]
    fn malformed_tokens_are_rejected_without_panicking() {
        // Header is decoded before the signature is checked.
        let garbage_header = format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode(b"not json"),
            URL_SAFE_NO_PAD.encode(br#"{"sub":"u1"}"#),
            URL_SAFE_NO_PAD.encode(b"sig"),
        );

        for token in [
            "abc",
            "a.b",
            "a.b.c.d",
            "!!!.@@@.###",
            garbage_header.as_str(),
        ] {
            assert_eq!(
                validator().validate(Some(token)).unwrap_err(),
                TokenError::Malformed,
                "token {token}"
            );
        }
    }

    #[test]
    fn roles_accept_array_and_long_form_claim() {
        let mut claims = fresh_claims();
        claims["role"] = json!(["Admin", "Basic"]);
        let token = sign(&claims, SECRET.as_bytes());
        let parsed = validator().validate(Some(&token)).unwrap();
        assert_eq!(parsed.roles, vec!["Admin".to_string(), "Basic".to_string()]);

        let long_form = json!({
            "nameid": "u-2",
            ROLE_CLAIM_URI: "Basic",
            "exp": get_current_timestamp() + 60,
        });
        let token = sign(&long_form, SECRET.as_bytes());
        let parsed = validator().validate(Some(&token)).unwrap();
        assert_eq!(parsed.sub.as_deref(), Some("u-2"));
        assert_eq!(parsed.roles, vec!["Basic".to_string()]);
    }

    #[test]
    fn sub_wins_over_nameid_when_both_are_present() {
        let mut claims = fresh_claims();
        claims["nameid"] = json!("legacy-id");
        let token = sign(&claims, SECRET.as_bytes());

        let parsed = validator().validate(Some(&token)).unwrap();
        assert_eq!(
            parsed.sub.as_deref(),
            Some("6f1c2a3e-1f0e-4f6a-9a57-2c1d9b0b8e11")
        );
    }

    #[test]
    fn role_and_long_form_role_are_merged() {
        let mut claims = fresh_claims();
        claims[ROLE_CLAIM_URI] = json!(["Basic", "Admin"]);
        let token = sign(&claims, SECRET.as_bytes());

        let parsed = validator().validate(Some(&token)).unwrap();
        assert_eq!(parsed.roles, vec!["Admin".to_string(), "Basic".to_string()]);
    }

    #[test]
    fn non_string_identity_claims_are_ignored() {
        let mut claims = fresh_claims();
        claims["sub"] = json!(12345);
        claims["nameid"] = json!("fallback-id");
        claims["email"] = json!({"primary": "x"});
        claims["role"] = json!(["Admin", 7, null]);
        let token = sign(&claims, SECRET.as_bytes());

        let parsed = validator().validate(Some(&token)).unwrap();
        assert_eq!(parsed.sub.as_deref(), Some("fallback-id"));
        assert!(parsed.email.is_none());
        assert_eq!(parsed.roles, vec!["Admin".to_string()]);

        let mut claims = fresh_claims();
        claims["sub"] = json!(12345);
        let token = sign(&claims, SECRET.as_bytes());
        assert!(validator().validate(Some(&token)).unwrap().sub.is_none());
    }

    #[test]
    fn keeps_unknown_claims() {
        let mut claims = fresh_claims();
        claims["tenant"] = json!("root");
        let token = sign(&claims, SECRET.as_bytes());
        let parsed = validator().validate(Some(&token)).unwrap();
        assert_eq!(parsed.other.get("tenant"), Some(&json!("root")));
    }

    #[test]
    fn non_ascii_secret_characters_become_question_marks() {
        assert_eq!(ascii_key_bytes("kéy€"), b"k?y?".to_vec());

        let settings = JwtSettings::new("sécret").unwrap();
        let token = sign(&fresh_claims(), b"s?cret");
        assert!(AccessTokenValidator::new(&settings)
            .validate(Some(&token))
            .is_ok());
    }
}
