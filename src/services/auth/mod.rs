/*
 * Responsibility
 * - Bearer トークンの検証 (抽出 → 検証 → 拒否)
 * - 認証失敗/認可失敗を AuthFailure に変換するイベント (AuthEvents)
 * - 認可 (Authorization) は permissions / identity 側
 */
pub mod access_jwt;
pub mod events;
pub mod factory;
pub mod token_source;

pub use access_jwt::{AccessTokenClaims, AccessTokenValidator, TokenError};
pub use events::{AuthEvents, AuthFailure, IdentityAuthEvents, ResponseState};
pub use factory::build_access_token_validator;
