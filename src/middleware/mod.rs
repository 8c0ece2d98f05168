/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - auth (access token / permission), http (request-id, trace, limits)
 */
pub mod auth;
pub mod http;
