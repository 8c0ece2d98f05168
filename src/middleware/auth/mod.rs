//! Authentication and authorization middleware.
//!
//! - `access`: bearer token → `AuthCtx` in request extensions, or a challenge
//! - `permission`: named policy check for routes that need more than a login
pub mod access;
pub mod permission;
