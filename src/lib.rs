//! JWT bearer authentication and permission-based authorization for an axum service.
//!
//! - `services::auth`: token validation policy, extraction override, failure translation
//! - `services::permissions` / `services::identity`: named policies and the identity store
//! - `middleware::auth`: wiring of the above into the request pipeline
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
