/*
 * Responsibility
 * - Config読み込み → 依存生成 → Router 組み立て
 * - Middleware の適用 (auth / http)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::health::health;
use crate::config::Config;
use crate::middleware;
use crate::services::auth::{IdentityAuthEvents, build_access_token_validator};
use crate::services::identity::{InMemoryIdentityProvider, UserRecord, memory::ADMIN_ROLE};
use crate::services::permissions::DefaultPermissionPolicyProvider;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,identity_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: crash the whole process so it gets noticed
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();

    // Missing JwtSettings key aborts here, before anything binds.
    let config = Config::from_env().context("failed to load configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub async fn build_state(config: &Config) -> AppState {
    let identity = InMemoryIdentityProvider::with_default_roles();

    if let Some(admin_id) = &config.admin_user_id {
        identity
            .upsert_user(UserRecord {
                id: admin_id.clone(),
                email: "admin@localhost".to_string(),
                roles: vec![ADMIN_ROLE.to_string()],
                is_active: true,
            })
            .await;
        tracing::info!(user_id = %admin_id, "seeded admin user");
    }

    AppState::new(
        build_access_token_validator(config),
        Arc::new(IdentityAuthEvents::new()),
        Arc::new(DefaultPermissionPolicyProvider),
        Arc::new(identity),
    )
}

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes(state.clone()))
        .merge(api::v1::notification_routes(state.clone()))
        .with_state(state);

    middleware::http::apply(router)
}
