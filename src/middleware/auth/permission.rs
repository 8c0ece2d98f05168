//! Authorization policy check (permission or role).
//!
//! Must sit behind `access` so `AuthCtx` is already in the request extensions.
//! Denials go through `AuthEvents::on_forbidden`.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::middleware::auth::access;
use crate::services::permissions::PolicyRequirement;
use crate::state::AppState;

#[derive(Clone)]
struct PolicyState {
    app: AppState,
    policy: &'static str,
}

/// Require the named policy on every route of `router`.
///
/// Uses `route_layer`, so unmatched paths still fall through to 404.
pub fn apply(router: Router<AppState>, state: AppState, policy: &'static str) -> Router<AppState> {
    let policy_state = PolicyState { app: state, policy };
    router.route_layer(middleware::from_fn_with_state(
        policy_state,
        permission_middleware,
    ))
}

async fn permission_middleware(
    State(PolicyState { app, policy }): State<PolicyState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(ctx) = req.extensions().get::<AuthCtx>().cloned() else {
        // access middleware is missing in front of this route
        return access::challenge(&app, access::response_state(&req)).await;
    };

    let Some(requirement) = app.policies.get_policy(policy) else {
        tracing::error!(policy, "unknown authorization policy");
        return Err(AppError::Internal);
    };

    let granted = match (&requirement, ctx.user_id.as_deref()) {
        (PolicyRequirement::Role(role), _) => ctx.is_in_role(role),
        (PolicyRequirement::Permission(permission), Some(id)) => {
            app.identity.has_permission(id, permission).await?
        }
        (PolicyRequirement::Permission(_), None) => false,
    };

    if !granted {
        tracing::info!(
            user_id = ?ctx.user_id,
            requirement = ?requirement,
            "authorization denied"
        );
        app.events.on_forbidden().await?;
        return Ok(StatusCode::FORBIDDEN.into_response());
    }

    Ok(next.run(req).await)
}
