/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - auth: AccessTokenValidator, events: AuthEvents, policies, identity
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::auth::{AccessTokenValidator, AuthEvents};
use crate::services::identity::IdentityProvider;
use crate::services::permissions::PermissionPolicyProvider;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AccessTokenValidator>,
    pub events: Arc<dyn AuthEvents>,
    pub policies: Arc<dyn PermissionPolicyProvider>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(
        auth: Arc<AccessTokenValidator>,
        events: Arc<dyn AuthEvents>,
        policies: Arc<dyn PermissionPolicyProvider>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            auth,
            events,
            policies,
            identity,
        }
    }
}
