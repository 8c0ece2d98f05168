use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::services::identity::provider::{IdentityError, IdentityProvider, RoleRecord, UserRecord};
use crate::services::permissions;

pub const ADMIN_ROLE: &str = "Admin";
pub const BASIC_ROLE: &str = "Basic";

/// In-memory identity store.
///
/// Good enough for local runs and tests; a database-backed provider
/// implements the same trait.
#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    users: RwLock<HashMap<String, UserRecord>>,
    role_permissions: RwLock<HashMap<String, HashSet<String>>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Admin` gets every permission, `Basic` the read-only set.
    pub fn with_default_roles() -> Self {
        let mut roles = HashMap::new();
        roles.insert(
            ADMIN_ROLE.to_string(),
            permissions::ALL.iter().map(|p| p.to_string()).collect(),
        );
        roles.insert(
            BASIC_ROLE.to_string(),
            permissions::BASIC.iter().map(|p| p.to_string()).collect(),
        );

        Self {
            users: RwLock::new(HashMap::new()),
            role_permissions: RwLock::new(roles),
        }
    }

    pub async fn upsert_user(&self, user: UserRecord) {
        self.users.write().await.insert(user.id.clone(), user);
    }

    pub async fn grant(&self, role: &str, permission: &str) {
        self.role_permissions
            .write()
            .await
            .entry(role.to_string())
            .or_default()
            .insert(permission.to_string());
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn find_user(&self, user_id: &str) -> Result<Option<UserRecord>, IdentityError> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, IdentityError> {
        let mut users: Vec<UserRecord> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }

    async fn list_roles(&self) -> Result<Vec<RoleRecord>, IdentityError> {
        let grants = self.role_permissions.read().await;
        let mut roles: Vec<RoleRecord> = grants
            .iter()
            .map(|(name, perms)| {
                let mut permissions: Vec<String> = perms.iter().cloned().collect();
                permissions.sort();
                RoleRecord {
                    name: name.clone(),
                    permissions,
                }
            })
            .collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn has_permission(
        &self,
        user_id: &str,
        permission: &str,
    ) -> Result<bool, IdentityError> {
        let users = self.users.read().await;
        let Some(user) = users.get(user_id).filter(|u| u.is_active) else {
            return Ok(false);
        };

        let grants = self.role_permissions.read().await;
        Ok(user
            .roles
            .iter()
            .filter_map(|role| grants.get(role))
            .any(|perms| perms.contains(permission)))
    }
}
