use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub roles: Vec<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleRecord {
    pub name: String,
    pub permissions: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("identity store unavailable: {0}")]
    Unavailable(String),
}

/// User and role records owned by the identity store.
///
/// Permission checks fail closed: an `Err` is never treated as a grant.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn find_user(&self, user_id: &str) -> Result<Option<UserRecord>, IdentityError>;

    async fn list_users(&self) -> Result<Vec<UserRecord>, IdentityError>;

    async fn list_roles(&self) -> Result<Vec<RoleRecord>, IdentityError>;

    // Ok(true) only when an active user holds a role granting `permission`.
    async fn has_permission(&self, user_id: &str, permission: &str)
    -> Result<bool, IdentityError>;
}
