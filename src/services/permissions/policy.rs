//! Named authorization policies.
//!
//! Routes refer to policies by name. The provider turns a name into what the
//! caller must have: a permission granted through the identity store, or a
//! role carried in the access token's `role` claim.

/// Prefix that marks a policy name as a permission policy.
pub const PERMISSION_POLICY_PREFIX: &str = "Permission";

/// Prefix of role policies, e.g. `Role:Admin`.
pub const ROLE_POLICY_PREFIX: &str = "Role:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyRequirement {
    /// Checked against the identity store.
    Permission(String),
    /// Checked against the token's roles only.
    Role(String),
}

impl PolicyRequirement {
    pub fn permission(permission: impl Into<String>) -> Self {
        Self::Permission(permission.into())
    }

    pub fn role(role: impl Into<String>) -> Self {
        Self::Role(role.into())
    }
}

pub trait PermissionPolicyProvider: Send + Sync {
    /// `None` when no policy with that name exists.
    fn get_policy(&self, name: &str) -> Option<PolicyRequirement>;
}

#[derive(Debug, Clone, Default)]
pub struct DefaultPermissionPolicyProvider;

impl PermissionPolicyProvider for DefaultPermissionPolicyProvider {
    fn get_policy(&self, name: &str) -> Option<PolicyRequirement> {
        if let Some(role) = strip_prefix_ignore_case(name, ROLE_POLICY_PREFIX) {
            let role = role.trim();
            return (!role.is_empty()).then(|| PolicyRequirement::role(role));
        }

        strip_prefix_ignore_case(name, PERMISSION_POLICY_PREFIX)
            .map(|_| PolicyRequirement::permission(name))
    }
}

fn strip_prefix_ignore_case<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    let head = name.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &name[prefix.len()..])
}
