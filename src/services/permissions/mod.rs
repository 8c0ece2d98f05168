/*
 * Responsibility
 * - ポリシー名 → PolicyRequirement の解決 (PermissionPolicyProvider)
 * - ルートやロールの seed で使う permission 名の定義
 */
pub mod policy;

pub use policy::{DefaultPermissionPolicyProvider, PermissionPolicyProvider, PolicyRequirement};

pub const USERS_VIEW: &str = "Permissions.Users.View";
pub const USERS_CREATE: &str = "Permissions.Users.Create";
pub const USERS_UPDATE: &str = "Permissions.Users.Update";
pub const USERS_DELETE: &str = "Permissions.Users.Delete";
pub const ROLES_VIEW: &str = "Permissions.Roles.View";
pub const ROLES_MANAGE: &str = "Permissions.Roles.Manage";

pub const ALL: &[&str] = &[
    USERS_VIEW,
    USERS_CREATE,
    USERS_UPDATE,
    USERS_DELETE,
    ROLES_VIEW,
    ROLES_MANAGE,
];

/// Permissions granted to the `Basic` role.
pub const BASIC: &[&str] = &[USERS_VIEW, ROLES_VIEW];

/// Role policy guarding the role listing: only tokens carrying `Admin`.
pub const ADMIN_ROLE_POLICY: &str = "Role:Admin";
