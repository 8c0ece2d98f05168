/*
 * Responsibility
 * - Roles の response DTO
 */
use serde::Serialize;

use crate::services::identity::RoleRecord;

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub name: String,
    pub permissions: Vec<String>,
}

impl From<RoleRecord> for RoleResponse {
    fn from(role: RoleRecord) -> Self {
        Self {
            name: role.name,
            permissions: role.permissions,
        }
    }
}
