/*
 * Responsibility
 * - Users の response DTO
 */
use serde::Serialize;

use crate::services::identity::UserRecord;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub roles: Vec<String>,
    pub is_active: bool,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            email: user.email,
            roles: user.roles,
            is_active: user.is_active,
        }
    }
}
