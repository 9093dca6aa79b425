use serde::{Deserialize, Serialize};

use crate::{stats::repo_types::UserStats, users::repo_types::User};

/// Request body for creating a user (admin only).
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub cpf: String,
    pub password: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    pub work_type: String,
}

/// User profile together with its current stats.
#[derive(Debug, Serialize)]
pub struct UserWithStats {
    #[serde(flatten)]
    pub user: User,
    pub stats: UserStats,
}
