use serde::{Deserialize, Serialize};

use crate::{auth::session::Role, users::repo_types::User};

/// Request body for the administrator login path.
#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub cpf: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for the worker login path (CPF only).
#[derive(Debug, Deserialize)]
pub struct WorkerLoginRequest {
    pub cpf: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in_seconds: u64,
    pub role: Role,
    pub user: User,
}
