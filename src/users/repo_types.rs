use std::{fmt, str::FromStr};

use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::auth::session::Role;

/// User row in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i32,
    pub cpf: String,
    #[serde(skip_serializing)]
    pub password: Option<String>, // Argon2 hash, admins only
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub profile_image_url: Option<String>,
    pub is_admin: bool,
    pub work_type: String,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn role(&self) -> Role {
        if self.is_admin {
            Role::Admin
        } else {
            Role::Worker
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Validated input for a user insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub cpf: String,
    pub password_hash: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub profile_image_url: Option<String>,
    pub is_admin: bool,
    pub work_type: WorkType,
}

/// Production task a weight entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkType {
    Filetagem,
    Espinhos,
}

impl WorkType {
    pub const ALL: [WorkType; 2] = [WorkType::Filetagem, WorkType::Espinhos];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkType::Filetagem => "Filetagem",
            WorkType::Espinhos => "Espinhos",
        }
    }
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorkType::ALL
            .into_iter()
            .find(|w| w.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Invalid work type '{}', expected one of: Filetagem, Espinhos",
                    s
                )
            })
    }
}
