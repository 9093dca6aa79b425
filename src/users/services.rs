use lazy_static::lazy_static;
use regex::Regex;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::{
    auth::password::hash_password,
    config::BootstrapAdmin,
    error::AppError,
    users::{
        dto::CreateUserRequest,
        repo,
        repo_types::{NewUser, User, WorkType},
    },
};

lazy_static! {
    static ref CPF_RE: Regex = Regex::new(r"^\d{11}$").expect("valid cpf regex");
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex");
}

pub fn is_valid_cpf(cpf: &str) -> bool {
    CPF_RE.is_match(cpf)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Trims and checks a CPF, rejecting anything but 11 digits.
pub fn normalize_cpf(cpf: &str) -> Result<String, AppError> {
    let cpf = cpf.trim();
    if !is_valid_cpf(cpf) {
        return Err(AppError::validation("CPF must have exactly 11 digits"));
    }
    Ok(cpf.to_string())
}

// Column widths in the users table.
const MAX_NAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 255;

fn check_len(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A create request that passed validation; the password is still plain.
#[derive(Debug)]
pub struct ValidUser {
    pub user: NewUser,
    pub admin_password: Option<String>,
}

pub fn validate_new_user(req: CreateUserRequest) -> Result<ValidUser, AppError> {
    let cpf = normalize_cpf(&req.cpf)?;

    let first_name = req.first_name.trim().to_string();
    let last_name = req.last_name.trim().to_string();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(AppError::validation("First and last name are required"));
    }
    check_len("first_name", &first_name, MAX_NAME_LEN)?;
    check_len("last_name", &last_name, MAX_NAME_LEN)?;

    let email = non_empty(req.email).map(|e| e.to_lowercase());
    if let Some(email) = &email {
        check_len("email", email, MAX_EMAIL_LEN)?;
        if !is_valid_email(email) {
            return Err(AppError::validation("Invalid email"));
        }
    }

    let work_type: WorkType = req.work_type.parse().map_err(AppError::Validation)?;

    let password = req.password.filter(|p| !p.is_empty());
    let admin_password = if req.is_admin {
        Some(password.ok_or_else(|| AppError::validation("Password is required for administrators"))?)
    } else {
        if password.is_some() {
            warn!(%cpf, "password supplied for worker ignored");
        }
        None
    };

    Ok(ValidUser {
        user: NewUser {
            cpf,
            password_hash: None,
            first_name,
            last_name,
            email,
            profile_image_url: non_empty(req.profile_image_url),
            is_admin: req.is_admin,
            work_type,
        },
        admin_password,
    })
}

/// Hashes the admin password (if any) and inserts the user.
pub async fn create_user(db: &PgPool, valid: ValidUser) -> Result<User, AppError> {
    let ValidUser {
        mut user,
        admin_password,
    } = valid;
    if let Some(password) = admin_password {
        user.password_hash = Some(hash_password(&password)?);
    }

    match repo::create(db, &user).await {
        Ok(created) => {
            info!(user_id = created.id, is_admin = created.is_admin, "user created");
            Ok(created)
        }
        Err(e) if repo::is_duplicate_cpf(&e) => {
            warn!(cpf = %user.cpf, "cpf already registered");
            Err(AppError::Conflict("CPF already registered".into()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Makes sure the configured bootstrap administrator exists.
pub async fn ensure_bootstrap_admin(db: &PgPool, admin: &BootstrapAdmin) -> anyhow::Result<()> {
    if let Some(existing) = repo::find_by_cpf(db, admin.cpf.trim()).await? {
        info!(user_id = existing.id, "bootstrap admin already present");
        return Ok(());
    }

    let valid = validate_new_user(CreateUserRequest {
        cpf: admin.cpf.clone(),
        password: Some(admin.password.clone()),
        first_name: admin.first_name.clone(),
        last_name: admin.last_name.clone(),
        email: None,
        profile_image_url: None,
        is_admin: true,
        work_type: admin.work_type.clone(),
    })
    .map_err(|e| anyhow::anyhow!("invalid bootstrap admin: {}", e))?;

    match create_user(db, valid).await {
        Ok(user) => {
            info!(user_id = user.id, name = %user.full_name(), "bootstrap admin created");
            Ok(())
        }
        // Another instance inserted it first.
        Err(AppError::Conflict(_)) => Ok(()),
        Err(e) => Err(anyhow::anyhow!("create bootstrap admin: {}", e)),
    }
}
