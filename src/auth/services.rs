use sqlx::PgPool;
use tracing::warn;

use crate::{
    auth::{password::verify_password, session::Role},
    error::AppError,
    users::{repo, repo_types::User, services::normalize_cpf},
};

/// Why a login was refused. Only ever logged; callers see one generic error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginRefusal {
    UnknownCpf,
    Inactive,
    WrongRole,
    MissingPassword,
    WrongPassword,
}

impl LoginRefusal {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginRefusal::UnknownCpf => "unknown cpf",
            LoginRefusal::Inactive => "inactive user",
            LoginRefusal::WrongRole => "role does not match login path",
            LoginRefusal::MissingPassword => "no password stored or supplied",
            LoginRefusal::WrongPassword => "wrong password",
        }
    }
}

fn check_account(user: Option<User>, path: Role) -> Result<User, LoginRefusal> {
    let user = user.ok_or(LoginRefusal::UnknownCpf)?;
    if !user.is_active {
        return Err(LoginRefusal::Inactive);
    }
    if user.role() != path {
        return Err(LoginRefusal::WrongRole);
    }
    Ok(user)
}

/// Worker path: the CPF alone identifies the worker.
pub fn authorize_worker(user: Option<User>) -> Result<User, LoginRefusal> {
    check_account(user, Role::Worker)
}

/// Admin path: CPF plus a password matching the stored hash.
pub fn authorize_admin(user: Option<User>, password: &str) -> Result<User, LoginRefusal> {
    let user = check_account(user, Role::Admin)?;
    let hash = user
        .password
        .as_deref()
        .filter(|h| !h.is_empty())
        .ok_or(LoginRefusal::MissingPassword)?;
    if password.is_empty() {
        return Err(LoginRefusal::MissingPassword);
    }
    if !verify_password(password, hash) {
        return Err(LoginRefusal::WrongPassword);
    }
    Ok(user)
}

fn refused(cpf: &str, path: Role, reason: LoginRefusal) -> AppError {
    warn!(%cpf, path = ?path, reason = reason.as_str(), "login refused");
    AppError::InvalidCredentials
}

pub async fn login_worker(db: &PgPool, cpf: &str) -> Result<User, AppError> {
    let cpf = normalize_cpf(cpf)?;
    let user = repo::find_by_cpf(db, &cpf).await?;
    authorize_worker(user).map_err(|reason| refused(&cpf, Role::Worker, reason))
}

pub async fn login_admin(db: &PgPool, cpf: &str, password: &str) -> Result<User, AppError> {
    let cpf = normalize_cpf(cpf)?;
    let user = repo::find_by_cpf(db, &cpf).await?;
    authorize_admin(user, password).map_err(|reason| refused(&cpf, Role::Admin, reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::test_support;

    fn admin() -> User {
        let hash = hash_password("secret123").unwrap();
        test_support::user(1, "98765432100", true, Some(hash))
    }

    fn worker() -> User {
        test_support::user(2, "12345678901", false, None)
    }

    #[test]
    fn admin_with_correct_password_is_accepted() {
        let user = authorize_admin(Some(admin()), "secret123").unwrap();
        assert_eq!(user.cpf, "98765432100");
    }

    #[test]
    fn admin_with_wrong_or_empty_password_is_refused() {
        assert_eq!(
            authorize_admin(Some(admin()), "wrong").unwrap_err(),
            LoginRefusal::WrongPassword
        );
        assert_eq!(
            authorize_admin(Some(admin()), "").unwrap_err(),
            LoginRefusal::MissingPassword
        );
    }

    #[test]
    fn worker_cpf_on_admin_path_is_refused_with_any_password() {
        for pw in ["", "secret123", "anything"] {
            assert_eq!(
                authorize_admin(Some(worker()), pw).unwrap_err(),
                LoginRefusal::WrongRole
            );
        }
    }

    #[test]
    fn admin_cpf_on_worker_path_is_refused() {
        assert_eq!(
            authorize_worker(Some(admin())).unwrap_err(),
            LoginRefusal::WrongRole
        );
        assert_eq!(authorize_worker(Some(worker())).unwrap().id, 2);
    }

    #[test]
    fn unknown_and_inactive_users_are_refused() {
        assert_eq!(authorize_worker(None).unwrap_err(), LoginRefusal::UnknownCpf);
        assert_eq!(
            authorize_admin(None, "secret123").unwrap_err(),
            LoginRefusal::UnknownCpf
        );

        let mut inactive = worker();
        inactive.is_active = false;
        assert_eq!(
            authorize_worker(Some(inactive)).unwrap_err(),
            LoginRefusal::Inactive
        );
    }

    #[test]
    fn admin_without_stored_hash_is_refused() {
        let mut broken = admin();
        broken.password = Some(String::new());
        assert_eq!(
            authorize_admin(Some(broken), "secret123").unwrap_err(),
            LoginRefusal::MissingPassword
        );
    }

    #[test]
    fn every_refusal_maps_to_the_generic_error() {
        let err = refused("12345678901", Role::Admin, LoginRefusal::UnknownCpf);
        let other = refused("12345678901", Role::Admin, LoginRefusal::WrongPassword);
        assert_eq!(err.to_string(), other.to_string());
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_paths_against_database() {
        let Some(pool) = test_support::test_pool().await else {
            return;
        };
        let admin_cpf = test_support::unique_cpf();
        let valid = crate::users::services::validate_new_user(
            crate::users::dto::CreateUserRequest {
                cpf: admin_cpf.clone(),
                password: Some("secret123".into()),
                first_name: "Chefe".into(),
                last_name: "Admin".into(),
                email: None,
                profile_image_url: None,
                is_admin: true,
                work_type: "Filetagem".into(),
            },
        )
        .unwrap();
        crate::users::services::create_user(&pool, valid).await.unwrap();
        let worker = test_support::insert_worker(&pool, "Ana").await;

        assert!(login_admin(&pool, &admin_cpf, "secret123").await.is_ok());
        assert!(matches!(
            login_admin(&pool, &admin_cpf, "wrong").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            login_worker(&pool, &admin_cpf).await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            login_admin(&pool, &worker.cpf, "").await,
            Err(AppError::InvalidCredentials)
        ));
        assert_eq!(login_worker(&pool, &worker.cpf).await.unwrap().id, worker.id);
        assert!(matches!(
            login_worker(&pool, "123").await,
            Err(AppError::Validation(_))
        ));
    }
}
