use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};

use crate::application::error::AppError;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::users::user::{self, User};

pub struct Login<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoggedIn {
    pub user: User,
    pub session_version: i32,
}

const BAD_CREDENTIALS: &str = "incorrect username or password";

impl<'a, R: UserRepository + ?Sized> Login<'a, R> {
    pub async fn execute(&self, req: &LoginRequest) -> Result<LoggedIn, AppError> {
        // Malformed handles can never match a stored user.
        let Ok(username) = user::normalize_username(&req.username) else {
            return Err(AppError::unauthenticated(BAD_CREDENTIALS));
        };
        let Some(creds) = self.repo.find_credentials(&username).await? else {
            return Err(AppError::unauthenticated(BAD_CREDENTIALS));
        };
        let parsed =
            PasswordHash::new(&creds.password_hash).map_err(|e| anyhow::anyhow!(e.to_string()))?;
        if Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed)
            .is_err()
        {
            return Err(AppError::unauthenticated(BAD_CREDENTIALS));
        }
        Ok(LoggedIn {
            user: creds.user,
            session_version: creds.session_version,
        })
    }
}
