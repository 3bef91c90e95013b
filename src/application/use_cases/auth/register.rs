use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString},
};
use password_hash::rand_core::OsRng;

use crate::application::error::AppError;
use crate::application::ports::user_repository::{CreateUserOutcome, NewUser, UserRepository};
use crate::domain::users::user::{self, User};

pub struct Register<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub bio: Option<String>,
}

impl<'a, R: UserRepository + ?Sized> Register<'a, R> {
    pub async fn execute(&self, req: &RegisterRequest) -> Result<User, AppError> {
        let username = user::normalize_username(&req.username)?;
        let email = user::normalize_email(&req.email)?;
        let name = user::normalize_name(&req.name)?;
        user::validate_password(&req.password)?;
        let bio = match req.bio.as_deref() {
            Some(raw) => user::normalize_bio(raw)?,
            None => None,
        };

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?
            .to_string();

        let new_user = NewUser {
            username,
            email,
            name,
            password_hash,
            bio,
        };
        match self.repo.create_user(&new_user).await? {
            CreateUserOutcome::Created(user) => {
                tracing::info!(user_id = %user.id, username = %user.username, "user_registered");
                Ok(user)
            }
            CreateUserOutcome::UsernameTaken => {
                Err(AppError::Conflict("username is already taken".into()))
            }
            CreateUserOutcome::EmailTaken => {
                Err(AppError::Conflict("email is already registered".into()))
            }
        }
    }
}
