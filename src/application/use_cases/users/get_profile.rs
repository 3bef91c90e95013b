use crate::application::error::AppError;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::users::user::{self, User};

pub struct GetProfile<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> GetProfile<'a, R> {
    pub async fn execute(&self, username: &str) -> Result<User, AppError> {
        let username =
            user::normalize_username(username).map_err(|_| AppError::not_found("user not found"))?;
        self.repo
            .find_by_username(&username)
            .await?
            .ok_or_else(|| AppError::not_found("user not found"))
    }
}
