use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::ports::user_repository::UserRepository;

/// Revokes every session token issued to the user so far.
pub struct Logout<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> Logout<'a, R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<(), AppError> {
        self.repo.bump_session_version(user_id).await?;
        Ok(())
    }
}
