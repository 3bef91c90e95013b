use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::ports::user_repository::UserRepository;

/// Identity bound to a request once its session token has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
}

/// Confirms that a signature-checked token still refers to a live session:
/// the user must exist and the token's version must match the stored one.
pub struct Authenticate<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> Authenticate<'a, R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        token_version: i32,
    ) -> Result<AuthenticatedUser, AppError> {
        let state = self
            .repo
            .session_state(user_id)
            .await?
            .ok_or_else(|| AppError::unauthenticated("session is no longer valid"))?;
        if state.session_version != token_version {
            return Err(AppError::unauthenticated("session is no longer valid"));
        }
        Ok(AuthenticatedUser {
            id: user_id,
            username: state.username,
        })
    }
}
