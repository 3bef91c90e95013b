use crate::domain::tweets::tweet::TweetBodyError;
use crate::domain::users::user::UserFieldError;

/// Failure taxonomy shared by every use case. The presentation layer maps
/// each variant to one HTTP status.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        AppError::Unauthenticated(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }
}

impl From<UserFieldError> for AppError {
    fn from(err: UserFieldError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<TweetBodyError> for AppError {
    fn from(err: TweetBodyError) -> Self {
        AppError::Validation(err.to_string())
    }
}
