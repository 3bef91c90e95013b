use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::ports::tweet_repository::{LikeState, TweetRepository};

pub struct ToggleLike<'a, R: TweetRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: TweetRepository + ?Sized> ToggleLike<'a, R> {
    pub async fn execute(&self, tweet_id: Uuid, user_id: Uuid) -> Result<LikeState, AppError> {
        self.repo
            .toggle_like(tweet_id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("tweet not found"))
    }
}
