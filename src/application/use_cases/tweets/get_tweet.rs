use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::ports::tweet_repository::TweetRepository;
use crate::domain::tweets::tweet::Tweet;

pub struct GetTweet<'a, R: TweetRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: TweetRepository + ?Sized> GetTweet<'a, R> {
    pub async fn execute(&self, id: Uuid) -> Result<Tweet, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("tweet not found"))
    }
}
