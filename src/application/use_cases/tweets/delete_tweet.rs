use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::ports::image_storage_port::ImageStorage;
use crate::application::ports::tweet_repository::TweetRepository;
use crate::application::use_cases::images;

pub struct DeleteTweet<'a, R, S>
where
    R: TweetRepository + ?Sized,
    S: ImageStorage + ?Sized,
{
    pub repo: &'a R,
    pub storage: &'a S,
}

impl<'a, R, S> DeleteTweet<'a, R, S>
where
    R: TweetRepository + ?Sized,
    S: ImageStorage + ?Sized,
{
    pub async fn execute(&self, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        let tweet = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("tweet not found"))?;
        if tweet.user_id != user_id {
            return Err(AppError::forbidden("you can only delete your own tweets"));
        }
        if !self.repo.delete_owned(id, user_id).await? {
            // Raced with another delete.
            return Err(AppError::not_found("tweet not found"));
        }
        if let Some(path) = tweet.image_path.as_deref() {
            images::discard_image(self.storage, path).await;
        }
        Ok(())
    }
}
