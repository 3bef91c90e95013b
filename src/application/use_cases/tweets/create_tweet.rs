use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::ports::image_storage_port::{ImageKind, ImageStorage, ImageUpload};
use crate::application::ports::tweet_repository::{NewTweet, TweetRepository};
use crate::application::use_cases::images;
use crate::domain::tweets::tweet::{self, Tweet};

pub struct CreateTweet<'a, R, S>
where
    R: TweetRepository + ?Sized,
    S: ImageStorage + ?Sized,
{
    pub repo: &'a R,
    pub storage: &'a S,
}

impl<'a, R, S> CreateTweet<'a, R, S>
where
    R: TweetRepository + ?Sized,
    S: ImageStorage + ?Sized,
{
    pub async fn execute(
        &self,
        author_id: Uuid,
        body: &str,
        image: Option<&ImageUpload>,
    ) -> Result<Tweet, AppError> {
        let body = tweet::normalize_body(body)?;

        // The file is written before the row so the row never points at nothing.
        let image_path = match image {
            Some(upload) => Some(
                images::store_image(self.storage, ImageKind::Tweet, upload)
                    .await?
                    .relative_path,
            ),
            None => None,
        };

        let new_tweet = NewTweet {
            user_id: author_id,
            body,
            image_path,
        };
        match self.repo.insert(&new_tweet).await {
            Ok(tweet) => {
                tracing::debug!(tweet_id = %tweet.id, user_id = %author_id, "tweet_created");
                Ok(tweet)
            }
            Err(err) => {
                tracing::error!(error = ?err, user_id = %author_id, "insert_tweet_failed");
                if let Some(path) = new_tweet.image_path.as_deref() {
                    images::discard_image(self.storage, path).await;
                }
                Err(err.into())
            }
        }
    }
}
