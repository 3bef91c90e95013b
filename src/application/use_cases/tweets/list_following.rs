use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::ports::tweet_repository::TweetRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::tweets::tweet::{Page, Tweet};

/// Tweets by the caller and everyone the caller follows.
pub struct ListFollowing<'a, U, T>
where
    U: UserRepository + ?Sized,
    T: TweetRepository + ?Sized,
{
    pub users: &'a U,
    pub tweets: &'a T,
}

impl<'a, U, T> ListFollowing<'a, U, T>
where
    U: UserRepository + ?Sized,
    T: TweetRepository + ?Sized,
{
    pub async fn execute(&self, user_id: Uuid, page: Page) -> Result<Vec<Tweet>, AppError> {
        let mut authors = self.users.following_ids(user_id).await?;
        authors.push(user_id);
        Ok(self.tweets.list_by_authors(&authors, page).await?)
    }
}
