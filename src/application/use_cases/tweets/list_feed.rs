use crate::application::error::AppError;
use crate::application::ports::tweet_repository::TweetRepository;
use crate::domain::tweets::tweet::{Page, Tweet};

pub struct ListFeed<'a, R: TweetRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: TweetRepository + ?Sized> ListFeed<'a, R> {
    pub async fn execute(&self, page: Page) -> Result<Vec<Tweet>, AppError> {
        Ok(self.repo.list_recent(page).await?)
    }
}
