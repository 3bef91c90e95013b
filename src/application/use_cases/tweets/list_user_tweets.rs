use crate::application::error::AppError;
use crate::application::ports::tweet_repository::TweetRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::users::get_profile::GetProfile;
use crate::domain::tweets::tweet::{Page, Tweet};

pub struct ListUserTweets<'a, U, T>
where
    U: UserRepository + ?Sized,
    T: TweetRepository + ?Sized,
{
    pub users: &'a U,
    pub tweets: &'a T,
}

impl<'a, U, T> ListUserTweets<'a, U, T>
where
    U: UserRepository + ?Sized,
    T: TweetRepository + ?Sized,
{
    pub async fn execute(&self, username: &str, page: Page) -> Result<Vec<Tweet>, AppError> {
        let author = GetProfile { repo: self.users }.execute(username).await?;
        Ok(self.tweets.list_by_authors(&[author.id], page).await?)
    }
}
