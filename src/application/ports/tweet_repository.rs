use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::tweets::tweet::{Page, Tweet};

#[derive(Debug, Clone)]
pub struct NewTweet {
    pub user_id: Uuid,
    pub body: String,
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeState {
    pub liked: bool,
    pub like_count: i64,
}

#[async_trait]
pub trait TweetRepository: Send + Sync {
    async fn insert(&self, new_tweet: &NewTweet) -> anyhow::Result<Tweet>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Tweet>>;
    /// Newest first, ties broken by id descending.
    async fn list_recent(&self, page: Page) -> anyhow::Result<Vec<Tweet>>;
    async fn list_by_authors(&self, authors: &[Uuid], page: Page) -> anyhow::Result<Vec<Tweet>>;
    async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> anyhow::Result<bool>;
    /// `None` when the tweet does not exist.
    async fn toggle_like(&self, tweet_id: Uuid, user_id: Uuid) -> anyhow::Result<Option<LikeState>>;
}
