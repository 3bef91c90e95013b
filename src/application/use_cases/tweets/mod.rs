pub mod create_tweet;
pub mod delete_tweet;
pub mod get_tweet;
pub mod list_feed;
pub mod list_following;
pub mod list_user_tweets;
pub mod toggle_like;
