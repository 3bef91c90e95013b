pub mod image_storage_port;
pub mod tweet_repository;
pub mod user_repository;
