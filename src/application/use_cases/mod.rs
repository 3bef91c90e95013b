pub mod auth;
pub mod images;
pub mod tweets;
pub mod users;
