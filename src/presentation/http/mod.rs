pub mod error;
pub mod health;
pub mod payload;
pub mod router;
pub mod session;
pub mod tweets;
pub mod users;

/// Public URL of a file stored under the uploads root.
pub(crate) fn upload_url(relative: &str) -> String {
    format!("/uploads/{}", relative.trim_start_matches('/'))
}
