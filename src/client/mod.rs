pub mod endpoints;
pub mod time_since;

pub use endpoints::ApiEndpoints;
pub use time_since::{time_since, time_since_now, time_since_str};
