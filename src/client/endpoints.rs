const LOCAL_API_BASE: &str = "http://localhost:8080";

/// API locations derived from where the browser client was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    base_url: String,
}

impl ApiEndpoints {
    /// `protocol` may be given with or without the trailing colon, matching
    /// `window.location.protocol`.
    pub fn for_location(protocol: &str, hostname: &str) -> Self {
        let host = hostname.trim();
        let base_url = if host == "localhost" || host == "127.0.0.1" {
            LOCAL_API_BASE.to_string()
        } else {
            let scheme = protocol.trim().trim_end_matches(':');
            let scheme = if scheme.is_empty() { "https" } else { scheme };
            format!("{scheme}://{host}")
        };
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_base(&self) -> String {
        format!("{}/api/v1", self.base_url)
    }

    pub fn user_endpoint(&self) -> String {
        format!("{}/user", self.api_base())
    }

    pub fn tweet_endpoint(&self) -> String {
        format!("{}/tweet", self.api_base())
    }

    /// Absolute URL for a server-relative asset path such as `/uploads/x.png`.
    /// Absolute URLs pass through untouched.
    pub fn asset_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
