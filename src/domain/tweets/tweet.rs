use uuid::Uuid;

pub const MAX_TWEET_CHARS: usize = 280;

#[derive(Debug, Clone)]
pub struct Tweet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub author_username: String,
    pub author_name: String,
    pub author_avatar_path: Option<String>,
    pub body: String,
    pub image_path: Option<String>,
    pub like_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TweetBodyError {
    #[error("tweet body must not be empty")]
    Empty,
    #[error("tweet body must be at most 280 characters")]
    TooLong,
}

/// Trims the body and enforces the length bound. An image does not make an
/// empty body acceptable.
pub fn normalize_body(raw: &str) -> Result<String, TweetBodyError> {
    let body = raw.trim();
    if body.is_empty() {
        return Err(TweetBodyError::Empty);
    }
    if body.chars().count() > MAX_TWEET_CHARS {
        return Err(TweetBodyError::TooLong);
    }
    Ok(body.to_string())
}

/// Offset/limit window over a newest-first listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 20;
    pub const MAX_LIMIT: i64 = 100;

    pub fn new(offset: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            offset: offset.unwrap_or(0).max(0),
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
        }
    }

    /// Offset of the following page, if this one came back full.
    pub fn next_offset(&self, returned: usize) -> Option<i64> {
        (returned as i64 >= self.limit).then(|| self.offset + self.limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_is_trimmed_and_bounded() {
        assert_eq!(normalize_body("  hello  ").unwrap(), "hello");
        assert_eq!(normalize_body("   "), Err(TweetBodyError::Empty));
        assert!(normalize_body(&"é".repeat(MAX_TWEET_CHARS)).is_ok());
        assert_eq!(
            normalize_body(&"a".repeat(MAX_TWEET_CHARS + 1)),
            Err(TweetBodyError::TooLong)
        );
    }

    #[test]
    fn page_clamps_inputs() {
        assert_eq!(Page::new(None, None), Page { offset: 0, limit: 20 });
        assert_eq!(Page::new(Some(-5), Some(0)), Page { offset: 0, limit: 1 });
        assert_eq!(Page::new(Some(40), Some(500)).limit, Page::MAX_LIMIT);
    }

    #[test]
    fn next_offset_only_for_full_pages() {
        let page = Page::new(Some(20), Some(10));
        assert_eq!(page.next_offset(10), Some(30));
        assert_eq!(page.next_offset(3), None);
    }
}
