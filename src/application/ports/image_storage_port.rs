use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Tweet,
    Avatar,
}

impl ImageKind {
    pub fn dir_name(self) -> &'static str {
        match self {
            ImageKind::Tweet => "tweets",
            ImageKind::Avatar => "avatars",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoredImage {
    /// Path relative to the uploads root, always with `/` separators.
    pub relative_path: String,
    pub size: i64,
}

#[async_trait]
pub trait ImageStorage: Send + Sync {
    async fn store_image(
        &self,
        kind: ImageKind,
        original_filename: Option<&str>,
        bytes: &[u8],
    ) -> anyhow::Result<StoredImage>;
    /// Missing files are not an error.
    async fn delete_image(&self, relative_path: &str) -> anyhow::Result<()>;
}

/// Raw upload as received from the client, before validation.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}
