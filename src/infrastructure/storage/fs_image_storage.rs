use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::application::ports::image_storage_port::{ImageKind, ImageStorage, StoredImage};
use crate::infrastructure::storage::{relative_from_uploads, resolve_under, sanitize_filename, split_name};

const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// Stores uploads below a root directory that is also served at `/uploads`.
pub struct FsImageStorage {
    uploads_root: PathBuf,
}

impl FsImageStorage {
    pub fn new(uploads_root: impl Into<PathBuf>) -> Self {
        Self {
            uploads_root: uploads_root.into(),
        }
    }
}

#[async_trait]
impl ImageStorage for FsImageStorage {
    async fn store_image(
        &self,
        kind: ImageKind,
        original_filename: Option<&str>,
        bytes: &[u8],
    ) -> anyhow::Result<StoredImage> {
        let dir = self.uploads_root.join(kind.dir_name());
        fs::create_dir_all(&dir).await?;

        let safe = sanitize_filename(original_filename.unwrap_or("image.bin"));
        let (stem, ext) = split_name(&safe);
        let ts = chrono::Utc::now().format("%Y%m%d-%H%M%S");
        let base = format!("{}_{}", stem, ts);
        let with_ext = |name: &str| {
            if ext.is_empty() {
                name.to_string()
            } else {
                format!("{}.{}", name, ext)
            }
        };

        // `create_new` claims the name atomically; concurrent uploads of the
        // same name in the same second step the counter instead of sharing a file.
        let mut counter = 0u32;
        let (candidate, mut file) = loop {
            let name = if counter == 0 {
                with_ext(&base)
            } else {
                with_ext(&format!("{}-{}", base, counter))
            };
            let candidate = dir.join(&name);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
                .await
            {
                Ok(file) => break (candidate, file),
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                    counter += 1;
                    if counter > MAX_NAME_ATTEMPTS {
                        anyhow::bail!("no free file name for {}", base);
                    }
                }
                Err(err) => return Err(err.into()),
            }
        };

        let written = async {
            file.write_all(bytes).await?;
            file.flush().await
        }
        .await;
        if let Err(err) = written {
            let _ = fs::remove_file(&candidate).await;
            return Err(err.into());
        }

        let relative_path = relative_from_uploads(&self.uploads_root, &candidate);
        tracing::debug!(path = %relative_path, size = bytes.len(), "image_stored");
        Ok(StoredImage {
            relative_path,
            size: bytes.len() as i64,
        })
    }

    async fn delete_image(&self, relative_path: &str) -> anyhow::Result<()> {
        let full = resolve_under(&self.uploads_root, relative_path)?;
        match fs::remove_file(&full).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
