use crate::application::error::AppError;
use crate::application::ports::image_storage_port::{
    ImageKind, ImageStorage, ImageUpload, StoredImage,
};

/// Raster formats accepted for tweets and avatars. Scriptable formats such
/// as SVG are never stored, since `/uploads` is served from the API origin.
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

fn allowed_extension(name: &str) -> Option<&'static str> {
    let ext = std::path::Path::new(name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    ALLOWED_EXTENSIONS.iter().copied().find(|allowed| *allowed == ext)
}

/// Picks a file name with an allowed raster extension, preferring the
/// client's name and falling back to the declared content type.
pub fn image_filename(upload: &ImageUpload) -> Result<String, AppError> {
    if upload.bytes.is_empty() {
        return Err(AppError::validation("uploaded image is empty"));
    }
    if let Some(name) = upload
        .filename
        .as_deref()
        .filter(|n| allowed_extension(n).is_some())
    {
        return Ok(name.to_string());
    }
    let declared = upload
        .content_type
        .as_deref()
        .map(|ct| ct.split(';').next().unwrap_or_default().trim().to_ascii_lowercase());
    let from_type = declared
        .as_deref()
        .and_then(mime_guess::get_mime_extensions_str)
        .and_then(|exts| {
            exts.iter()
                .find_map(|ext| ALLOWED_EXTENSIONS.iter().find(|allowed| *allowed == ext))
        });
    match from_type {
        Some(ext) => Ok(format!("image.{ext}")),
        None => Err(AppError::validation(
            "attachment must be a PNG, JPEG, GIF or WebP image",
        )),
    }
}

pub async fn store_image<S: ImageStorage + ?Sized>(
    storage: &S,
    kind: ImageKind,
    upload: &ImageUpload,
) -> Result<StoredImage, AppError> {
    let filename = image_filename(upload)?;
    let stored = storage
        .store_image(kind, Some(&filename), &upload.bytes)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, kind = kind.dir_name(), "store_image_failed");
            err
        })?;
    tracing::debug!(path = %stored.relative_path, size = stored.size, "image_accepted");
    Ok(stored)
}

/// Best-effort removal; a leftover file is logged, never surfaced.
pub async fn discard_image<S: ImageStorage + ?Sized>(storage: &S, relative_path: &str) {
    if let Err(err) = storage.delete_image(relative_path).await {
        tracing::warn!(error = ?err, path = %relative_path, "failed to remove stored image");
    }
}
