use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{StatusCode, header};
use axum::{Form, Json};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::application::error::AppError;
use crate::application::ports::image_storage_port::ImageUpload;

/// Request body accepted as JSON, URL-encoded or multipart form data.
///
/// Multipart text fields are collected into a string map before being
/// deserialized into `T`; at most one file part is kept in `file`.
#[derive(Debug)]
pub struct Payload<T> {
    pub data: T,
    pub file: Option<ImageUpload>,
}

#[axum::async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or_default();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| rejection_error(e.status(), e.body_text()))?;
            return read_multipart(multipart).await;
        }
        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(data) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| rejection_error(e.status(), e.body_text()))?;
            return Ok(Payload { data, file: None });
        }
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| rejection_error(e.status(), e.body_text()))?;
        Ok(Payload { data, file: None })
    }
}

/// Body-limit failures surface as 413; every other extractor rejection is a
/// malformed request.
fn rejection_error(status: StatusCode, text: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("request body is too large".into())
    } else {
        AppError::validation(text)
    }
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    rejection_error(err.status(), err.body_text())
}

async fn read_multipart<T: DeserializeOwned>(
    mut multipart: Multipart,
) -> Result<Payload<T>, AppError> {
    let mut fields = Map::new();
    let mut file: Option<ImageUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                // Browsers send an empty, unnamed part when no file was chosen.
                if bytes.is_empty() && file_name.is_empty() {
                    continue;
                }
                if file.is_some() {
                    return Err(AppError::validation("only one file may be attached"));
                }
                file = Some(ImageUpload {
                    filename: Some(file_name).filter(|n| !n.is_empty()),
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            None => {
                let text = field.text().await.map_err(multipart_error)?;
                fields.insert(name, Value::String(text));
            }
        }
    }

    let data = serde_json::from_value(Value::Object(fields))
        .map_err(|e| AppError::validation(format!("invalid form data: {e}")))?;
    Ok(Payload { data, file })
}

/// Rejects attachments above the configured upload limit.
pub fn ensure_within_limit(file: Option<&ImageUpload>, max_bytes: usize) -> Result<(), AppError> {
    match file {
        Some(f) if f.bytes.len() > max_bytes => Err(AppError::PayloadTooLarge(format!(
            "image must be at most {max_bytes} bytes"
        ))),
        _ => Ok(()),
    }
}
