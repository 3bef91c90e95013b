use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_]{3,30}$").expect("valid regex"));

pub const MAX_NAME_CHARS: usize = 50;
pub const MAX_BIO_CHARS: usize = 160;
pub const MAX_EMAIL_LEN: usize = 254;
pub const MIN_PASSWORD_CHARS: usize = 8;
pub const MAX_PASSWORD_CHARS: usize = 128;

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub name: String,
    pub bio: Option<String>,
    pub avatar_path: Option<String>,
    pub followers_count: i64,
    pub following_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserFieldError {
    #[error("username must be 3-30 characters of letters, digits or underscores")]
    Username,
    #[error("email address is invalid")]
    Email,
    #[error("name must be between 1 and 50 characters")]
    Name,
    #[error("password must be between 8 and 128 characters")]
    Password,
    #[error("bio must be at most 160 characters")]
    Bio,
}

/// Handles are case-insensitive; the canonical form is lower-case.
pub fn normalize_username(raw: &str) -> Result<String, UserFieldError> {
    let candidate = raw.trim().to_lowercase();
    if USERNAME_RE.is_match(&candidate) {
        Ok(candidate)
    } else {
        Err(UserFieldError::Username)
    }
}

pub fn normalize_email(raw: &str) -> Result<String, UserFieldError> {
    let candidate = raw.trim().to_lowercase();
    if candidate.len() > MAX_EMAIL_LEN || candidate.chars().any(char::is_whitespace) {
        return Err(UserFieldError::Email);
    }
    match candidate.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
        {
            Ok(candidate)
        }
        _ => Err(UserFieldError::Email),
    }
}

pub fn normalize_name(raw: &str) -> Result<String, UserFieldError> {
    let name = raw.trim();
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_CHARS {
        return Err(UserFieldError::Name);
    }
    Ok(name.to_string())
}

pub fn validate_password(raw: &str) -> Result<(), UserFieldError> {
    let len = raw.chars().count();
    if (MIN_PASSWORD_CHARS..=MAX_PASSWORD_CHARS).contains(&len) {
        Ok(())
    } else {
        Err(UserFieldError::Password)
    }
}

/// Returns `None` when the bio is blank, which clears it.
pub fn normalize_bio(raw: &str) -> Result<Option<String>, UserFieldError> {
    let bio = raw.trim();
    if bio.chars().count() > MAX_BIO_CHARS {
        return Err(UserFieldError::Bio);
    }
    Ok((!bio.is_empty()).then(|| bio.to_string()))
}
