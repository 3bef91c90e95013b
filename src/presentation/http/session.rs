// --- Session gate: token extraction, verification and cookie helpers ---

use axum::extract::{FromRef, FromRequestParts};
use axum::http::{HeaderMap, request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::use_cases::auth::authenticate::Authenticate;
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;

pub const SESSION_COOKIE: &str = "token";

/// Verified identity of the caller, handed explicitly to handlers that need it.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AppContext: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ctx = AppContext::from_ref(state);
        let token = session_token(&parts.headers)
            .ok_or_else(|| AppError::unauthenticated("authentication required"))?;
        let (user_id, version) = ctx
            .session_keys()
            .verify(&token)
            .map_err(|e| AppError::unauthenticated(e.to_string()))?;
        let repo = ctx.user_repo();
        let uc = Authenticate {
            repo: repo.as_ref(),
        };
        let user = uc.execute(user_id, version).await?;
        Ok(AuthUser {
            id: user.id,
            username: user.username,
        })
    }
}

/// `Authorization: Bearer` wins over the cookie when both are present.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(t) = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Some(t.to_string());
    }
    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

fn same_site(cfg: &Config) -> SameSite {
    // Cross-site SPA deployments only receive the cookie with SameSite=None, which requires Secure.
    if cfg.cookie_secure {
        SameSite::None
    } else {
        SameSite::Lax
    }
}

pub fn session_cookie(cfg: &Config, token: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .path("/")
        .max_age(time::Duration::seconds(max_age_secs.max(0)))
        .same_site(same_site(cfg))
        .secure(cfg.cookie_secure)
        .build()
}

pub fn cleared_session_cookie(cfg: &Config) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .path("/")
        .max_age(time::Duration::ZERO)
        .same_site(same_site(cfg))
        .secure(cfg.cookie_secure)
        .build()
}
