use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::use_cases::auth::login::{Login, LoginRequest as LoginDto};
use crate::application::use_cases::auth::logout::Logout;
use crate::application::use_cases::auth::me::GetMe;
use crate::application::use_cases::auth::register::{Register, RegisterRequest as RegisterDto};
use crate::application::use_cases::users::follow::Follow;
use crate::application::use_cases::users::get_profile::GetProfile;
use crate::application::use_cases::users::update_profile::{UpdateProfile, UpdateProfileRequest};
use crate::bootstrap::app_context::AppContext;
use crate::domain::users::user::User;
use crate::presentation::http::error::ErrorBody;
use crate::presentation::http::payload::{Payload, ensure_within_limit};
use crate::presentation::http::session::{self, AuthUser};
use crate::presentation::http::upload_url;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub bio: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProfileForm {
    pub name: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    /// Only present on the caller's own profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub followers_count: i64,
    pub following_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl UserResponse {
    fn public(user: User) -> Self {
        Self::build(user, false)
    }

    fn private(user: User) -> Self {
        Self::build(user, true)
    }

    fn build(user: User, with_email: bool) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            email: with_email.then_some(user.email),
            bio: user.bio,
            avatar_url: user.avatar_path.as_deref().map(upload_url),
            followers_count: user.followers_count,
            following_count: user.following_count,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FollowResponse {
    pub success: bool,
    pub following: bool,
    pub message: String,
    pub user: UserResponse,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/profile/:username", get(get_profile).put(update_profile))
        .route("/follow/:username", post(follow))
        .route("/unfollow/:username", post(unfollow))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/v1/user/register", tag = "Users", request_body = RegisterRequest, security(()), responses(
    (status = 201, body = UserResponse),
    (status = 400, body = ErrorBody),
    (status = 409, body = ErrorBody)
))]
pub async fn register(
    State(ctx): State<AppContext>,
    Payload { data: req, .. }: Payload<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let repo = ctx.user_repo();
    let uc = Register {
        repo: repo.as_ref(),
    };
    let dto = RegisterDto {
        name: req.name,
        username: req.username,
        email: req.email,
        password: req.password,
        bio: req.bio,
    };
    let user = uc.execute(&dto).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::public(user))))
}

#[utoipa::path(post, path = "/api/v1/user/login", tag = "Users", request_body = LoginRequest, security(()), responses(
    (status = 200, body = LoginResponse),
    (status = 401, body = ErrorBody)
))]
pub async fn login(
    State(ctx): State<AppContext>,
    jar: CookieJar,
    Payload { data: req, .. }: Payload<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let repo = ctx.user_repo();
    let uc = Login {
        repo: repo.as_ref(),
    };
    let dto = LoginDto {
        username: req.username,
        password: req.password,
    };
    let logged_in = uc.execute(&dto).await?;

    let keys = ctx.session_keys();
    let token = keys.issue(logged_in.user.id, logged_in.session_version)?;
    let jar = jar.add(session::session_cookie(&ctx.cfg, token, keys.ttl_secs()));
    tracing::info!(user_id = %logged_in.user.id, "user_logged_in");

    let message = format!("Welcome back {}", logged_in.user.name);
    Ok((
        jar,
        Json(LoginResponse {
            success: true,
            message,
            user: UserResponse::private(logged_in.user),
        }),
    ))
}

#[utoipa::path(post, path = "/api/v1/user/logout", tag = "Users", responses((status = 200, body = MessageResponse)))]
pub async fn logout(
    State(ctx): State<AppContext>,
    user: Option<AuthUser>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    if let Some(user) = user {
        let repo = ctx.user_repo();
        Logout {
            repo: repo.as_ref(),
        }
        .execute(user.id)
        .await?;
        tracing::info!(user_id = %user.id, "user_logged_out");
    }
    let jar = jar.add(session::cleared_session_cookie(&ctx.cfg));
    Ok((jar, Json(MessageResponse::new("Logged out successfully"))))
}

#[utoipa::path(get, path = "/api/v1/user/me", tag = "Users", responses(
    (status = 200, body = UserResponse),
    (status = 401, body = ErrorBody)
))]
pub async fn me(
    State(ctx): State<AppContext>,
    user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let repo = ctx.user_repo();
    let uc = GetMe {
        repo: repo.as_ref(),
    };
    let row = uc.execute(user.id).await?;
    Ok(Json(UserResponse::private(row)))
}

#[utoipa::path(get, path = "/api/v1/user/profile/{username}", tag = "Users", security(()),
    params(("username" = String, Path, description = "User handle")),
    responses((status = 200, body = UserResponse), (status = 404, body = ErrorBody)))]
pub async fn get_profile(
    State(ctx): State<AppContext>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let repo = ctx.user_repo();
    let uc = GetProfile {
        repo: repo.as_ref(),
    };
    let user = uc.execute(&username).await?;
    Ok(Json(UserResponse::public(user)))
}

#[utoipa::path(put, path = "/api/v1/user/profile/{username}", tag = "Users",
    params(("username" = String, Path, description = "User handle")),
    request_body(content = UpdateProfileForm, description = "JSON, URL-encoded or multipart with an optional `avatar` file"),
    responses(
        (status = 200, body = UserResponse),
        (status = 401, body = ErrorBody),
        (status = 403, body = ErrorBody)
    ))]
pub async fn update_profile(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Path(username): Path<String>,
    Payload { data, file }: Payload<UpdateProfileForm>,
) -> Result<Json<UserResponse>, AppError> {
    ensure_within_limit(file.as_ref(), ctx.cfg.upload_max_bytes)?;
    let repo = ctx.user_repo();
    let storage = ctx.image_storage();
    let uc = UpdateProfile {
        repo: repo.as_ref(),
        storage: storage.as_ref(),
    };
    let req = UpdateProfileRequest {
        name: data.name,
        bio: data.bio,
        avatar: file,
    };
    let updated = uc.execute(user.id, &username, req).await?;
    Ok(Json(UserResponse::private(updated)))
}

#[utoipa::path(post, path = "/api/v1/user/follow/{username}", tag = "Users",
    params(("username" = String, Path, description = "User handle to follow")),
    responses((status = 200, body = FollowResponse), (status = 404, body = ErrorBody)))]
pub async fn follow(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Path(username): Path<String>,
) -> Result<Json<FollowResponse>, AppError> {
    let repo = ctx.user_repo();
    let out = Follow {
        repo: repo.as_ref(),
    }
    .follow(user.id, &username)
    .await?;
    let message = format!("{} is now following {}", user.username, out.target.username);
    Ok(Json(FollowResponse {
        success: true,
        following: out.following,
        message,
        user: UserResponse::public(out.target),
    }))
}

#[utoipa::path(post, path = "/api/v1/user/unfollow/{username}", tag = "Users",
    params(("username" = String, Path, description = "User handle to unfollow")),
    responses((status = 200, body = FollowResponse), (status = 404, body = ErrorBody)))]
pub async fn unfollow(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Path(username): Path<String>,
) -> Result<Json<FollowResponse>, AppError> {
    let repo = ctx.user_repo();
    let out = Follow {
        repo: repo.as_ref(),
    }
    .unfollow(user.id, &username)
    .await?;
    let message = format!("{} unfollowed {}", user.username, out.target.username);
    Ok(Json(FollowResponse {
        success: true,
        following: out.following,
        message,
        user: UserResponse::public(out.target),
    }))
}
