use axum::extract::{DefaultBodyLimit, MatchedPath};
use axum::{Json, Router};
use http::{HeaderValue, Method, StatusCode, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::presentation::http::error::ErrorBody;
use crate::presentation::http::{health, tweets, users};

/// Room for multipart framing and text fields on top of the file itself.
const BODY_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::health::health,
        crate::presentation::http::users::register,
        crate::presentation::http::users::login,
        crate::presentation::http::users::logout,
        crate::presentation::http::users::me,
        crate::presentation::http::users::get_profile,
        crate::presentation::http::users::update_profile,
        crate::presentation::http::users::follow,
        crate::presentation::http::users::unfollow,
        crate::presentation::http::tweets::create_tweet,
        crate::presentation::http::tweets::list_feed,
        crate::presentation::http::tweets::list_following,
        crate::presentation::http::tweets::list_user_tweets,
        crate::presentation::http::tweets::get_tweet,
        crate::presentation::http::tweets::delete_tweet,
        crate::presentation::http::tweets::toggle_like,
    ),
    components(schemas(
        crate::presentation::http::error::ErrorBody,
        crate::presentation::http::health::HealthResp,
        crate::presentation::http::users::RegisterRequest,
        crate::presentation::http::users::LoginRequest,
        crate::presentation::http::users::UpdateProfileForm,
        crate::presentation::http::users::UserResponse,
        crate::presentation::http::users::LoginResponse,
        crate::presentation::http::users::MessageResponse,
        crate::presentation::http::users::FollowResponse,
        crate::presentation::http::tweets::CreateTweetRequest,
        crate::presentation::http::tweets::AuthorSummary,
        crate::presentation::http::tweets::TweetResponse,
        crate::presentation::http::tweets::FeedResponse,
        crate::presentation::http::tweets::LikeResponse,
    )),
    tags(
        (name = "Users", description = "Accounts, sessions, profiles and follows"),
        (name = "Tweets", description = "Posting, feeds and likes"),
        (name = "Health", description = "Liveness check")
    )
)]
pub struct ApiDoc;

/// Assembles the full HTTP surface: API routes, uploads, docs and the
/// cross-cutting layers.
pub fn build_router(ctx: AppContext) -> Router {
    let cfg = ctx.cfg.clone();

    Router::new()
        .merge(health::routes())
        .nest("/api/v1/user", users::routes(ctx.clone()))
        .nest("/api/v1/tweet", tweets::routes(ctx))
        .merge(uploads_routes(&cfg))
        .merge(SwaggerUi::new("/api/v1/docs").url("/api/v1/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .layer(cors_layer(&cfg))
        .layer(DefaultBodyLimit::max(
            cfg.upload_max_bytes.saturating_add(BODY_OVERHEAD_BYTES),
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        )
}

/// Read-only view of the uploads root. Browsers must not sniff a stored file
/// into an executable type.
fn uploads_routes(cfg: &Config) -> Router {
    let files = ServeDir::new(&cfg.uploads_dir).append_index_html_on_directories(false);
    Router::new()
        .nest_service("/uploads", files)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
}

/// Exact-match origin allow-list with credentials; wildcards are never sent.
pub fn cors_layer(cfg: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .cors_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring_invalid_cors_origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            success: false,
            message: "Route not found".into(),
        }),
    )
}
