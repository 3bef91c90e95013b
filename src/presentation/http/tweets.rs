use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::use_cases::tweets::create_tweet::CreateTweet;
use crate::application::use_cases::tweets::delete_tweet::DeleteTweet;
use crate::application::use_cases::tweets::get_tweet::GetTweet;
use crate::application::use_cases::tweets::list_feed::ListFeed;
use crate::application::use_cases::tweets::list_following::ListFollowing;
use crate::application::use_cases::tweets::list_user_tweets::ListUserTweets;
use crate::application::use_cases::tweets::toggle_like::ToggleLike;
use crate::bootstrap::app_context::AppContext;
use crate::domain::tweets::tweet::{Page, Tweet};
use crate::presentation::http::error::ErrorBody;
use crate::presentation::http::payload::{Payload, ensure_within_limit};
use crate::presentation::http::session::AuthUser;
use crate::presentation::http::upload_url;
use crate::presentation::http::users::MessageResponse;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTweetRequest {
    /// Text of the tweet; `description` is accepted as an alias.
    #[serde(alias = "description")]
    pub body: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TweetResponse {
    pub id: Uuid,
    pub body: String,
    pub image_url: Option<String>,
    pub like_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub author: AuthorSummary,
}

impl From<Tweet> for TweetResponse {
    fn from(t: Tweet) -> Self {
        Self {
            id: t.id,
            body: t.body,
            image_url: t.image_path.as_deref().map(upload_url),
            like_count: t.like_count,
            created_at: t.created_at,
            author: AuthorSummary {
                id: t.user_id,
                username: t.author_username,
                name: t.author_name,
                avatar_url: t.author_avatar_path.as_deref().map(upload_url),
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeedResponse {
    pub items: Vec<TweetResponse>,
    pub offset: i64,
    pub limit: i64,
    pub next_offset: Option<i64>,
}

impl FeedResponse {
    fn new(page: Page, tweets: Vec<Tweet>) -> Self {
        Self {
            next_offset: page.next_offset(tweets.len()),
            items: tweets.into_iter().map(TweetResponse::from).collect(),
            offset: page.offset,
            limit: page.limit,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LikeResponse {
    pub liked: bool,
    pub like_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

fn page_from(q: Option<Query<PageQuery>>) -> Page {
    match q {
        Some(Query(q)) => Page::new(q.offset, q.limit),
        None => Page::default(),
    }
}

fn parse_tweet_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::validation("invalid tweet id"))
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/create", post(create_tweet))
        .route("/feed", get(list_feed))
        .route("/following", get(list_following))
        .route("/user/:username", get(list_user_tweets))
        .route("/delete/:id", delete(delete_tweet))
        .route("/like/:id", put(toggle_like))
        .route("/:id", get(get_tweet))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/v1/tweet/create", tag = "Tweets",
    request_body(content = CreateTweetRequest, description = "JSON, URL-encoded or multipart with an optional `image` file"),
    responses(
        (status = 201, body = TweetResponse),
        (status = 400, body = ErrorBody),
        (status = 401, body = ErrorBody),
        (status = 413, body = ErrorBody)
    ))]
pub async fn create_tweet(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Payload { data, file }: Payload<CreateTweetRequest>,
) -> Result<(StatusCode, Json<TweetResponse>), AppError> {
    ensure_within_limit(file.as_ref(), ctx.cfg.upload_max_bytes)?;
    let repo = ctx.tweet_repo();
    let storage = ctx.image_storage();
    let uc = CreateTweet {
        repo: repo.as_ref(),
        storage: storage.as_ref(),
    };
    let tweet = uc.execute(user.id, &data.body, file.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(tweet.into())))
}

#[utoipa::path(get, path = "/api/v1/tweet/feed", tag = "Tweets", security(()),
    params(
        ("offset" = Option<i64>, Query, description = "Number of tweets to skip"),
        ("limit" = Option<i64>, Query, description = "Page size (1-100, default 20)")
    ),
    responses((status = 200, body = FeedResponse)))]
pub async fn list_feed(
    State(ctx): State<AppContext>,
    q: Option<Query<PageQuery>>,
) -> Result<Json<FeedResponse>, AppError> {
    let page = page_from(q);
    let repo = ctx.tweet_repo();
    let uc = ListFeed {
        repo: repo.as_ref(),
    };
    let tweets = uc.execute(page).await?;
    Ok(Json(FeedResponse::new(page, tweets)))
}

#[utoipa::path(get, path = "/api/v1/tweet/following", tag = "Tweets",
    params(
        ("offset" = Option<i64>, Query, description = "Number of tweets to skip"),
        ("limit" = Option<i64>, Query, description = "Page size (1-100, default 20)")
    ),
    responses((status = 200, body = FeedResponse), (status = 401, body = ErrorBody)))]
pub async fn list_following(
    State(ctx): State<AppContext>,
    user: AuthUser,
    q: Option<Query<PageQuery>>,
) -> Result<Json<FeedResponse>, AppError> {
    let page = page_from(q);
    let users = ctx.user_repo();
    let tweets = ctx.tweet_repo();
    let uc = ListFollowing {
        users: users.as_ref(),
        tweets: tweets.as_ref(),
    };
    let items = uc.execute(user.id, page).await?;
    Ok(Json(FeedResponse::new(page, items)))
}

#[utoipa::path(get, path = "/api/v1/tweet/user/{username}", tag = "Tweets", security(()),
    params(
        ("username" = String, Path, description = "Author handle"),
        ("offset" = Option<i64>, Query, description = "Number of tweets to skip"),
        ("limit" = Option<i64>, Query, description = "Page size (1-100, default 20)")
    ),
    responses((status = 200, body = FeedResponse), (status = 404, body = ErrorBody)))]
pub async fn list_user_tweets(
    State(ctx): State<AppContext>,
    Path(username): Path<String>,
    q: Option<Query<PageQuery>>,
) -> Result<Json<FeedResponse>, AppError> {
    let page = page_from(q);
    let users = ctx.user_repo();
    let tweets = ctx.tweet_repo();
    let uc = ListUserTweets {
        users: users.as_ref(),
        tweets: tweets.as_ref(),
    };
    let items = uc.execute(&username, page).await?;
    Ok(Json(FeedResponse::new(page, items)))
}

#[utoipa::path(get, path = "/api/v1/tweet/{id}", tag = "Tweets", security(()),
    params(("id" = Uuid, Path, description = "Tweet ID")),
    responses((status = 200, body = TweetResponse), (status = 404, body = ErrorBody)))]
pub async fn get_tweet(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<TweetResponse>, AppError> {
    let id = parse_tweet_id(&id)?;
    let repo = ctx.tweet_repo();
    let uc = GetTweet {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.execute(id).await?.into()))
}

#[utoipa::path(delete, path = "/api/v1/tweet/delete/{id}", tag = "Tweets",
    params(("id" = Uuid, Path, description = "Tweet ID")),
    responses(
        (status = 200, body = MessageResponse),
        (status = 401, body = ErrorBody),
        (status = 403, body = ErrorBody),
        (status = 404, body = ErrorBody)
    ))]
pub async fn delete_tweet(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_tweet_id(&id)?;
    let repo = ctx.tweet_repo();
    let storage = ctx.image_storage();
    let uc = DeleteTweet {
        repo: repo.as_ref(),
        storage: storage.as_ref(),
    };
    uc.execute(id, user.id).await?;
    tracing::info!(tweet_id = %id, user_id = %user.id, "tweet_deleted");
    Ok(Json(MessageResponse::new("Tweet deleted successfully")))
}

#[utoipa::path(put, path = "/api/v1/tweet/like/{id}", tag = "Tweets",
    params(("id" = Uuid, Path, description = "Tweet ID")),
    responses((status = 200, body = LikeResponse), (status = 404, body = ErrorBody)))]
pub async fn toggle_like(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>, AppError> {
    let id = parse_tweet_id(&id)?;
    let repo = ctx.tweet_repo();
    let uc = ToggleLike {
        repo: repo.as_ref(),
    };
    let state = uc.execute(id, user.id).await?;
    Ok(Json(LikeResponse {
        liked: state.liked,
        like_count: state.like_count,
    }))
}
