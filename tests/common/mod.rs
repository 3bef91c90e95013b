#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use echomate_api::application::ports::tweet_repository::{LikeState, NewTweet, TweetRepository};
use echomate_api::application::ports::user_repository::{
    CreateUserOutcome, NewUser, ProfileChanges, SessionState, UserCredentials, UserRepository,
};
use echomate_api::bootstrap::app_context::{AppContext, AppServices};
use echomate_api::bootstrap::config::Config;
use echomate_api::domain::tweets::tweet::{Page, Tweet};
use echomate_api::domain::users::user::User;
use echomate_api::infrastructure::crypto::session_token::SessionKeys;
use echomate_api::infrastructure::storage::FsImageStorage;
use echomate_api::presentation::http::router::build_router;

struct StoredUser {
    user: User,
    password_hash: String,
    session_version: i32,
}

#[derive(Default)]
struct UserState {
    users: Vec<StoredUser>,
    follows: HashSet<(Uuid, Uuid)>,
}

#[derive(Default)]
pub struct MemoryUsers {
    state: Mutex<UserState>,
}

impl MemoryUsers {
    fn with_counts(state: &UserState, user: &User) -> User {
        let mut user = user.clone();
        user.followers_count = state.follows.iter().filter(|(_, b)| *b == user.id).count() as i64;
        user.following_count = state.follows.iter().filter(|(a, _)| *a == user.id).count() as i64;
        user
    }

    pub fn snapshot(&self, id: Uuid) -> Option<User> {
        let state = self.state.lock().unwrap();
        state
            .users
            .iter()
            .find(|u| u.user.id == id)
            .map(|u| Self::with_counts(&state, &u.user))
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn create_user(&self, new_user: &NewUser) -> anyhow::Result<CreateUserOutcome> {
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|u| u.user.username == new_user.username) {
            return Ok(CreateUserOutcome::UsernameTaken);
        }
        if state.users.iter().any(|u| u.user.email == new_user.email) {
            return Ok(CreateUserOutcome::EmailTaken);
        }
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            name: new_user.name.clone(),
            bio: new_user.bio.clone(),
            avatar_path: None,
            followers_count: 0,
            following_count: 0,
            created_at: Utc::now(),
        };
        state.users.push(StoredUser {
            user: user.clone(),
            password_hash: new_user.password_hash.clone(),
            session_version: 0,
        });
        Ok(CreateUserOutcome::Created(user))
    }

    async fn find_credentials(&self, username: &str) -> anyhow::Result<Option<UserCredentials>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .find(|u| u.user.username == username)
            .map(|u| UserCredentials {
                user: Self::with_counts(&state, &u.user),
                password_hash: u.password_hash.clone(),
                session_version: u.session_version,
            }))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.snapshot(id))
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .find(|u| u.user.username == username)
            .map(|u| Self::with_counts(&state, &u.user)))
    }

    async fn session_state(&self, id: Uuid) -> anyhow::Result<Option<SessionState>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .find(|u| u.user.id == id)
            .map(|u| SessionState {
                username: u.user.username.clone(),
                session_version: u.session_version,
            }))
    }

    async fn bump_session_version(&self, id: Uuid) -> anyhow::Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(u) = state.users.iter_mut().find(|u| u.user.id == id) {
            u.session_version += 1;
        }
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> anyhow::Result<Option<User>> {
        {
            let mut state = self.state.lock().unwrap();
            let Some(u) = state.users.iter_mut().find(|u| u.user.id == id) else {
                return Ok(None);
            };
            if let Some(name) = &changes.name {
                u.user.name = name.clone();
            }
            if let Some(bio) = &changes.bio {
                u.user.bio = bio.clone();
            }
            if let Some(avatar) = &changes.avatar_path {
                u.user.avatar_path = Some(avatar.clone());
            }
        }
        Ok(self.snapshot(id))
    }

    async fn follow(&self, follower_id: Uuid, followee_id: Uuid) -> anyhow::Result<bool> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .follows
            .insert((follower_id, followee_id)))
    }

    async fn unfollow(&self, follower_id: Uuid, followee_id: Uuid) -> anyhow::Result<bool> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .follows
            .remove(&(follower_id, followee_id)))
    }

    async fn following_ids(&self, id: Uuid) -> anyhow::Result<Vec<Uuid>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .follows
            .iter()
            .filter(|(a, _)| *a == id)
            .map(|(_, b)| *b)
            .collect())
    }
}

struct StoredTweet {
    id: Uuid,
    user_id: Uuid,
    body: String,
    image_path: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct TweetState {
    tweets: Vec<StoredTweet>,
    likes: HashSet<(Uuid, Uuid)>,
    // Monotonic clock so consecutive inserts never share a timestamp.
    ticks: i64,
}

pub struct MemoryTweets {
    users: Arc<MemoryUsers>,
    state: Mutex<TweetState>,
    epoch: DateTime<Utc>,
}

impl MemoryTweets {
    pub fn new(users: Arc<MemoryUsers>) -> Self {
        Self {
            users,
            state: Mutex::new(TweetState::default()),
            epoch: Utc::now(),
        }
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.state.lock().unwrap().tweets.iter().any(|t| t.id == id)
    }

    fn hydrate(&self, state: &TweetState, t: &StoredTweet) -> Tweet {
        let author = self.users.snapshot(t.user_id);
        Tweet {
            id: t.id,
            user_id: t.user_id,
            author_username: author.as_ref().map(|a| a.username.clone()).unwrap_or_default(),
            author_name: author.as_ref().map(|a| a.name.clone()).unwrap_or_default(),
            author_avatar_path: author.and_then(|a| a.avatar_path),
            body: t.body.clone(),
            image_path: t.image_path.clone(),
            like_count: state.likes.iter().filter(|(tid, _)| *tid == t.id).count() as i64,
            created_at: t.created_at,
        }
    }

    fn list<F: Fn(&StoredTweet) -> bool>(&self, page: Page, keep: F) -> Vec<Tweet> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<&StoredTweet> = state.tweets.iter().filter(|t| keep(t)).collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows.into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .map(|t| self.hydrate(&state, t))
            .collect()
    }
}

#[async_trait]
impl TweetRepository for MemoryTweets {
    async fn insert(&self, new_tweet: &NewTweet) -> anyhow::Result<Tweet> {
        let mut state = self.state.lock().unwrap();
        state.ticks += 1;
        let stored = StoredTweet {
            id: Uuid::new_v4(),
            user_id: new_tweet.user_id,
            body: new_tweet.body.clone(),
            image_path: new_tweet.image_path.clone(),
            created_at: self.epoch + Duration::milliseconds(state.ticks),
        };
        let tweet = self.hydrate(&state, &stored);
        state.tweets.push(stored);
        Ok(tweet)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Tweet>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .tweets
            .iter()
            .find(|t| t.id == id)
            .map(|t| self.hydrate(&state, t)))
    }

    async fn list_recent(&self, page: Page) -> anyhow::Result<Vec<Tweet>> {
        Ok(self.list(page, |_| true))
    }

    async fn list_by_authors(&self, authors: &[Uuid], page: Page) -> anyhow::Result<Vec<Tweet>> {
        Ok(self.list(page, |t| authors.contains(&t.user_id)))
    }

    async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> anyhow::Result<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.tweets.len();
        state.tweets.retain(|t| !(t.id == id && t.user_id == owner_id));
        let removed = state.tweets.len() < before;
        if removed {
            state.likes.retain(|(tid, _)| *tid != id);
        }
        Ok(removed)
    }

    async fn toggle_like(&self, tweet_id: Uuid, user_id: Uuid) -> anyhow::Result<Option<LikeState>> {
        let mut state = self.state.lock().unwrap();
        if !state.tweets.iter().any(|t| t.id == tweet_id) {
            return Ok(None);
        }
        let liked = if state.likes.remove(&(tweet_id, user_id)) {
            false
        } else {
            state.likes.insert((tweet_id, user_id));
            true
        };
        let like_count = state.likes.iter().filter(|(t, _)| *t == tweet_id).count() as i64;
        Ok(Some(LikeState { liked, like_count }))
    }
}

pub struct TestApp {
    pub router: Router,
    pub users: Arc<MemoryUsers>,
    pub tweets: Arc<MemoryTweets>,
    pub uploads: tempfile::TempDir,
}

pub fn test_config(uploads_dir: &str) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("JWT_SECRET", "integration-test-secret".to_string()),
        ("UPLOADS_DIR", uploads_dir.to_string()),
        ("UPLOAD_MAX_BYTES", "4096".to_string()),
        ("CORS_ORIGINS", "http://localhost:3000".to_string()),
    ]);
    Config::from_lookup(|key| vars.get(key).cloned()).expect("test config")
}

/// Delegates to an in-memory store but fails every insert, as a dropped
/// database connection would.
pub struct FailingInserts {
    inner: Arc<MemoryTweets>,
}

#[async_trait]
impl TweetRepository for FailingInserts {
    async fn insert(&self, _new_tweet: &NewTweet) -> anyhow::Result<Tweet> {
        anyhow::bail!("connection reset by peer")
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Tweet>> {
        self.inner.find_by_id(id).await
    }

    async fn list_recent(&self, page: Page) -> anyhow::Result<Vec<Tweet>> {
        self.inner.list_recent(page).await
    }

    async fn list_by_authors(&self, authors: &[Uuid], page: Page) -> anyhow::Result<Vec<Tweet>> {
        self.inner.list_by_authors(authors, page).await
    }

    async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> anyhow::Result<bool> {
        self.inner.delete_owned(id, owner_id).await
    }

    async fn toggle_like(&self, tweet_id: Uuid, user_id: Uuid) -> anyhow::Result<Option<LikeState>> {
        self.inner.toggle_like(tweet_id, user_id).await
    }
}

fn build_app(failing_inserts: bool) -> TestApp {
    let uploads = tempfile::tempdir().expect("tempdir");
    let cfg = test_config(uploads.path().to_str().expect("utf-8 path"));
    let users = Arc::new(MemoryUsers::default());
    let tweets = Arc::new(MemoryTweets::new(users.clone()));
    let tweet_repo: Arc<dyn TweetRepository> = if failing_inserts {
        Arc::new(FailingInserts {
            inner: tweets.clone(),
        })
    } else {
        tweets.clone()
    };
    let services = AppServices::new(
        users.clone(),
        tweet_repo,
        Arc::new(FsImageStorage::new(uploads.path())),
        SessionKeys::new(&cfg.jwt_secret, cfg.session_ttl_secs),
    );
    let router = build_router(AppContext::new(cfg, services));
    TestApp {
        router,
        users,
        tweets,
        uploads,
    }
}

pub fn test_app() -> TestApp {
    build_app(false)
}

pub fn test_app_with_failing_inserts() -> TestApp {
    build_app(true)
}

impl TestApp {
    /// Files currently stored under one upload kind directory.
    pub fn stored_files(&self, kind: &str) -> Vec<String> {
        match std::fs::read_dir(self.uploads.path().join(kind)) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Absolute path of a `/uploads/...` URL inside the temporary root.
    pub fn upload_path(&self, url: &str) -> std::path::PathBuf {
        self.uploads.path().join(url.trim_start_matches("/uploads/"))
    }
}
