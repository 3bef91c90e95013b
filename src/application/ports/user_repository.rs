use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::users::user::User;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub bio: Option<String>,
}

#[derive(Debug, Clone)]
pub enum CreateUserOutcome {
    Created(User),
    UsernameTaken,
    EmailTaken,
}

#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
    pub session_version: i32,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub username: String,
    pub session_version: i32,
}

/// Partial profile update; `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub bio: Option<Option<String>>,
    pub avatar_path: Option<String>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, new_user: &NewUser) -> anyhow::Result<CreateUserOutcome>;
    async fn find_credentials(&self, username: &str) -> anyhow::Result<Option<UserCredentials>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    async fn session_state(&self, id: Uuid) -> anyhow::Result<Option<SessionState>>;
    async fn bump_session_version(&self, id: Uuid) -> anyhow::Result<()>;
    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> anyhow::Result<Option<User>>;
    /// Returns `true` when a new follow edge was created.
    async fn follow(&self, follower_id: Uuid, followee_id: Uuid) -> anyhow::Result<bool>;
    /// Returns `true` when an existing follow edge was removed.
    async fn unfollow(&self, follower_id: Uuid, followee_id: Uuid) -> anyhow::Result<bool>;
    async fn following_ids(&self, id: Uuid) -> anyhow::Result<Vec<Uuid>>;
}
