use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::user_repository::{
    CreateUserOutcome, NewUser, ProfileChanges, SessionState, UserCredentials, UserRepository,
};
use crate::domain::users::user::User;
use crate::infrastructure::db::PgPool;

const USER_COLUMNS: &str = r#"u.id, u.username, u.email, u.name, u.bio, u.avatar_path, u.created_at,
    (SELECT COUNT(*) FROM follows f WHERE f.followee_id = u.id) AS followers_count,
    (SELECT COUNT(*) FROM follows f WHERE f.follower_id = u.id) AS following_count"#;

pub struct SqlxUserRepository {
    pub pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_user(r: &PgRow) -> User {
    User {
        id: r.get("id"),
        username: r.get("username"),
        email: r.get("email"),
        name: r.get("name"),
        bio: r.try_get("bio").ok().flatten(),
        avatar_path: r.try_get("avatar_path").ok().flatten(),
        followers_count: r.try_get("followers_count").unwrap_or(0),
        following_count: r.try_get("following_count").unwrap_or(0),
        created_at: r.get("created_at"),
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create_user(&self, new_user: &NewUser) -> anyhow::Result<CreateUserOutcome> {
        let res = sqlx::query(
            r#"INSERT INTO users (username, email, name, password_hash, bio)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, username, email, name, bio, avatar_path, created_at"#,
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.name)
        .bind(&new_user.password_hash)
        .bind(new_user.bio.as_deref())
        .fetch_one(&self.pool)
        .await;
        match res {
            Ok(row) => Ok(CreateUserOutcome::Created(map_user(&row))),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                match db.constraint() {
                    Some("users_email_key") => Ok(CreateUserOutcome::EmailTaken),
                    _ => Ok(CreateUserOutcome::UsernameTaken),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_credentials(&self, username: &str) -> anyhow::Result<Option<UserCredentials>> {
        let sql = format!(
            "SELECT {USER_COLUMNS}, u.password_hash, u.session_version FROM users u WHERE u.username = $1"
        );
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| UserCredentials {
            user: map_user(&r),
            password_hash: r.get("password_hash"),
            session_version: r.get("session_version"),
        }))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_user))
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.username = $1");
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_user))
    }

    async fn session_state(&self, id: Uuid) -> anyhow::Result<Option<SessionState>> {
        let row = sqlx::query("SELECT username, session_version FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| SessionState {
            username: r.get("username"),
            session_version: r.get("session_version"),
        }))
    }

    async fn bump_session_version(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE users SET session_version = session_version + 1, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> anyhow::Result<Option<User>> {
        let res = sqlx::query(
            r#"UPDATE users SET
                 name = COALESCE($2, name),
                 bio = CASE WHEN $3 THEN $4 ELSE bio END,
                 avatar_path = COALESCE($5, avatar_path),
                 updated_at = now()
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.bio.is_some())
        .bind(changes.bio.clone().flatten())
        .bind(changes.avatar_path.as_deref())
        .execute(&self.pool)
        .await?;
        if res.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn follow(&self, follower_id: Uuid, followee_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"INSERT INTO follows (follower_id, followee_id) VALUES ($1, $2)
               ON CONFLICT DO NOTHING"#,
        )
        .bind(follower_id)
        .bind(followee_id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn unfollow(&self, follower_id: Uuid, followee_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followee_id = $2")
            .bind(follower_id)
            .bind(followee_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn following_ids(&self, id: Uuid) -> anyhow::Result<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT followee_id FROM follows WHERE follower_id = $1",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }
}
