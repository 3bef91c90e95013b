use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::tweet_repository::{LikeState, NewTweet, TweetRepository};
use crate::domain::tweets::tweet::{Page, Tweet};
use crate::infrastructure::db::PgPool;

const TWEET_COLUMNS: &str = r#"t.id, t.user_id, t.body, t.image_path, t.created_at,
    u.username AS author_username, u.name AS author_name, u.avatar_path AS author_avatar_path,
    (SELECT COUNT(*) FROM tweet_likes l WHERE l.tweet_id = t.id) AS like_count"#;

pub struct SqlxTweetRepository {
    pub pool: PgPool,
}

impl SqlxTweetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_tweet(r: &PgRow) -> Tweet {
    Tweet {
        id: r.get("id"),
        user_id: r.get("user_id"),
        author_username: r.get("author_username"),
        author_name: r.get("author_name"),
        author_avatar_path: r.try_get("author_avatar_path").ok().flatten(),
        body: r.get("body"),
        image_path: r.try_get("image_path").ok().flatten(),
        like_count: r.try_get("like_count").unwrap_or(0),
        created_at: r.get("created_at"),
    }
}

#[async_trait]
impl TweetRepository for SqlxTweetRepository {
    async fn insert(&self, new_tweet: &NewTweet) -> anyhow::Result<Tweet> {
        let sql = format!(
            r#"WITH t AS (
                 INSERT INTO tweets (user_id, body, image_path) VALUES ($1, $2, $3)
                 RETURNING id, user_id, body, image_path, created_at
               )
               SELECT {TWEET_COLUMNS} FROM t JOIN users u ON u.id = t.user_id"#
        );
        let row = sqlx::query(&sql)
            .bind(new_tweet.user_id)
            .bind(&new_tweet.body)
            .bind(new_tweet.image_path.as_deref())
            .fetch_one(&self.pool)
            .await?;
        Ok(map_tweet(&row))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Tweet>> {
        let sql = format!(
            "SELECT {TWEET_COLUMNS} FROM tweets t JOIN users u ON u.id = t.user_id WHERE t.id = $1"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_tweet))
    }

    async fn list_recent(&self, page: Page) -> anyhow::Result<Vec<Tweet>> {
        let sql = format!(
            r#"SELECT {TWEET_COLUMNS} FROM tweets t JOIN users u ON u.id = t.user_id
               ORDER BY t.created_at DESC, t.id DESC
               OFFSET $1 LIMIT $2"#
        );
        let rows = sqlx::query(&sql)
            .bind(page.offset)
            .bind(page.limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(map_tweet).collect())
    }

    async fn list_by_authors(&self, authors: &[Uuid], page: Page) -> anyhow::Result<Vec<Tweet>> {
        if authors.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            r#"SELECT {TWEET_COLUMNS} FROM tweets t JOIN users u ON u.id = t.user_id
               WHERE t.user_id = ANY($1)
               ORDER BY t.created_at DESC, t.id DESC
               OFFSET $2 LIMIT $3"#
        );
        let rows = sqlx::query(&sql)
            .bind(authors)
            .bind(page.offset)
            .bind(page.limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(map_tweet).collect())
    }

    async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM tweets WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn toggle_like(&self, tweet_id: Uuid, user_id: Uuid) -> anyhow::Result<Option<LikeState>> {
        let mut tx = self.pool.begin().await?;
        let exists = sqlx::query("SELECT 1 FROM tweets WHERE id = $1 FOR UPDATE")
            .bind(tweet_id)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !exists {
            return Ok(None);
        }
        let removed = sqlx::query("DELETE FROM tweet_likes WHERE tweet_id = $1 AND user_id = $2")
            .bind(tweet_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;
        if !removed {
            sqlx::query(
                r#"INSERT INTO tweet_likes (tweet_id, user_id) VALUES ($1, $2)
                   ON CONFLICT DO NOTHING"#,
            )
            .bind(tweet_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }
        let like_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tweet_likes WHERE tweet_id = $1")
                .bind(tweet_id)
                .fetch_one(&mut *tx)
                .await?;
        tx.commit().await?;
        Ok(Some(LikeState {
            liked: !removed,
            like_count,
        }))
    }
}
