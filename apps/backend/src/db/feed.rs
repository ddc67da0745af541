//! Feed writes that earn points: posts, comments and likes.

use progression_core::PointEvent;
use uuid::Uuid;

use super::points::award_in;
use super::Database;
use crate::error::Result;
use crate::models::*;

impl Database {
    /// Create a post and award the author. Returns the post and the author's new total.
    pub async fn create_post(&self, author_id: Uuid, body: &str, award: i64) -> Result<(Post, i64)> {
        let mut tx = self.pool.begin().await?;

        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (id, author_id, body)
            VALUES ($1, $2, $3)
            RETURNING id, author_id, body, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(author_id)
        .bind(body)
        .fetch_one(&mut *tx)
        .await?;

        let total = award_in(&mut tx, author_id, PointEvent::PostCreated, award).await?;

        tx.commit().await?;
        Ok((post, total))
    }

    /// Comment on a post and award the commenter. `None` if the post does not exist.
    pub async fn create_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        body: &str,
        award: i64,
    ) -> Result<Option<(Comment, i64)>> {
        let mut tx = self.pool.begin().await?;

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
            .bind(post_id)
            .fetch_one(&mut *tx)
            .await?;
        if !exists {
            return Ok(None);
        }

        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, post_id, author_id, body)
            VALUES ($1, $2, $3, $4)
            RETURNING id, post_id, author_id, body, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(post_id)
        .bind(author_id)
        .bind(body)
        .fetch_one(&mut *tx)
        .await?;

        let total = award_in(&mut tx, author_id, PointEvent::CommentCreated, award).await?;

        tx.commit().await?;
        Ok(Some((comment, total)))
    }

    /// Like a post. The post author is awarded the first time this user ever likes it;
    /// liking again after an unlike restores the like without paying.
    ///
    /// Returns `None` if the post does not exist, otherwise whether a like was added.
    pub async fn like_post(&self, post_id: Uuid, user_id: Uuid, award: i64) -> Result<Option<bool>> {
        let mut tx = self.pool.begin().await?;

        let author_id: Option<Uuid> =
            sqlx::query_scalar("SELECT author_id FROM posts WHERE id = $1")
                .bind(post_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(author_id) = author_id else {
            return Ok(None);
        };

        let inserted = sqlx::query(
            r#"
            INSERT INTO post_likes (post_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (post_id, user_id) DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            == 1;

        if inserted {
            let first_like = sqlx::query(
                r#"
                INSERT INTO post_like_awards (post_id, user_id)
                VALUES ($1, $2)
                ON CONFLICT (post_id, user_id) DO NOTHING
                "#,
            )
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
                == 1;

            if first_like {
                award_in(&mut tx, author_id, PointEvent::LikeReceived, award).await?;
            }
        }

        tx.commit().await?;
        Ok(Some(inserted))
    }

    /// Remove a like. Points already awarded for it are kept.
    pub async fn unlike_post(&self, post_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn post_exists(&self, post_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}
