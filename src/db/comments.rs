//! Comments repository (append-only)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::sqlite_helpers::now_iso8601;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub content: String,
    pub created_at: String,
}

type CommentRow = (String, String, String, String, String);

fn row_to_record(r: CommentRow) -> CommentRecord {
    CommentRecord {
        id: r.0,
        post_id: r.1,
        author_id: r.2,
        content: r.3,
        created_at: r.4,
    }
}

pub struct CommentsRepository {
    pool: SqlitePool,
}

impl CommentsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a comment to a post
    pub async fn create(
        &self,
        post_id: &str,
        author_id: &str,
        content: &str,
    ) -> Result<CommentRecord> {
        let id = Uuid::new_v4().to_string();
        let now = now_iso8601();

        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, author_id, content, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(post_id)
        .bind(author_id)
        .bind(content)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(CommentRecord {
            id,
            post_id: post_id.to_string(),
            author_id: author_id.to_string(),
            content: content.to_string(),
            created_at: now,
        })
    }

    /// List comments for a post, oldest first
    pub async fn list_for_post(&self, post_id: &str) -> Result<Vec<CommentRecord>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            "SELECT id, post_id, author_id, content, created_at FROM comments WHERE post_id = ? ORDER BY created_at ASC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_record).collect())
    }
}
