//! Reactions repository and the per-(post, user) toggle transition
//!
//! A (post, user) pair is either unreacted or reacted with exactly one kind;
//! the `idx_reactions_post_user` unique index backs the invariant. `toggle`
//! implements the three transitions:
//!
//! - unreacted   --react(K)--> reacted-as-K  (insert)
//! - reacted-as-K --react(K)--> unreacted    (delete)
//! - reacted-as-K --react(J)--> reacted-as-J (update kind + timestamp)
//!
//! The read-then-write is not transactional; two concurrent toggles from the
//! same user can race, with the unique index turning the worst case into a
//! constraint error rather than a duplicate row.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::sqlite_helpers::now_iso8601;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionRecord {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub kind: String,
    pub created_at: String,
}

/// Which transition a toggle performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    Replaced,
}

type ReactionRow = (String, String, String, String, String);

fn row_to_record(r: ReactionRow) -> ReactionRecord {
    ReactionRecord {
        id: r.0,
        post_id: r.1,
        user_id: r.2,
        kind: r.3,
        created_at: r.4,
    }
}

pub struct ReactionsRepository {
    pool: SqlitePool,
}

impl ReactionsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find the reaction for a (post, user) pair, if any
    pub async fn find(&self, post_id: &str, user_id: &str) -> Result<Option<ReactionRecord>> {
        let row = sqlx::query_as::<_, ReactionRow>(
            "SELECT id, post_id, user_id, kind, created_at FROM reactions WHERE post_id = ? AND user_id = ?",
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_record))
    }

    /// List reactions for a post, newest first
    pub async fn list_for_post(&self, post_id: &str) -> Result<Vec<ReactionRecord>> {
        let rows = sqlx::query_as::<_, ReactionRow>(
            "SELECT id, post_id, user_id, kind, created_at FROM reactions WHERE post_id = ? ORDER BY created_at DESC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_record).collect())
    }

    /// Insert a reaction row directly, bypassing the toggle transition.
    ///
    /// Used by the toggle itself and by tests that need to stage raw rows
    /// (e.g. reactions whose user no longer resolves).
    pub async fn insert(&self, post_id: &str, user_id: &str, kind: &str) -> Result<ReactionRecord> {
        let id = Uuid::new_v4().to_string();
        let now = now_iso8601();

        sqlx::query(
            r#"
            INSERT INTO reactions (id, post_id, user_id, kind, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(post_id)
        .bind(user_id)
        .bind(kind)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(ReactionRecord {
            id,
            post_id: post_id.to_string(),
            user_id: user_id.to_string(),
            kind: kind.to_string(),
            created_at: now,
        })
    }

    /// Apply the toggle transition for a (post, user) pair
    pub async fn toggle(&self, post_id: &str, user_id: &str, kind: &str) -> Result<ToggleOutcome> {
        match self.find(post_id, user_id).await? {
            None => {
                self.insert(post_id, user_id, kind).await?;
                Ok(ToggleOutcome::Added)
            }
            Some(existing) if existing.kind == kind => {
                sqlx::query("DELETE FROM reactions WHERE id = ?")
                    .bind(&existing.id)
                    .execute(&self.pool)
                    .await?;
                Ok(ToggleOutcome::Removed)
            }
            Some(existing) => {
                sqlx::query("UPDATE reactions SET kind = ?, created_at = ? WHERE id = ?")
                    .bind(kind)
                    .bind(now_iso8601())
                    .bind(&existing.id)
                    .execute(&self.pool)
                    .await?;
                Ok(ToggleOutcome::Replaced)
            }
        }
    }
}
