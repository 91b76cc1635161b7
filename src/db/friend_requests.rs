//! Friend requests repository
//!
//! A request moves pending -> accepted | rejected and both end states are
//! terminal; rows are never deleted. The "one pending request per unordered
//! pair" rule is checked by callers before insert, not enforced atomically.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::sqlite_helpers::now_iso8601;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_ACCEPTED: &str = "accepted";
pub const STATUS_REJECTED: &str = "rejected";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendRequestRecord {
    pub id: String,
    pub from_id: String,
    pub to_id: String,
    pub status: String,
    pub created_at: String,
}

type RequestRow = (String, String, String, String, String);

fn row_to_record(r: RequestRow) -> FriendRequestRecord {
    FriendRequestRecord {
        id: r.0,
        from_id: r.1,
        to_id: r.2,
        status: r.3,
        created_at: r.4,
    }
}

pub struct FriendRequestsRepository {
    pool: SqlitePool,
}

impl FriendRequestsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a pending request
    pub async fn create(&self, from_id: &str, to_id: &str) -> Result<FriendRequestRecord> {
        let id = Uuid::new_v4().to_string();
        let now = now_iso8601();

        sqlx::query(
            r#"
            INSERT INTO friend_requests (id, from_id, to_id, status, created_at)
            VALUES (?, ?, ?, 'pending', ?)
            "#,
        )
        .bind(&id)
        .bind(from_id)
        .bind(to_id)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(FriendRequestRecord {
            id,
            from_id: from_id.to_string(),
            to_id: to_id.to_string(),
            status: STATUS_PENDING.to_string(),
            created_at: now,
        })
    }

    /// Get a request by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<FriendRequestRecord>> {
        let row = sqlx::query_as::<_, RequestRow>(
            "SELECT id, from_id, to_id, status, created_at FROM friend_requests WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_record))
    }

    /// Find a pending request between two users, in either direction
    pub async fn find_pending_between(
        &self,
        a: &str,
        b: &str,
    ) -> Result<Option<FriendRequestRecord>> {
        let row = sqlx::query_as::<_, RequestRow>(
            r#"
            SELECT id, from_id, to_id, status, created_at FROM friend_requests
            WHERE status = 'pending'
              AND ((from_id = ? AND to_id = ?) OR (from_id = ? AND to_id = ?))
            "#,
        )
        .bind(a)
        .bind(b)
        .bind(b)
        .bind(a)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_record))
    }

    /// List pending requests addressed to a user, newest first
    pub async fn list_incoming_pending(&self, user_id: &str) -> Result<Vec<FriendRequestRecord>> {
        let rows = sqlx::query_as::<_, RequestRow>(
            r#"
            SELECT id, from_id, to_id, status, created_at FROM friend_requests
            WHERE to_id = ? AND status = 'pending'
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_record).collect())
    }

    /// List pending requests a user is involved in, either side
    pub async fn list_pending_involving(&self, user_id: &str) -> Result<Vec<FriendRequestRecord>> {
        let rows = sqlx::query_as::<_, RequestRow>(
            r#"
            SELECT id, from_id, to_id, status, created_at FROM friend_requests
            WHERE status = 'pending' AND (from_id = ? OR to_id = ?)
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_record).collect())
    }

    /// Transition a request to a new status
    pub async fn set_status(&self, id: &str, status: &str) -> Result<()> {
        sqlx::query("UPDATE friend_requests SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
