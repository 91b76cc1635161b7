//! Users repository
//!
//! The friend list is stored as a JSON array of user ids on each user row,
//! mirroring the bidirectional friend arrays of the original data model.
//! Friendship writes therefore touch two rows; see `add_friend`.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::sqlite_helpers::{json_to_vec, now_iso8601, vec_to_json};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub first_name: String,
    pub surname: String,
    pub email: String,
    pub password_hash: String,
    pub dob: String,
    pub gender: String,
    pub friends: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub first_name: String,
    pub surname: String,
    pub email: String,
    pub password_hash: String,
    pub dob: String,
    pub gender: String,
}

type UserRow = (
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
);

fn row_to_record(r: UserRow) -> UserRecord {
    UserRecord {
        id: r.0,
        first_name: r.1,
        surname: r.2,
        email: r.3,
        password_hash: r.4,
        dob: r.5,
        gender: r.6,
        friends: json_to_vec(&r.7),
        created_at: r.8,
    }
}

const USER_COLUMNS: &str =
    "id, first_name, surname, email, password_hash, dob, gender, friends, created_at";

pub struct UsersRepository {
    pool: SqlitePool,
}

impl UsersRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user with an empty friend list
    pub async fn create(&self, user: CreateUser) -> Result<UserRecord> {
        let id = Uuid::new_v4().to_string();
        let now = now_iso8601();

        sqlx::query(
            r#"
            INSERT INTO users (id, first_name, surname, email, password_hash, dob, gender, friends, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, '[]', ?)
            "#,
        )
        .bind(&id)
        .bind(&user.first_name)
        .bind(&user.surname)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.dob)
        .bind(&user.gender)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to create user"))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_record))
    }

    /// Get user by email (case-insensitive)
    pub async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ? COLLATE NOCASE"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_record))
    }

    /// List all users, newest first
    pub async fn list_all(&self) -> Result<Vec<UserRecord>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_record).collect())
    }

    /// Add `friend_id` to the user's friend list if not already present.
    ///
    /// Set semantics over the JSON column: read, dedup-insert, write back.
    /// Callers wanting mutual friendship call this once per direction.
    pub async fn add_friend(&self, user_id: &str, friend_id: &str) -> Result<()> {
        let user = self
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("User not found"))?;

        if user.friends.iter().any(|f| f == friend_id) {
            return Ok(());
        }

        let mut friends = user.friends;
        friends.push(friend_id.to_string());

        sqlx::query("UPDATE users SET friends = ? WHERE id = ?")
            .bind(vec_to_json(&friends))
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
