//! Users repository
//!
//! Account rows double as author records: posts and comments reference
//! them with SET NULL policies, so deleting a user detaches their content
//! instead of removing it.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::helpers::{bool_to_int, int_to_bool, now_iso8601};

type UserRow = (
    String,         // id
    String,         // username
    String,         // email
    String,         // password_hash
    String,         // first_name
    String,         // last_name
    Option<String>, // avatar_path
    Option<String>, // bio
    Option<String>, // location
    Option<String>, // website
    i32,            // is_staff
    i32,            // is_active
    String,         // joined_at
    Option<String>, // last_login_at
    String,         // created_at
    String,         // updated_at
);

const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, \
     avatar_path, bio, location, website, is_staff, is_active, joined_at, \
     last_login_at, created_at, updated_at";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_path: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub is_staff: bool,
    pub is_active: bool,
    pub joined_at: String,
    pub last_login_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl UserRecord {
    fn from_row(r: UserRow) -> Self {
        Self {
            id: r.0,
            username: r.1,
            email: r.2,
            password_hash: r.3,
            first_name: r.4,
            last_name: r.5,
            avatar_path: r.6,
            bio: r.7,
            location: r.8,
            website: r.9,
            is_staff: int_to_bool(r.10),
            is_active: int_to_bool(r.11),
            joined_at: r.12,
            last_login_at: r.13,
            created_at: r.14,
            updated_at: r.15,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_staff: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_path: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub website: Option<Option<String>>,
    pub is_staff: Option<bool>,
    pub is_active: Option<bool>,
}

pub struct UsersRepository {
    pool: SqlitePool,
}

impl UsersRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user. Fails on a duplicate username (unique,
    /// case-insensitive).
    pub async fn create(&self, user: CreateUser) -> Result<UserRecord> {
        let id = Uuid::new_v4().to_string();
        let now = now_iso8601();

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, first_name, last_name,
                               is_staff, is_active, joined_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, 1, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.first_name.as_deref().unwrap_or(""))
        .bind(user.last_name.as_deref().unwrap_or(""))
        .bind(bool_to_int(user.is_staff))
        .bind(&now)
        .bind(&now)
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

        Ok(row.map(UserRecord::from_row))
    }

    /// Get user by username (case-insensitive)
    pub async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ? COLLATE NOCASE"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRecord::from_row))
    }

    /// Get user by email (case-insensitive)
    pub async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ? COLLATE NOCASE"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRecord::from_row))
    }

    /// List all users, oldest first
    pub async fn list_all(&self) -> Result<Vec<UserRecord>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UserRecord::from_row).collect())
    }

    /// Apply a partial profile update
    pub async fn update(&self, id: &str, update: UpdateUser) -> Result<Option<UserRecord>> {
        let now = now_iso8601();

        if let Some(email) = update.email {
            sqlx::query("UPDATE users SET email = ?, updated_at = ? WHERE id = ?")
                .bind(email)
                .bind(&now)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }
        if let Some(password_hash) = update.password_hash {
            sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
                .bind(password_hash)
                .bind(&now)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }
        if let Some(first_name) = update.first_name {
            sqlx::query("UPDATE users SET first_name = ?, updated_at = ? WHERE id = ?")
                .bind(first_name)
                .bind(&now)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }
        if let Some(last_name) = update.last_name {
            sqlx::query("UPDATE users SET last_name = ?, updated_at = ? WHERE id = ?")
                .bind(last_name)
                .bind(&now)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }
        if let Some(avatar_path) = update.avatar_path {
            sqlx::query("UPDATE users SET avatar_path = ?, updated_at = ? WHERE id = ?")
                .bind(avatar_path)
                .bind(&now)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }
        if let Some(bio) = update.bio {
            sqlx::query("UPDATE users SET bio = ?, updated_at = ? WHERE id = ?")
                .bind(bio)
                .bind(&now)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }
        if let Some(location) = update.location {
            sqlx::query("UPDATE users SET location = ?, updated_at = ? WHERE id = ?")
                .bind(location)
                .bind(&now)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }
        if let Some(website) = update.website {
            sqlx::query("UPDATE users SET website = ?, updated_at = ? WHERE id = ?")
                .bind(website)
                .bind(&now)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }
        if let Some(is_staff) = update.is_staff {
            sqlx::query("UPDATE users SET is_staff = ?, updated_at = ? WHERE id = ?")
                .bind(bool_to_int(is_staff))
                .bind(&now)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }
        if let Some(is_active) = update.is_active {
            sqlx::query("UPDATE users SET is_active = ?, updated_at = ? WHERE id = ?")
                .bind(bool_to_int(is_active))
                .bind(&now)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }

        self.get_by_id(id).await
    }

    /// Update last login timestamp
    pub async fn update_last_login(&self, id: &str) -> Result<()> {
        let now = now_iso8601();
        sqlx::query("UPDATE users SET last_login_at = ?, updated_at = ? WHERE id = ?")
            .bind(&now)
            .bind(&now)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete a user. Their posts and comments survive with a NULL author.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count users
    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}
