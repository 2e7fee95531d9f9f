//! Startup schema migrations
//!
//! The schema is small and fixed, so migration is a set of idempotent
//! `CREATE TABLE IF NOT EXISTS` statements executed on every boot.
//! Foreign keys are declared with `ON DELETE SET NULL` for authorship and
//! categorization: deleting a user or category detaches dependents, it
//! never deletes them. Join tables cascade with either side.
//!
//! Requires `PRAGMA foreign_keys = ON` on every connection, which
//! [`super::Database::connect`] configures.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::debug;

const DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS site (
        id          INTEGER PRIMARY KEY CHECK (id = 1),
        name        TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        logo_path   TEXT,
        updated_at  TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            TEXT PRIMARY KEY,
        username      TEXT NOT NULL COLLATE NOCASE UNIQUE,
        email         TEXT NOT NULL DEFAULT '',
        password_hash TEXT NOT NULL,
        first_name    TEXT NOT NULL DEFAULT '',
        last_name     TEXT NOT NULL DEFAULT '',
        avatar_path   TEXT,
        bio           TEXT,
        location      TEXT,
        website       TEXT,
        is_staff      INTEGER NOT NULL DEFAULT 0,
        is_active     INTEGER NOT NULL DEFAULT 1,
        joined_at     TEXT NOT NULL,
        last_login_at TEXT,
        created_at    TEXT NOT NULL,
        updated_at    TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id          TEXT PRIMARY KEY,
        name        TEXT NOT NULL,
        slug        TEXT NOT NULL UNIQUE,
        description TEXT NOT NULL DEFAULT '',
        created_at  TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tags (
        id          TEXT PRIMARY KEY,
        name        TEXT NOT NULL,
        slug        TEXT NOT NULL UNIQUE,
        description TEXT NOT NULL DEFAULT '',
        created_at  TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS posts (
        id                  TEXT PRIMARY KEY,
        title               TEXT NOT NULL,
        slug                TEXT NOT NULL UNIQUE,
        content             TEXT NOT NULL,
        featured_image_path TEXT,
        is_published        INTEGER NOT NULL DEFAULT 0,
        is_featured         INTEGER NOT NULL DEFAULT 0,
        user_id             TEXT REFERENCES users(id) ON DELETE SET NULL,
        category_id         TEXT REFERENCES categories(id) ON DELETE SET NULL,
        created_at          TEXT NOT NULL,
        updated_at          TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS comments (
        id          TEXT PRIMARY KEY,
        content     TEXT NOT NULL,
        is_approved INTEGER NOT NULL DEFAULT 0,
        user_id     TEXT REFERENCES users(id) ON DELETE SET NULL,
        post_id     TEXT REFERENCES posts(id) ON DELETE SET NULL,
        created_at  TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS post_tags (
        post_id    TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
        tag_id     TEXT NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
        PRIMARY KEY (post_id, tag_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS post_likes (
        post_id    TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
        user_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL,
        PRIMARY KEY (post_id, user_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS comment_likes (
        comment_id TEXT NOT NULL REFERENCES comments(id) ON DELETE CASCADE,
        user_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL,
        PRIMARY KEY (comment_id, user_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_posts_category ON posts(category_id)",
    "CREATE INDEX IF NOT EXISTS idx_posts_user ON posts(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_comments_post ON comments(post_id)",
];

/// Bring the database schema up to date
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    for statement in DDL {
        debug!("Applying schema statement");
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
