//! Database connection and repositories

pub mod categories;
pub mod comments;
pub mod helpers;
pub mod migrations;
pub mod posts;
pub mod site;
pub mod tags;
pub mod users;

use std::str::FromStr;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

pub use categories::{CategoriesRepository, CategoryRecord, CreateCategory};
pub use comments::{CommentRecord, CommentsRepository, CreateComment};
pub use posts::{CreatePost, PostFilter, PostRecord, PostsRepository, UpdatePost};
pub use site::{SiteRecord, SiteRepository, UpsertSite};
pub use tags::{CreateTag, TagRecord, TagsRepository};
pub use users::{CreateUser, UpdateUser, UserRecord, UsersRepository};

pub use migrations::run_migrations;

/// Database wrapper providing connection pool access
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database wrapper from an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn get_max_connections() -> u32 {
        std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10)
    }

    /// Open (creating if missing) the database at `url`.
    ///
    /// Foreign key enforcement is switched on for every connection; the
    /// schema's SET NULL / CASCADE policies depend on it.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(Self::get_max_connections())
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get the site repository
    pub fn site(&self) -> SiteRepository {
        SiteRepository::new(self.pool.clone())
    }

    /// Get a users repository
    pub fn users(&self) -> UsersRepository {
        UsersRepository::new(self.pool.clone())
    }

    /// Get a categories repository
    pub fn categories(&self) -> CategoriesRepository {
        CategoriesRepository::new(self.pool.clone())
    }

    /// Get a tags repository
    pub fn tags(&self) -> TagsRepository {
        TagsRepository::new(self.pool.clone())
    }

    /// Get a posts repository
    pub fn posts(&self) -> PostsRepository {
        PostsRepository::new(self.pool.clone())
    }

    /// Get a comments repository
    pub fn comments(&self) -> CommentsRepository {
        CommentsRepository::new(self.pool.clone())
    }
}
