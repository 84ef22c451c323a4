//! Repository Module
//!
//! Provides CRUD operations over the SQLite tables: plain records plus
//! explicit query functions, no active-record layer.

pub mod menu_item;
pub mod order;
pub mod report;
pub mod user;

// Re-exports
pub use menu_item::MenuItemRepository;
pub use order::OrderRepository;
pub use report::{ItemBreakdown, ReportRepository};
pub use user::UserRepository;

use shared::error::{AppError, ErrorCode};
use sqlx::SqlitePool;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Map repository errors onto the application error taxonomy.
/// Handlers that need a resource-specific code construct it themselves.
impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::with_message(ErrorCode::ValidationFailed, msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Base repository with database pool reference
#[derive(Clone)]
pub struct BaseRepository {
    pool: SqlitePool,
}

impl BaseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
