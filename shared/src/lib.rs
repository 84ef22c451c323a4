//! Shared types for the canteen backend
//!
//! Common types used across crates: the unified error system, API response
//! structures, and client-facing request/response DTOs.

pub mod client;
pub mod error;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
