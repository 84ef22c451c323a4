//! Client-related types shared between server and clients
//!
//! Common request/response types used in API communication.
//! Request fields are optional so that handlers can report missing fields
//! as 400 validation errors instead of deserialization failures.

use serde::{Deserialize, Serialize};

// =============================================================================
// Account API DTOs
// =============================================================================

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// Current profile response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub logged_in_as: String,
    pub email: String,
    pub role: String,
}

/// Plain confirmation message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
