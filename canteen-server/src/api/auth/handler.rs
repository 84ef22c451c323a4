//! Account Handlers
//!
//! Handles registration, login, and profile lookup

use std::time::Duration;

use axum::{Json, extract::State, response::IntoResponse};
use http::StatusCode;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Role, User};
use crate::db::repository::{RepoError, UserRepository};
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PASSWORD_LEN, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

// Re-use shared DTOs for API consistency
use shared::client::{
    LoginRequest, LoginResponse, MessageResponse, ProfileResponse, RegisterRequest,
};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/register - Register a new customer account
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let (Some(name), Some(email), Some(password)) = (req.name, req.email, req.password) else {
        return Err(AppError::validation("Missing required fields"));
    };
    validate_required_text(&name, "name", MAX_NAME_LEN)?;
    validate_required_text(&email, "email", MAX_EMAIL_LEN)?;
    validate_required_text(&password, "password", MAX_PASSWORD_LEN)?;

    let password_hash = User::hash_password(&password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

    let repo = UserRepository::new(state.get_db());
    let user = repo
        .create(&name, &email, &password_hash, Role::Customer)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::new(ErrorCode::EmailAlreadyRegistered),
            other => other.into(),
        })?;

    tracing::info!(user_id = user.id, email = %user.email, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// POST /api/login - Authenticate and issue a JWT
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (Some(email), Some(password)) = (req.email, req.password) else {
        return Err(AppError::validation("Missing email or password"));
    };

    let repo = UserRepository::new(state.get_db());
    let user = repo.find_by_email(&email).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error for unknown email and wrong password to prevent
    // account enumeration
    let user = match user {
        Some(user) => {
            let password_valid = user
                .verify_password(&password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

            if !password_valid {
                tracing::warn!(email = %email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            user
        }
        None => {
            tracing::warn!(email = %email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let jwt_service = state.get_jwt_service();
    let access_token = jwt_service
        .generate_token(user.id, &user.name, user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(
        user_id = user.id,
        email = %user.email,
        role = %user.role,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse { access_token }))
}

/// GET /api/profile - Current user's profile
pub async fn profile(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ProfileResponse>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo.find_by_id(user.id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::UserNotFound, "User not found")
    })?;

    Ok(Json(ProfileResponse {
        logged_in_as: user.name,
        email: user.email,
        role: user.role.to_string(),
    }))
}
