//! Authentication Middleware
//!
//! Provides Axum middleware for JWT authentication and authorization.
//! The original route-decorator chain is expressed as an explicit
//! middleware pipeline: `require_auth` at the application level,
//! `require_admin` layered onto admin-only routers.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::Method;

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::{AppError, ErrorCode};

/// Public (method, path) pairs that skip authentication
fn is_public_route(method: &Method, path: &str) -> bool {
    match path {
        "/api/menu" | "/api/health" => method == Method::GET,
        "/api/register" | "/api/login" => method == Method::POST,
        _ => false,
    }
}

/// Require authentication middleware
///
/// Extracts and validates the JWT from the `Authorization: Bearer <token>`
/// header and injects [`CurrentUser`] into the request extensions.
///
/// Skipped for:
/// - `OPTIONS *` (CORS preflight)
/// - non-`/api/` paths (they 404 normally)
/// - the public routes (menu listing, register, login, health)
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // Allow OPTIONS requests for CORS preflight (skip auth)
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Skip auth for non-API routes (let them return 404 normally)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public_route(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.get_jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    // Validate token
    match jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::try_from(claims)
                .map_err(|e| AppError::invalid_token(e.to_string()))?;
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// Require admin role middleware
///
/// Checks `CurrentUser.role == admin`; non-admins get 403.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;
    if !user.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id,
            user_role = user.role.to_string()
        );
        return Err(AppError::new(ErrorCode::AdminRequired));
    }

    Ok(next.run(req).await)
}

/// Extension trait to get CurrentUser from request
pub trait CurrentUserExt {
    fn current_user(&self) -> Result<&CurrentUser, AppError>;
}

impl CurrentUserExt for Request {
    fn current_user(&self) -> Result<&CurrentUser, AppError> {
        self.extensions()
            .get::<CurrentUser>()
            .ok_or(AppError::unauthorized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_routes() {
        assert!(is_public_route(&Method::GET, "/api/menu"));
        assert!(is_public_route(&Method::POST, "/api/register"));
        assert!(is_public_route(&Method::POST, "/api/login"));
        assert!(is_public_route(&Method::GET, "/api/health"));
    }

    #[test]
    fn test_protected_routes() {
        // Same path, different method
        assert!(!is_public_route(&Method::POST, "/api/menu"));
        // Authenticated routes
        assert!(!is_public_route(&Method::GET, "/api/orders"));
        assert!(!is_public_route(&Method::GET, "/api/profile"));
        assert!(!is_public_route(&Method::GET, "/api/admin/orders"));
    }
}
