//! Admin API Handlers
//!
//! Cross-user order listing and status transitions, plus user role
//! management with last-admin protection.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{OrderDetail, OrderStatus, Role, User};
use crate::db::repository::{OrderRepository, UserRepository};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserRoleUpdate {
    pub role: Option<String>,
}

/// GET /api/admin/orders - 所有用户的订单，新的在前
pub async fn list_orders(State(state): State<ServerState>) -> AppResult<Json<Vec<OrderDetail>>> {
    let repo = OrderRepository::new(state.get_db());
    let orders = repo.find_all().await?;
    Ok(Json(orders))
}

/// PUT /api/admin/orders/{id} - 覆写订单状态 (无状态机约束)
pub async fn set_order_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<OrderDetail>> {
    let repo = OrderRepository::new(state.get_db());
    repo.find_by_id(id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::OrderNotFound, format!("Order {} not found", id))
    })?;

    let status_str = payload
        .status
        .ok_or_else(|| AppError::validation("Missing status field"))?;
    let status = OrderStatus::parse(&status_str).ok_or_else(|| {
        AppError::with_message(
            ErrorCode::OrderStatusInvalid,
            format!("Invalid status. Must be one of: {:?}", OrderStatus::VALID),
        )
    })?;

    repo.set_status(id, status).await?;

    tracing::info!(order_id = id, status = %status, "Order status updated");

    let detail = repo.find_detail(id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::OrderNotFound, format!("Order {} not found", id))
    })?;
    Ok(Json(detail))
}

/// GET /api/admin/users - 所有用户
pub async fn list_users(State(state): State<ServerState>) -> AppResult<Json<Vec<User>>> {
    let repo = UserRepository::new(state.get_db());
    let users = repo.find_all().await?;
    Ok(Json(users))
}

/// PUT /api/admin/users/{id} - 修改用户角色 (末位管理员保护)
pub async fn set_user_role(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserRoleUpdate>,
) -> AppResult<Json<User>> {
    let role_str = payload
        .role
        .ok_or_else(|| AppError::with_message(ErrorCode::RoleInvalid, "Invalid role specified"))?;
    let new_role = Role::parse(&role_str).ok_or_else(|| {
        AppError::with_message(ErrorCode::RoleInvalid, "Invalid role specified")
    })?;

    let repo = UserRepository::new(state.get_db());
    let user = repo.find_by_id(id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::UserNotFound, format!("User {} not found", id))
    })?;

    // Last-admin protection: refuse to demote the only remaining admin
    if user.is_admin() && new_role == Role::Customer {
        let admin_count = repo.count_admins().await?;
        if admin_count <= 1 {
            tracing::warn!(user_id = id, "Blocked demotion of the last admin");
            return Err(AppError::new(ErrorCode::LastAdminProtected));
        }
    }

    let updated = repo.set_role(id, new_role).await?;

    tracing::info!(user_id = id, role = %new_role, "User role updated");

    Ok(Json(updated))
}
