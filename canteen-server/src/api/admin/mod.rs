//! Admin API 模块 (订单状态、用户角色管理)

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/admin/orders", get(handler::list_orders))
        .route("/api/admin/orders/{id}", put(handler::set_order_status))
        .route("/api/admin/users", get(handler::list_users))
        .route("/api/admin/users/{id}", put(handler::set_user_role))
        .layer(middleware::from_fn(require_admin))
}
