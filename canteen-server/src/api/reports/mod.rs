//! Sales Report API 模块

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/admin/reports/sales", get(handler::sales))
        .layer(middleware::from_fn(require_admin))
}
