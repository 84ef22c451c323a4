//! Menu API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", menu_routes())
}

fn menu_routes() -> Router<ServerState> {
    // 读取路由：公开（菜单浏览无需登录）
    let read_routes = Router::new().route("/", get(handler::list));

    // 管理路由：仅管理员可用
    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::soft_delete))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(manage_routes)
}
