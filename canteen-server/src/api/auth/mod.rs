//! Account API 模块 (注册 / 登录 / 个人信息)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/register", post(handler::register))
        .route("/api/login", post(handler::login))
        .route("/api/profile", get(handler::profile))
}
