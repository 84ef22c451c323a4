//! Order API Handlers

use axum::{Json, extract::State, response::IntoResponse};
use http::StatusCode;
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{OrderDetail, PlaceOrderRequest};
use crate::db::repository::OrderRepository;
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    pub message: String,
    pub order: OrderDetail,
}

/// POST /api/orders - 下单
///
/// 所有写入在单个事务内完成；任一订单行无效则整单中止，不落任何行。
pub async fn place(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<PlaceOrderRequest>,
) -> AppResult<impl IntoResponse> {
    let items = match req.items {
        Some(items) if !items.is_empty() => items,
        _ => {
            return Err(AppError::with_message(
                ErrorCode::OrderEmpty,
                "Invalid or empty order data provided",
            ));
        }
    };

    let repo = OrderRepository::new(state.get_db());
    let order = repo.place(user.id, &items).await?;

    Ok((
        StatusCode::CREATED,
        Json(PlaceOrderResponse {
            message: "Order placed successfully".to_string(),
            order,
        }),
    ))
}

/// GET /api/orders - 当前用户的订单，新的在前
pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<OrderDetail>>> {
    let repo = OrderRepository::new(state.get_db());
    let orders = repo.find_for_user(user.id).await?;
    Ok(Json(orders))
}
