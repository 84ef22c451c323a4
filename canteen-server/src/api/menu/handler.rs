//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use http::StatusCode;
use shared::client::MessageResponse;

use crate::core::ServerState;
use crate::db::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use crate::db::repository::MenuItemRepository;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// GET /api/menu - 获取所有菜单项 (包含已下架)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    let repo = MenuItemRepository::new(state.get_db());
    let items = repo.find_all().await?;
    Ok(Json(items))
}

/// POST /api/menu - 创建菜单项
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<impl IntoResponse> {
    let (Some(name), Some(price)) = (payload.name, payload.price) else {
        return Err(AppError::validation("Missing name or price"));
    };
    validate_required_text(&name, "name", MAX_NAME_LEN)?;
    if price < 0.0 {
        return Err(AppError::validation("price must not be negative"));
    }

    let repo = MenuItemRepository::new(state.get_db());
    let item = repo
        .create(&name, price, payload.is_available.unwrap_or(true))
        .await?;

    tracing::info!(id = item.id, name = %item.name, "Menu item created");

    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/menu/{id} - 更新菜单项 (部分更新)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(price) = payload.price
        && price < 0.0
    {
        return Err(AppError::validation("price must not be negative"));
    }

    let repo = MenuItemRepository::new(state.get_db());
    repo.find_by_id(id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::MenuItemNotFound, format!("Menu item {} not found", id))
    })?;

    let item = repo.update(id, payload).await?;
    Ok(Json(item))
}

/// DELETE /api/menu/{id} - 下架菜单项 (软删除)
pub async fn soft_delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    let repo = MenuItemRepository::new(state.get_db());
    repo.find_by_id(id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::MenuItemNotFound, format!("Menu item {} not found", id))
    })?;

    repo.mark_unavailable(id).await?;

    tracing::info!(id = id, "Menu item marked unavailable");

    Ok(Json(MessageResponse::new(format!(
        "Item with id {} has been marked as unavailable.",
        id
    ))))
}
