//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 注册 / 登录 / 个人信息
//! - [`menu`] - 菜单管理接口
//! - [`orders`] - 订单接口
//! - [`admin`] - 管理员接口 (订单状态、用户角色)
//! - [`reports`] - 销售报表接口

pub mod admin;
pub mod auth;
pub mod health;
pub mod menu;
pub mod orders;
pub mod reports;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
