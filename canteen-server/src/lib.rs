//! Canteen Server - 食堂订餐后端
//!
//! # 架构概述
//!
//! - **数据库** (`db`): SQLite 连接池、模型与仓储层
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **HTTP API** (`api`): RESTful API 接口
//! - **核心** (`core`): 配置、状态、服务器装配
//!
//! # 模块结构
//!
//! ```text
//! canteen-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、中间件
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (模型 + 仓储)
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    // .env 不存在时静默跳过
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______            __
  / ____/___ _____  / /____  ___  ____
 / /   / __ `/ __ \/ __/ _ \/ _ \/ __ \
/ /___/ /_/ / / / / /_/  __/  __/ / / /
\____/\__,_/_/ /_/\__/\___/\___/_/ /_/
    "#
    );
}
