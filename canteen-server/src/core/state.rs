use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::models::{Role, User};
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult};

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 是应用的核心数据结构，构造一次后注入到每个 handler。
/// 使用 Arc / 连接池实现浅拷贝，克隆成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | SqlitePool | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub db: SqlitePool,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 方法代替
    pub fn new(config: Config, db: SqlitePool, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            db,
            jwt_service,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 数据库连接池 + 迁移
    /// 2. JWT 服务
    /// 3. 种子管理员 (ADMIN_EMAIL / ADMIN_PASSWORD 设置时)
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db_service = DbService::new(&config.database_url).await?;
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        let state = Self::new(config.clone(), db_service.pool, jwt_service);
        state.seed_admin().await?;

        Ok(state)
    }

    /// 获取数据库连接池
    pub fn get_db(&self) -> SqlitePool {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 种子默认管理员
    ///
    /// ADMIN_EMAIL 与 ADMIN_PASSWORD 都设置且该邮箱不存在时创建，
    /// 跨重启幂等。
    async fn seed_admin(&self) -> AppResult<()> {
        let (email, password) = match (&self.config.admin_email, &self.config.admin_password) {
            (Some(email), Some(password)) => (email, password),
            _ => {
                tracing::debug!("Admin seed credentials not configured, skipping");
                return Ok(());
            }
        };

        let repo = UserRepository::new(self.get_db());
        if repo.find_by_email(email).await?.is_some() {
            tracing::debug!(email = %email, "Admin user already exists, skipping seed");
            return Ok(());
        }

        let password_hash = User::hash_password(password)
            .map_err(|e| AppError::internal(format!("Failed to hash admin password: {e}")))?;
        repo.create("Admin", email, &password_hash, Role::Admin)
            .await?;

        tracing::info!(email = %email, "Seeded default admin user");
        Ok(())
    }
}
