use sqlx::SqlitePool;

use crate::core::Config;
use crate::core::error::ServiceResult;
use crate::db::DbService;
use crate::realtime::OrderHub;
use crate::services::ImageStore;

/// 服务器状态 - 所有 handler 共享
///
/// Cheap to clone: the pool, hub and image store are all handles.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    /// 订单变更广播
    pub hub: OrderHub,
    pub images: ImageStore,
}

impl ServerState {
    /// 打开数据库、执行迁移、准备图片目录
    pub async fn initialize(config: &Config) -> ServiceResult<Self> {
        let db = DbService::new(&config.database_url).await?;
        Self::with_pool(config.clone(), db.pool).await
    }

    /// Build state around an existing pool (tests use an in-memory one)
    pub async fn with_pool(config: Config, pool: SqlitePool) -> ServiceResult<Self> {
        let images = ImageStore::new(&config.image_dir, &config.app_url).await?;
        Ok(Self {
            config,
            pool,
            hub: OrderHub::new(),
            images,
        })
    }
}
