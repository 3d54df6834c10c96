//! Table Order Server - 餐厅扫码点餐服务
//!
//! # 架构概述
//!
//! - **数据库** (`db`): SQLite (sqlx)，迁移随二进制发布
//! - **HTTP API** (`api`): 管理端 CRUD、顾客下单、报表、图片
//! - **实时推送** (`realtime`): 订单变更广播，经 WebSocket 下发
//! - **图片存储** (`services`): 本地文件系统
//!
//! # 模块结构
//!
//! ```text
//! table-order-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 连接池、迁移、repository
//! ├── realtime/      # OrderHub
//! ├── services/      # ImageStore
//! └── utils/         # 日志、校验、时区
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod realtime;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState, ServiceError, ServiceResult};
pub use realtime::OrderHub;
pub use services::ImageStore;
pub use utils::logger::init_logger;

pub fn print_banner() {
    println!(
        r#"
  _____     _     _         ___          _
 |_   _|_ _| |__ | |___    / _ \ _ _ __| |___ _ _
   | |/ _` | '_ \| / -_)  | (_) | '_/ _` / -_) '_|
   |_|\__,_|_.__/|_\___|   \___/|_| \__,_\___|_|
    "#
    );
}
