use std::path::PathBuf;

use chrono_tz::Tz;

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATABASE_URL | sqlite://data/table-order.db | SQLite 数据库 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | APP_URL | http://localhost:3000 | 对外访问地址 (QR 码、图片 URL) |
/// | IMAGE_DIR | data/images | 图片存储目录 |
/// | TIMEZONE | Asia/Tokyo | 业务时区 (报表、日期筛选) |
/// | LOG_DIR | (未设置) | 设置后按天滚动写日志文件 |
/// | LOG_JSON | false | JSON 格式日志 |
/// | ENVIRONMENT | development | 运行环境 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 APP_URL=https://order.example.com cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub http_port: u16,
    /// Public base URL, no trailing slash
    pub app_url: String,
    pub image_dir: PathBuf,
    pub timezone: Tz,
    pub log_dir: Option<String>,
    pub log_json: bool,
    /// development | staging | production
    pub environment: String,
    pub request_timeout_ms: u64,
    /// Fallbacks taken while loading, logged once tracing is up
    pub startup_warnings: Vec<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置或无法解析的值使用默认值。Runs before the logger exists, so
    /// fallbacks are collected in `startup_warnings` for the caller to log.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an explicit variable source
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut startup_warnings = Vec::new();
        let timezone = match var("TIMEZONE") {
            Some(name) => name.parse().unwrap_or_else(|_| {
                startup_warnings.push(format!("Unknown TIMEZONE {name:?}, falling back to Asia/Tokyo"));
                chrono_tz::Asia::Tokyo
            }),
            None => chrono_tz::Asia::Tokyo,
        };

        Self {
            database_url: var("DATABASE_URL").unwrap_or_else(|| "sqlite://data/table-order.db".into()),
            http_port: var("HTTP_PORT").and_then(|p| p.parse().ok()).unwrap_or(3000),
            app_url: var("APP_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "http://localhost:3000".into()),
            image_dir: var("IMAGE_DIR").unwrap_or_else(|| "data/images".into()).into(),
            timezone,
            log_dir: var("LOG_DIR").filter(|d| !d.is_empty()),
            log_json: var("LOG_JSON").and_then(|v| v.parse().ok()).unwrap_or(false),
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".into()),
            request_timeout_ms: var("REQUEST_TIMEOUT_MS")
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            startup_warnings,
        }
    }

    /// In-memory database and a caller-owned image directory
    ///
    /// 常用于测试场景
    pub fn for_tests(image_dir: impl Into<PathBuf>) -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            http_port: 0,
            app_url: "http://localhost:3000".into(),
            image_dir: image_dir.into(),
            timezone: chrono_tz::Asia::Tokyo,
            log_dir: None,
            log_json: false,
            environment: "test".into(),
            request_timeout_ms: 30000,
            startup_warnings: Vec::new(),
        }
    }

    /// 桌台菜单 URL，编码进 QR 码
    pub fn table_menu_url(&self, table_number: i32) -> String {
        format!("{}/table/{}/menu", self.app_url, table_number)
    }
}
