//! Logging Infrastructure
//!
//! `RUST_LOG` 优先；未设置时使用默认过滤器。设置 `LOG_DIR` 时额外按天滚动写文件。

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::core::Config;

const DEFAULT_FILTER: &str = "table_order_server=info,tower_http=info";

/// Initialize the global subscriber
///
/// The returned guard flushes the file writer and must live until shutdown.
pub fn init_logger(config: &Config) -> Option<WorkerGuard> {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let console = if config.log_json {
        fmt::layer().json().with_target(true).boxed()
    } else {
        fmt::layer().with_target(false).boxed()
    };

    let (file, guard) = match config.log_dir.as_deref() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "table-order-server");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(filter())
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let result = tracing_subscriber::registry()
        .with(console.with_filter(filter()))
        .with(file)
        .try_init();
    if let Err(e) = result {
        eprintln!("Logger already initialized: {e}");
    }
    guard
}
