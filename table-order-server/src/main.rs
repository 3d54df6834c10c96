use table_order_server::{Config, Server, ServerState, init_logger, print_banner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 环境变量 (.env 可选)
    let _ = dotenvy::dotenv();

    // 2. 加载配置、初始化日志
    let config = Config::from_env();
    let _log_guard = init_logger(&config);
    for warning in &config.startup_warnings {
        tracing::warn!("{warning}");
    }

    print_banner();
    tracing::info!(
        environment = %config.environment,
        timezone = %config.timezone,
        "Table order server starting..."
    );

    // 3. 数据库、迁移、图片目录
    let state = ServerState::initialize(&config).await?;

    // 4. 启动 HTTP 服务器
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
