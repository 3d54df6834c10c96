//! Client configuration

use std::time::Duration;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:3000")
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}

/// 实时桥接配置
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// 首次重连延迟
    pub reconnect_delay: Duration,
    /// 最大重连延迟 (指数退避上限)
    pub max_reconnect_delay: Duration,
    /// 连续失败的最大重连次数 (0 表示无限重试)
    pub max_reconnect_attempts: u32,
    /// 超过此时间未收到任何帧 (含 Ping) 视为断连
    pub heartbeat_timeout: Duration,
}

impl Default for BridgeConfig {
    /// 服务端每 30 秒 Ping 一次，75 秒静默可容忍两次丢失
    fn default() -> Self {
        Self {
            reconnect_delay: Duration::from_secs(1),
            max_reconnect_delay: Duration::from_secs(30),
            max_reconnect_attempts: 10,
            heartbeat_timeout: Duration::from_secs(75),
        }
    }
}

impl BridgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置首次重连延迟和退避上限
    pub fn with_reconnect_delay(mut self, initial: Duration, max: Duration) -> Self {
        self.reconnect_delay = initial;
        self.max_reconnect_delay = max;
        self
    }

    /// 设置最大重连尝试次数 (0 表示无限重试)
    pub fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }

    /// 设置心跳超时
    pub fn with_heartbeat_timeout(mut self, timeout: Duration) -> Self {
        self.heartbeat_timeout = timeout;
        self
    }

    /// Delay before reconnect attempt `attempt` (1-based): doubles each time, capped
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        self.reconnect_delay
            .saturating_mul(1u32 << exp)
            .min(self.max_reconnect_delay)
    }

    /// Whether another attempt is allowed after `attempt` consecutive failures
    pub fn may_retry(&self, attempt: u32) -> bool {
        self.max_reconnect_attempts == 0 || attempt <= self.max_reconnect_attempts
    }
}
