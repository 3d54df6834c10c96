//! Table Order Client - HTTP client and realtime bridge for the table order server
//!
//! Provides REST calls, WebSocket change feeds, live order views and a
//! file-backed cart store.

pub mod bridge;
pub mod config;
pub mod error;
pub mod feed;
pub mod http;
pub mod source;
pub mod storage;

pub use bridge::{BoardState, ConnectionState, OrderBoard, OrderStatusTracker, TrackedOrder};
pub use config::{BridgeConfig, ClientConfig};
pub use error::{ClientError, ClientResult};
pub use feed::{ChangeFeed, ChangeStream, FeedEvent, MemoryChangeFeed, WsChangeFeed};
pub use http::HttpClient;
pub use source::OrderSource;
pub use storage::FileCartStorage;

// Re-export shared types for convenience
pub use shared::cart::{Cart, CartStorage};
pub use shared::realtime::{ChannelScope, OrderChange, RealtimeMessage};
