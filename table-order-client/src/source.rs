//! Authoritative order reads used by the realtime bridge

use async_trait::async_trait;
use shared::models::{OrderDetail, OrderQuery};

use crate::{ClientResult, HttpClient};

/// Where the bridge fetches its baseline from
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// Full order with lines and table number
    async fn fetch_order(&self, id: i64) -> ClientResult<OrderDetail>;

    /// Order list for the given filters, newest first
    async fn fetch_orders(&self, query: &OrderQuery) -> ClientResult<Vec<OrderDetail>>;
}

#[async_trait]
impl OrderSource for HttpClient {
    async fn fetch_order(&self, id: i64) -> ClientResult<OrderDetail> {
        self.get_order(id).await
    }

    async fn fetch_orders(&self, query: &OrderQuery) -> ClientResult<Vec<OrderDetail>> {
        self.list_orders(query).await
    }
}
