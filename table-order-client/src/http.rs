//! HTTP client for the table order REST API

use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::ApiResponse;
use shared::models::{
    DashboardStats, DiningTable, DiningTableCreate, MenuCategory, MenuCategoryCreate, MenuItem,
    MenuItemCreate, MenuItemQuery, MenuItemWithCategory, Order, OrderCreate, OrderDetail,
    OrderQuery, OrderStatusUpdate,
};
use shared::order::OrderStatus;
use shared::realtime::ChannelScope;
use shared::report::{ReportPeriod, SalesReport};

use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client for making requests to the table order server
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Client with default settings for `base_url`
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::from_config(&ClientConfig::new(base_url))
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// WebSocket URL for a realtime scope (`http` → `ws`, `https` → `wss`)
    pub fn ws_url(&self, scope: ChannelScope) -> String {
        let base = if let Some(rest) = self.base_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.base_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            self.base_url.clone()
        };
        format!("{base}{}", scope.ws_path())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<T> {
        let mut request = self.client.request(method, self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    /// Make a GET request with query parameters
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        let response = self.client.get(self.url(path)).query(query).send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.request(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request::<T, ()>(Method::DELETE, path, None).await
    }

    /// Success bodies are the payload itself; failures carry the error envelope
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(Into::into);
        }

        let text = response.text().await?;
        match serde_json::from_str::<ApiResponse<serde_json::Value>>(&text)
            .ok()
            .and_then(ApiResponse::into_error)
        {
            Some(err) => Err(err.into()),
            None => Err(ClientError::InvalidResponse(format!(
                "{}: {}",
                status.as_u16(),
                if text.is_empty() {
                    status.canonical_reason().unwrap_or("error")
                } else {
                    text.as_str()
                }
            ))),
        }
    }

    // ========== Menu ==========

    pub async fn list_categories(&self) -> ClientResult<Vec<MenuCategory>> {
        self.get("/api/categories").await
    }

    pub async fn create_category(&self, data: &MenuCategoryCreate) -> ClientResult<MenuCategory> {
        self.post("/api/categories", data).await
    }

    pub async fn list_menu_items(
        &self,
        query: &MenuItemQuery,
    ) -> ClientResult<Vec<MenuItemWithCategory>> {
        self.get_with_query("/api/menu-items", query).await
    }

    pub async fn get_menu_item(&self, id: i64) -> ClientResult<MenuItem> {
        self.get(&format!("/api/menu-items/{id}")).await
    }

    pub async fn create_menu_item(&self, data: &MenuItemCreate) -> ClientResult<MenuItem> {
        self.post("/api/menu-items", data).await
    }

    pub async fn toggle_availability(&self, id: i64) -> ClientResult<MenuItem> {
        self.post(&format!("/api/menu-items/{id}/toggle-availability"), &())
            .await
    }

    // ========== Tables ==========

    pub async fn list_tables(&self) -> ClientResult<Vec<DiningTable>> {
        self.get("/api/tables").await
    }

    pub async fn create_table(&self, table_number: i32) -> ClientResult<DiningTable> {
        self.post("/api/tables", &DiningTableCreate { table_number })
            .await
    }

    /// 顾客扫码入口: 按桌号查询
    pub async fn table_by_number(&self, table_number: i32) -> ClientResult<DiningTable> {
        self.get(&format!("/api/tables/by-number/{table_number}"))
            .await
    }

    // ========== Orders ==========

    /// Submit an order; a repeated idempotency key returns the first order
    pub async fn submit_order(&self, data: &OrderCreate) -> ClientResult<OrderDetail> {
        self.post("/api/orders", data).await
    }

    pub async fn get_order(&self, id: i64) -> ClientResult<OrderDetail> {
        self.get(&format!("/api/orders/{id}")).await
    }

    pub async fn list_orders(&self, query: &OrderQuery) -> ClientResult<Vec<OrderDetail>> {
        self.get_with_query("/api/orders", query).await
    }

    pub async fn update_order_status(&self, id: i64, status: OrderStatus) -> ClientResult<Order> {
        self.patch(
            &format!("/api/orders/{id}/status"),
            &OrderStatusUpdate { status },
        )
        .await
    }

    /// Only cancelled orders can be deleted
    pub async fn delete_order(&self, id: i64) -> ClientResult<bool> {
        self.delete(&format!("/api/orders/{id}")).await
    }

    pub async fn order_stats(&self) -> ClientResult<DashboardStats> {
        self.get("/api/orders/stats").await
    }

    // ========== Reports ==========

    pub async fn sales_report(&self, period: ReportPeriod) -> ClientResult<SalesReport> {
        #[derive(Serialize)]
        struct Query {
            period: ReportPeriod,
        }
        self.get_with_query("/api/reports", &Query { period }).await
    }
}
