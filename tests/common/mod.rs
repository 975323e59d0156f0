//! 集成测试公共工具：内存版产品服务与请求辅助函数

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use product_catalog::{
    app::product::{Product, ProductPayload, ProductService},
    config::HttpConfig,
    router, AppState, CoreError,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Default)]
struct Table {
    next_id: i32,
    rows: BTreeMap<i32, Product>,
}

/// 行为与 Postgres 实现一致的内存存储，id 从 1 开始递增
#[derive(Default)]
pub struct MemoryProductService {
    table: Mutex<Table>,
}

impl MemoryProductService {
    /// 插入 `Product 0..count`，价格为 `(i + 1) * 10`
    pub fn seed(&self, count: usize) {
        let mut table = self.table.lock().unwrap();
        for i in 0..count {
            table.next_id += 1;
            let id = table.next_id;
            table.rows.insert(
                id,
                Product {
                    id,
                    name: format!("Product {}", i),
                    price: Decimal::from((i as i64 + 1) * 10),
                },
            );
        }
    }
}

#[async_trait]
impl ProductService for MemoryProductService {
    async fn create_product(&self, payload: ProductPayload) -> Result<Product, CoreError> {
        let mut table = self.table.lock().unwrap();
        table.next_id += 1;
        let product = payload.into_product(table.next_id);
        table.rows.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get_product(&self, id: i32) -> Result<Option<Product>, CoreError> {
        Ok(self.table.lock().unwrap().rows.get(&id).cloned())
    }

    async fn update_product(&self, id: i32, payload: &ProductPayload) -> Result<u64, CoreError> {
        let mut table = self.table.lock().unwrap();
        match table.rows.get_mut(&id) {
            Some(row) => {
                row.name = payload.name.clone();
                row.price = payload.price;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_product(&self, id: i32) -> Result<u64, CoreError> {
        let removed = self.table.lock().unwrap().rows.remove(&id);
        Ok(u64::from(removed.is_some()))
    }

    async fn search_products(&self, name: &str) -> Result<Vec<Product>, CoreError> {
        let needle = name.to_lowercase();
        Ok(self
            .table
            .lock()
            .unwrap()
            .rows
            .values()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn list_products(&self) -> Result<Vec<Product>, CoreError> {
        Ok(self.table.lock().unwrap().rows.values().cloned().collect())
    }

    async fn count_products(&self) -> Result<i64, CoreError> {
        Ok(self.table.lock().unwrap().rows.len() as i64)
    }

    async fn ping(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

/// 所有调用都失败的服务，用来验证 500 路径
pub struct FailingProductService;

#[async_trait]
impl ProductService for FailingProductService {
    async fn create_product(&self, _payload: ProductPayload) -> Result<Product, CoreError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn get_product(&self, _id: i32) -> Result<Option<Product>, CoreError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn update_product(&self, _id: i32, _payload: &ProductPayload) -> Result<u64, CoreError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn delete_product(&self, _id: i32) -> Result<u64, CoreError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn search_products(&self, _name: &str) -> Result<Vec<Product>, CoreError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn list_products(&self) -> Result<Vec<Product>, CoreError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn count_products(&self) -> Result<i64, CoreError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn ping(&self) -> Result<(), CoreError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }
}

pub fn app_with(service: Arc<dyn ProductService>) -> Router {
    router(AppState::new(service), &HttpConfig::default())
}

/// 测试响应：状态码 + 原始响应体
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub request_id: Option<String>,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    TestResponse {
        status,
        content_type,
        request_id,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}
