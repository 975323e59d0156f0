//! 产品存储服务
//!
//! 每个方法只对应一条参数化 SQL 语句。

use async_trait::async_trait;
use sqlx::postgres::PgPool;

use super::model::{Product, ProductPayload};
use crate::core::error::CoreError;

#[async_trait]
pub trait ProductService: Send + Sync {
    /// 插入一行，返回带有数据库分配 id 的产品
    async fn create_product(&self, payload: ProductPayload) -> Result<Product, CoreError>;

    async fn get_product(&self, id: i32) -> Result<Option<Product>, CoreError>;

    /// 返回受影响的行数
    async fn update_product(&self, id: i32, payload: &ProductPayload) -> Result<u64, CoreError>;

    /// 返回受影响的行数
    async fn delete_product(&self, id: i32) -> Result<u64, CoreError>;

    /// 名称包含 `name`（不区分大小写）的产品，按 id 升序
    async fn search_products(&self, name: &str) -> Result<Vec<Product>, CoreError>;

    async fn list_products(&self) -> Result<Vec<Product>, CoreError>;

    async fn count_products(&self) -> Result<i64, CoreError>;

    /// 健康检查
    async fn ping(&self) -> Result<(), CoreError>;
}

#[derive(Clone)]
pub struct PgProductService {
    pool: PgPool,
}

impl PgProductService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductService for PgProductService {
    async fn create_product(&self, payload: ProductPayload) -> Result<Product, CoreError> {
        let (id,): (i32,) =
            sqlx::query_as("INSERT INTO products (name, price) VALUES ($1, $2) RETURNING id")
                .bind(&payload.name)
                .bind(payload.price)
                .fetch_one(&self.pool)
                .await?;

        Ok(payload.into_product(id))
    }

    async fn get_product(&self, id: i32) -> Result<Option<Product>, CoreError> {
        let product =
            sqlx::query_as::<_, Product>("SELECT id, name, price FROM products WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(product)
    }

    async fn update_product(&self, id: i32, payload: &ProductPayload) -> Result<u64, CoreError> {
        let result = sqlx::query("UPDATE products SET name = $1, price = $2 WHERE id = $3")
            .bind(&payload.name)
            .bind(payload.price)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_product(&self, id: i32) -> Result<u64, CoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn search_products(&self, name: &str) -> Result<Vec<Product>, CoreError> {
        let pattern = format!("%{}%", escape_like(name));

        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price FROM products WHERE name ILIKE $1 ORDER BY id",
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn list_products(&self) -> Result<Vec<Product>, CoreError> {
        let products =
            sqlx::query_as::<_, Product>("SELECT id, name, price FROM products ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(products)
    }

    async fn count_products(&self) -> Result<i64, CoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn ping(&self) -> Result<(), CoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// 转义 LIKE 通配符，使搜索词按字面匹配（Postgres 默认转义符为 `\`）
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
