//! 产品数据模型

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

/// `NUMERIC(10,2)` 能表示的最大整数部分
const MAX_PRICE: i64 = 100_000_000;
/// 与数据库列的小数位一致
const PRICE_SCALE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// 创建、更新产品的请求体
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductPayload {
    #[validate(length(min = 1, message = "Product name must not be empty"))]
    pub name: String,

    #[serde(default, deserialize_with = "deserialize_price")]
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
}

impl ProductPayload {
    pub fn into_product(self, id: i32) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
        }
    }
}

/// 按 Postgres `NUMERIC` 的方式（四舍五入，远离零）保留两位小数，
/// 保证校验、写库和回显使用的是同一个值
fn deserialize_price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let price = rust_decimal::serde::float::deserialize(deserializer)?;
    Ok(price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero))
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.abs() >= Decimal::from(MAX_PRICE) {
        let mut error = ValidationError::new("price_range");
        error.message = Some("Product price is out of range".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
}

/// 删除成功时的响应体
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub result: String,
}

impl DeleteResponse {
    pub fn success() -> Self {
        Self {
            result: "success".to_string(),
        }
    }
}
