//! 数据库基础设施

use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    Error,
};
use tracing::info;

use crate::config::DatabaseConfig;

const TABLE_CREATION_QUERY: &str = r#"
CREATE TABLE IF NOT EXISTS products
(
    id SERIAL,
    name TEXT NOT NULL,
    price NUMERIC(10,2) NOT NULL DEFAULT 0.00,
    CONSTRAINT products_pkey PRIMARY KEY (id)
)
"#;

pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, Error> {
        info!("Connecting to database: {}", config.describe());

        let options = config
            .connect_options()
            .map_err(|e| Error::Configuration(Box::new(e)))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    /// 建表（已存在时不做任何事）
    pub async fn ensure_schema(&self) -> Result<(), Error> {
        sqlx::query(TABLE_CREATION_QUERY)
            .execute(&self.pool)
            .await?;
        info!("products table is ready");
        Ok(())
    }
}
