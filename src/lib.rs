//! # 产品目录 API
//!
//! 单表 `products` 之上的 CRUD HTTP 接口：
//! - `app`：路由与产品处理器
//! - `core`：错误处理与中间件
//! - `infrastructure`：数据库连接池与日志
//! - `config`：TOML 配置与环境变量覆盖

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::{router, AppState};
pub use config::Config;
pub use crate::core::error::CoreError;
