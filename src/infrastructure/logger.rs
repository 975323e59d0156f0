//! 日志基础设施

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

pub struct Logger;

impl Logger {
    /// 安装全局 subscriber，`RUST_LOG` 优先于配置文件里的级别
    pub fn init(config: &LoggingConfig) -> anyhow::Result<()> {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))?;

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))?;

        Ok(())
    }
}
