//! 服务配置
//!
//! 先从 TOML 文件读取（找不到则使用默认值），再由环境变量覆盖数据库凭据等字段。

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// 服务配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP 服务配置
    pub http: HttpConfig,
    /// 数据库配置
    pub database: DatabaseConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 绑定地址
    pub bind_address: String,
    /// HTTP 服务端口
    pub port: u16,
    /// 请求超时时间（秒）
    pub timeout_seconds: u64,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// 数据库名
    pub name: String,
    /// 完整连接串，设置后忽略上面的分项
    pub url: Option<String>,
    /// 连接池上限
    pub max_connections: u32,
    pub min_connections: u32,
    /// 获取连接的超时时间（秒）
    pub acquire_timeout_seconds: u64,
    /// 启动时执行 `CREATE TABLE IF NOT EXISTS products`
    pub ensure_schema: bool,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8010,
            timeout_seconds: 30,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            username: "postgres".to_string(),
            password: String::new(),
            name: "postgres".to_string(),
            url: None,
            max_connections: 20,
            min_connections: 1,
            acquire_timeout_seconds: 8,
            ensure_schema: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl HttpConfig {
    /// 传给 `TcpListener::bind`，允许 `localhost` 这类主机名
    pub fn bind_target(&self) -> (&str, u16) {
        (self.bind_address.as_str(), self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl DatabaseConfig {
    /// 构造 Postgres 连接参数，设置了 `url` 时直接解析它
    ///
    /// 分项通过 `PgConnectOptions` 逐个设置，密码中的 `/`、`#`、`%` 等字符无需转义。
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = &self.url {
            return PgConnectOptions::from_str(url)
                .map_err(|e| ConfigError::Validation(format!("无效的数据库连接串: {}", e)));
        }

        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .database(&self.name);
        if !self.password.is_empty() {
            options = options.password(&self.password);
        }
        Ok(options)
    }

    /// 用于日志输出的目标描述（不含凭据）
    pub fn describe(&self) -> String {
        match self.connect_options() {
            Ok(options) => format!(
                "{}:{}/{}",
                options.get_host(),
                options.get_port(),
                options.get_database().unwrap_or("")
            ),
            Err(_) => "<invalid database url>".to_string(),
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_seconds)
    }
}

impl Config {
    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::FileWrite(e.to_string()))?;
        }

        fs::write(path.as_ref(), content).map_err(|e| ConfigError::FileWrite(e.to_string()))?;

        Ok(())
    }

    /// 用环境变量覆盖配置项
    ///
    /// `lookup` 通常是 `std::env::var(..).ok()`，测试时可以传入固定表。
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(username) = lookup("APP_DB_USERNAME") {
            self.database.username = username;
        }
        if let Some(password) = lookup("APP_DB_PASSWORD") {
            self.database.password = password;
        }
        if let Some(name) = lookup("APP_DB_NAME") {
            self.database.name = name;
        }
        if let Some(host) = lookup("APP_DB_HOST") {
            self.database.host = host;
        }
        if let Some(port) = lookup("APP_HTTP_PORT") {
            self.http.port = port.parse().map_err(|_| {
                ConfigError::Validation(format!("APP_HTTP_PORT 不是合法端口: {}", port))
            })?;
        }
        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 验证HTTP配置
        if self.http.port == 0 {
            return Err(ConfigError::Validation("HTTP端口必须大于0".to_string()));
        }
        if self.http.bind_address.is_empty() {
            return Err(ConfigError::Validation("绑定地址不能为空".to_string()));
        }

        // 验证数据库配置
        if self.database.url.is_none() && self.database.name.is_empty() {
            return Err(ConfigError::Validation("数据库名不能为空".to_string()));
        }
        self.database.connect_options()?;
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation("连接池上限必须大于0".to_string()));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Validation(format!(
                "min_connections ({}) 不能大于 max_connections ({})",
                self.database.min_connections, self.database.max_connections
            )));
        }

        // 验证日志级别
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.logging.level, valid_levels
            )));
        }

        Ok(())
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("文件读取错误: {0}")]
    FileRead(String),
    #[error("文件写入错误: {0}")]
    FileWrite(String),
    #[error("配置解析错误: {0}")]
    Parse(String),
    #[error("配置序列化错误: {0}")]
    Serialize(String),
    #[error("配置验证错误: {0}")]
    Validation(String),
}

/// 依次尝试 `$APP_CONFIG`、`config.toml`、`./config/config.toml`，都不存在时使用默认配置，
/// 最后应用环境变量覆盖并校验。返回值附带实际读取的配置文件路径。
pub fn load_config() -> Result<(Config, Option<PathBuf>), ConfigError> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Ok(path) = std::env::var("APP_CONFIG") {
        candidates.push(PathBuf::from(path));
    }
    candidates.push(PathBuf::from("config.toml"));
    candidates.push(PathBuf::from("./config/config.toml"));

    let source = candidates.into_iter().find(|path| path.exists());
    let mut config = match &source {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    config.apply_env_overrides(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok((config, source))
}
