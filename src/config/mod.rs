/// 统一配置系统
///
/// 提供TOML/JSON配置文件、环境变量覆盖和配置验证
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 脚本子系统主配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 下载配置
    #[serde(default)]
    pub download: DownloadConfig,

    /// 脚本配置
    #[serde(default)]
    pub scripting: ScriptingConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            download: DownloadConfig::default(),
            scripting: ScriptingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("ENGINE_DOWNLOAD_CONNECT_TIMEOUT") {
            if let Ok(secs) = val.parse() {
                self.download.connect_timeout_secs = secs;
            }
        }
        if let Ok(val) = env::var("ENGINE_DOWNLOAD_REQUEST_TIMEOUT") {
            if let Ok(secs) = val.parse() {
                self.download.request_timeout_secs = secs;
            }
        }
        if let Ok(val) = env::var("ENGINE_SCRIPT_WORKER_THREADS") {
            if let Ok(n) = val.parse() {
                self.scripting.worker_threads = n;
            }
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.download.validate()?;
        self.scripting.validate()?;
        Ok(())
    }
}

/// 下载配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// 连接超时（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// 请求超时（秒）
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// User-Agent 请求头
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_connect_timeout() -> u64 {
    8
}

fn default_request_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("game_engine_scripting/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl DownloadConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "download.connect_timeout_secs must be > 0".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "download.request_timeout_secs must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// 脚本配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptingConfig {
    /// 工作线程数量，0 表示使用 CPU 核心数
    #[serde(default)]
    pub worker_threads: usize,

    /// 每帧主线程队列最多处理的任务数
    #[serde(default = "default_tasks_per_frame")]
    pub tasks_per_frame: usize,
}

fn default_tasks_per_frame() -> usize {
    16
}

impl Default for ScriptingConfig {
    fn default() -> Self {
        Self {
            worker_threads: 0,
            tasks_per_frame: default_tasks_per_frame(),
        }
    }
}

impl ScriptingConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.tasks_per_frame == 0 {
            return Err(ConfigError::ValidationError(
                "scripting.tasks_per_frame must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// 初始化日志输出
///
/// `RUST_LOG` 环境变量优先于配置文件中的级别。重复调用仅首次生效。
pub fn init_logging(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.level.clone()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.download.connect_timeout_secs, 8);
        assert_eq!(config.scripting.tasks_per_frame, 16);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = EngineConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: EngineConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(
            config.download.request_timeout_secs,
            parsed.download.request_timeout_secs
        );
    }

    #[test]
    fn test_partial_toml() {
        // 缺省字段回退到默认值
        let parsed = EngineConfig::from_toml_str("[download]\nconnect_timeout_secs = 3\n").unwrap();
        assert_eq!(parsed.download.connect_timeout_secs, 3);
        assert_eq!(parsed.download.request_timeout_secs, 30);
        assert_eq!(parsed.scripting.tasks_per_frame, 16);
    }

    #[test]
    fn test_json_parse() {
        let parsed =
            EngineConfig::from_json_str(r#"{"scripting": {"worker_threads": 2}}"#).unwrap();
        assert_eq!(parsed.scripting.worker_threads, 2);
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let mut config = EngineConfig::default();
        config.download.connect_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.scripting.tasks_per_frame = 0;
        assert!(config.validate().is_err());
    }
}
