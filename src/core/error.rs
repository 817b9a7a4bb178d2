//! 统一错误处理模块
//!
//! 提供脚本子系统范围内的统一错误类型定义
//!
//! ## 错误类型分层
//!
//! - **基础设施层错误** (`core::error`): 初始化、调度等基础设施错误
//! - **子系统错误**: 脚本 (`ScriptError`)、下载 (`DownloadError`)、
//!   纹理 (`TextureError`)、配置 (`crate::config::ConfigError`)
//!
//! `EngineError` 可以同时处理基础设施层和各子系统的错误。

use thiserror::Error;

/// 引擎脚本子系统错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Initialization error: {0}")]
    Init(String),

    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),

    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 脚本系统错误
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Failed to create JS runtime: {0}")]
    RuntimeCreation(String),

    #[error("Failed to create JS context: {0}")]
    ContextCreation(String),

    #[error("Script evaluation failed: {0}")]
    Eval(String),

    #[error("Failed to register binding '{name}': {reason}")]
    Binding { name: String, reason: String },

    #[error("JS error: {0}")]
    Js(#[from] rquickjs::Error),
}

/// 下载系统错误
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned status {0}")]
    HttpStatus(u16),

    #[error("Response body is empty")]
    EmptyBody,
}

/// 纹理系统错误
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to decode image data: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Image has zero width or height")]
    ZeroSized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DownloadError::HttpStatus(404);
        assert_eq!(err.to_string(), "Server returned status 404");

        let err = TextureError::ZeroSized;
        assert!(err.to_string().contains("zero"));
    }

    #[test]
    fn test_error_conversion() {
        // 子系统错误可以向上转换为 EngineError
        let err: EngineError = DownloadError::EmptyBody.into();
        assert!(matches!(err, EngineError::Download(_)));

        let err: EngineError = TextureError::ZeroSized.into();
        assert!(matches!(err, EngineError::Texture(_)));
    }
}
