//! 核心模块
//!
//! 包含脚本子系统的核心功能：
//! - `error` - 错误类型定义
//! - `scheduler` - 任务调度系统
//! - `clock` - 引擎单调时钟

pub mod clock;
pub mod error;
pub mod scheduler;

// 重新导出错误类型
pub use error::{DownloadError, EngineError, ScriptError, TextureError};

// 重新导出主要类型
pub use clock::performance_now;
pub use scheduler::{TaskHandle, TaskScheduler};
