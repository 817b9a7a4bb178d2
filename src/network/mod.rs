//! 网络模块
//!
//! 提供脚本绑定所需的异步 HTTP 下载能力。
//! 下载一旦开始便运行至成功或失败，不提供中途取消。

pub mod downloader;

pub use downloader::Downloader;
