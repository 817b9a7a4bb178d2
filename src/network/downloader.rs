// Async HTTP downloader — fetches a remote resource into memory for decoding.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use crate::config::DownloadConfig;
use crate::core::error::DownloadError;

/// 异步下载器
///
/// 持有共享的 HTTP 客户端。一个下载器可服务任意数量的并发请求；
/// 超时与 User-Agent 来自 [`DownloadConfig`]。
pub struct Downloader {
    client: Client,
}

impl Downloader {
    /// 创建下载器
    pub fn new(config: &DownloadConfig) -> Result<Arc<Self>, DownloadError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| DownloadError::ClientBuild(e.to_string()))?;

        Ok(Arc::new(Self { client }))
    }

    /// 下载远程资源的完整字节
    ///
    /// GET 请求目标 URL；非 2xx 状态码和空响应体视为错误。
    /// 本层不做重试，失败直接上抛给调用方。
    pub async fn fetch_data(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        debug!(target: "network", "fetching {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(target: "network", "download of {} failed with status {}", url, status);
            return Err(DownloadError::HttpStatus(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            warn!(target: "network", "download of {} returned an empty body", url);
            return Err(DownloadError::EmptyBody);
        }

        debug!(target: "network", "fetched {} ({} bytes)", url, bytes.len());
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DownloadConfig;

    #[test]
    fn test_downloader_creation() {
        let downloader = Downloader::new(&DownloadConfig::default());
        assert!(downloader.is_ok());
    }

    #[test]
    fn test_unreachable_host_is_an_error() {
        let downloader = Downloader::new(&DownloadConfig {
            connect_timeout_secs: 1,
            request_timeout_secs: 1,
            ..DownloadConfig::default()
        })
        .unwrap();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        // 保留地址，连接必然失败
        let result = runtime.block_on(downloader.fetch_data("http://192.0.2.1:9/missing.png"));
        assert!(result.is_err());
    }
}
