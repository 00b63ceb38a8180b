use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use crate::infrastructure::error::ReviewError;

/// HTTP 客户端配置
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 10,
            user_agent: format!("review-analyzer/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// 构建启动时共享的 HTTP 客户端
///
/// `reqwest::Client` 内部是引用计数的，克隆后交给各个 AI 客户端即可。
pub fn build_client(config: &HttpClientConfig) -> Result<Client, ReviewError> {
    ClientBuilder::new()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .pool_idle_timeout(Duration::from_secs(30))
        .user_agent(&config.user_agent)
        .build()
        .map_err(|e| ReviewError::config(format!("Failed to create HTTP client: {}", e)))
}
