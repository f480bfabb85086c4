//! 品牌文档来源
//!
//! 远程端点约定：`GET /brand`，2xx 时响应体为 `{ "message": BrandDocument }`；
//! 其他状态码与传输失败一视同仁。

use crate::error::NetworkFetchError;
use async_trait::async_trait;
use sfukit_common::types::{BrandDocument, BrandEnvelope};
use std::time::Duration;
use tracing::debug;

/// 默认请求超时
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// 品牌文档的远程来源
#[async_trait]
pub trait BrandSource: Send + Sync {
    async fn fetch(&self) -> Result<BrandDocument, NetworkFetchError>;
}

/// 基于 HTTP 的品牌来源
#[derive(Debug, Clone)]
pub struct HttpBrandSource {
    url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpBrandSource {
    /// 创建 HTTP 来源
    ///
    /// `endpoint` 是服务根地址（例如 `http://127.0.0.1:3010`），请求路径固定为 `/brand`。
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, NetworkFetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NetworkFetchError::Transport {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            url: format!("{}/brand", endpoint.trim_end_matches('/')),
            timeout,
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl BrandSource for HttpBrandSource {
    async fn fetch(&self) -> Result<BrandDocument, NetworkFetchError> {
        debug!("Fetching brand document from {}", self.url);

        let response = self.client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                NetworkFetchError::Timeout {
                    after: self.timeout,
                }
            } else {
                NetworkFetchError::Transport {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkFetchError::Status {
                status: status.as_u16(),
            });
        }

        let envelope: BrandEnvelope =
            response
                .json()
                .await
                .map_err(|e| NetworkFetchError::Decode {
                    message: e.to_string(),
                })?;

        envelope.message.ok_or(NetworkFetchError::EmptyPayload)
    }
}
