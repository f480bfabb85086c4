//! 品牌同步错误类型
//!
//! 这些错误都在客户端内部消化：记录日志后降级到内置文档，从不抛给调用方。

use std::time::Duration;
use thiserror::Error;

/// 远程获取品牌文档失败
#[derive(Error, Debug)]
pub enum NetworkFetchError {
    #[error("Brand request failed: {message}")]
    Transport { message: String },

    #[error("Brand endpoint returned HTTP {status}")]
    Status { status: u16 },

    #[error("Brand request timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("Failed to decode brand response: {message}")]
    Decode { message: String },

    #[error("Brand response carried no message")]
    EmptyPayload,
}

/// 会话存储写入失败
#[derive(Error, Debug)]
#[error("Session store error: {message}")]
pub struct SessionStoreError {
    pub message: String,
}

impl SessionStoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
