//! 统一错误处理模型
//!
//! 提供主程序 sfukit 的顶层错误类型，聚合各 crate 的错误

use sfukit_common::error::ConfigurationAssemblyError;
use thiserror::Error;

/// 主程序的统一错误枚举
#[derive(Debug, Error)]
pub enum Error {
    // ========== 配置相关错误 ==========
    /// 配置装配失败
    #[error("Configuration assembly failed: {0}")]
    Assembly(#[from] ConfigurationAssemblyError),

    /// 找不到指定的覆盖文件
    #[error("Config file not found: {path}")]
    ConfigNotFound { path: String },

    // ========== 服务相关错误 ==========
    /// 品牌客户端创建失败
    #[error("Brand client error: {0}")]
    Brand(#[from] brand::NetworkFetchError),

    // ========== 系统级错误 ==========
    /// I/O 操作错误
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化/反序列化错误
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    // ========== 通用错误 ==========
    #[error("Application error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// 统一的 Result 类型
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// 配置校验发现的问题列表
    pub fn problems(&self) -> &[String] {
        match self {
            Error::Assembly(e) => e.problems(),
            _ => &[],
        }
    }
}
