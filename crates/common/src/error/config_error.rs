//! 配置装配相关错误类型
//!
//! 装配失败是致命的：进程不能带着结构非法的配置启动

use super::PortRangeError;
use thiserror::Error;

/// 配置装配错误
#[derive(Error, Debug)]
pub enum ConfigurationAssemblyError {
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML overrides: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration layer is not a table: {layer}")]
    NotATable { layer: String },

    #[error("Merged configuration does not match the expected structure: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Invalid port range: {0}")]
    PortRange(#[from] PortRangeError),

    #[error("Invalid configuration: {}", problems.join("; "))]
    Invalid { problems: Vec<String> },
}

impl ConfigurationAssemblyError {
    /// 校验问题列表（仅 `Invalid` 变体非空）
    pub fn problems(&self) -> &[String] {
        match self {
            Self::Invalid { problems } => problems,
            _ => &[],
        }
    }
}
