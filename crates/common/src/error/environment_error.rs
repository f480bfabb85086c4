//! 环境解析错误
//!
//! 这些错误从不向外传播：解析器记录日志后回落到文档化的默认值

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvironmentResolutionError {
    #[error("Network interface enumeration failed: {message}")]
    InterfaceEnumeration { message: String },

    #[error("Invalid listen port override {var}={value}")]
    InvalidPortOverride { var: String, value: String },
}
