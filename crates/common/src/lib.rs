//! sfukit 通用基础设施库
//!
//! 为 SFU 服务提供启动期的配置准备：主机环境解析、端口范围分配、
//! 分层配置装配，以及服务端与客户端共享的品牌文档类型。

pub mod config;
pub mod environment;
pub mod error;
pub mod ports;
pub mod types;

// Re-export commonly used types for convenience
pub use config::{ConfigAssembler, ConfigLayer, RuntimeConfiguration};
pub use environment::{
    HostEnvironment, Platform, resolve_executable_path, resolve_primary_ipv4,
};
pub use error::{ConfigurationAssemblyError, EnvironmentResolutionError, PortRangeError};
pub use ports::{PortRange, compute_server_port_range, compute_transport_port_range};
pub use types::{BrandDocument, BrandEnvelope};
