//! 统一配置管理系统
//!
//! 本模块是 SFU 运行时配置的"单一真理之源"。
//! 所有配置段的定义、文档、默认值都在这里统一管理，
//! 由 [`assembler::ConfigAssembler`] 在进程启动时一次性装配成只读配置。

pub mod assembler;
pub mod integrations;
pub mod layer;
pub mod mediasoup;
pub mod observability;
pub mod server;

pub use crate::config::assembler::ConfigAssembler;
pub use crate::config::integrations::{
    ApiConfig, ConsoleConfig, IntegrationToggle, IntegrationsConfig, JwtConfig, MiddlewareConfig,
    PresentersConfig, StatsConfig,
};
pub use crate::config::layer::ConfigLayer;
pub use crate::config::mediasoup::{MediasoupConfig, NetworkEndpoint, Protocol};
pub use crate::config::observability::{LogConfig, ObservabilityConfig};
pub use crate::config::server::ServerConfig;

use crate::types::BrandDocument;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::net::IpAddr;

/// SFU 服务的运行时配置
///
/// 由默认值、环境推导值和显式覆盖三层合并而成。装配完成后以
/// `Arc<RuntimeConfiguration>` 形式交给服务启动流程，不再原地修改；
/// 网络和端口段的任何变化都需要重新装配并重启进程。
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RuntimeConfiguration {
    /// 控制台显示选项
    pub console: ConsoleConfig,

    /// HTTP 服务（监听地址、CORS、录制、RTMP）
    pub server: ServerConfig,

    /// 中间件（IP 白名单）
    pub middleware: MiddlewareConfig,

    /// REST API 密钥与端点开关
    pub api: ApiConfig,

    pub jwt: JwtConfig,

    pub presenters: PresentersConfig,

    /// 集成开关（oidc、email、slack、discord ...）
    pub integrations: IntegrationsConfig,

    pub stats: StatsConfig,

    /// 界面定制，`ui.brand` 即服务端 `GET /brand` 下发的品牌文档
    pub ui: UiConfig,

    /// 媒体层（worker、编解码器、监听端点）
    pub mediasoup: MediasoupConfig,

    /// 可观测性配置（日志）
    pub observability: ObservabilityConfig,

    /// 未识别的顶层键，原样保留以便向前兼容
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct UiConfig {
    pub brand: BrandDocument,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            brand: BrandDocument::builtin(),
            extensions: Map::new(),
        }
    }
}

impl Default for RuntimeConfiguration {
    fn default() -> Self {
        Self {
            console: ConsoleConfig::default(),
            server: ServerConfig::default(),
            middleware: MiddlewareConfig::default(),
            api: ApiConfig::default(),
            jwt: JwtConfig::default(),
            presenters: PresentersConfig::default(),
            integrations: IntegrationsConfig::default(),
            stats: StatsConfig::default(),
            ui: UiConfig::default(),
            mediasoup: MediasoupConfig::default(),
            observability: ObservabilityConfig::default(),
            extensions: Map::new(),
        }
    }
}

impl RuntimeConfiguration {
    /// 从 JSON 值加载配置
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// 序列化为 JSON 值
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// 返回可观测性配置引用
    pub fn observability_config(&self) -> &ObservabilityConfig {
        &self.observability
    }

    /// 验证配置的结构有效性
    ///
    /// 只检查结构性约束，不校验业务语义：
    /// - 端口范围 `min <= max`，传输端口范围满足参与者容量
    /// - worker 数量、参与者数量至少为 1
    /// - 监听端口非 0，地址可解析
    /// - 日志配置取值合法
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        // 验证监听地址
        if self.server.listen.port == 0 {
            errors.push("server.listen.port cannot be 0".to_string());
        }
        if self.server.listen.ip.parse::<IpAddr>().is_err() {
            errors.push(format!(
                "Invalid server.listen.ip '{}', must be a valid IP address",
                self.server.listen.ip
            ));
        }

        // 验证 mediasoup
        let media = &self.mediasoup;
        if media.num_workers == 0 {
            errors.push("mediasoup.num_workers must be at least 1".to_string());
        }
        if media.expected_participants == 0 {
            errors.push("mediasoup.expected_participants must be at least 1".to_string());
        }
        if let Err(e) = media.worker_port_range().check_order() {
            errors.push(format!("mediasoup.worker rtc ports: {e}"));
        }
        if !media.announced_address.is_empty()
            && media.announced_address.parse::<IpAddr>().is_err()
        {
            errors.push(format!(
                "Invalid mediasoup.announced_address '{}', must be a valid IP address",
                media.announced_address
            ));
        }

        check_listen_infos(
            "mediasoup.web_rtc_server_options.listen_infos",
            &media.web_rtc_server_options.listen_infos,
            None,
            &mut errors,
        );
        check_listen_infos(
            "mediasoup.web_rtc_transport.listen_infos",
            &media.web_rtc_transport.listen_infos,
            Some(media.expected_participants),
            &mut errors,
        );

        // 验证日志配置
        self.observability.collect_problems(&mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_listen_infos(
    section: &str,
    endpoints: &[NetworkEndpoint],
    participants: Option<u32>,
    errors: &mut Vec<String>,
) {
    for (i, endpoint) in endpoints.iter().enumerate() {
        let range = endpoint.port_range;
        let result = match participants {
            Some(participants) => range.check_capacity(participants),
            None => range.check_order(),
        };
        if let Err(e) = result {
            errors.push(format!("{section}[{i}] ({}): {e}", endpoint.protocol));
        }

        if endpoint.ip.parse::<IpAddr>().is_err() {
            errors.push(format!(
                "{section}[{i}] has invalid bind ip '{}'",
                endpoint.ip
            ));
        }
        if !endpoint.announced_address.is_empty()
            && endpoint.announced_address.parse::<IpAddr>().is_err()
        {
            errors.push(format!(
                "{section}[{i}] has invalid announced_address '{}'",
                endpoint.announced_address
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PortRange;

    #[test]
    fn test_default_config() {
        let config = RuntimeConfiguration::default();
        assert_eq!(config.server.listen.port, 3010);
        assert_eq!(config.server.listen.ip, "0.0.0.0");
        assert_eq!(config.mediasoup.worker.rtc_min_port, 40000);
        assert_eq!(config.mediasoup.worker.rtc_max_port, 40100);
        assert_eq!(config.mediasoup.expected_participants, 50);
        assert_eq!(config.ui.brand, BrandDocument::builtin());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_keeps_extensions() {
        let mut config = RuntimeConfiguration::default();
        config
            .extensions
            .insert("future_section".to_string(), serde_json::json!({ "x": 1 }));

        let value = config.to_value().unwrap();
        assert_eq!(value["future_section"]["x"], 1);

        let parsed = RuntimeConfiguration::from_value(value).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validate_inverted_listen_info() {
        let mut config = RuntimeConfiguration::default();
        config.mediasoup.web_rtc_server_options.listen_infos = NetworkEndpoint::udp_and_tcp(
            "",
            PortRange {
                min: 40010,
                max: 40000,
            },
        );

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("web_rtc_server_options"));
        assert!(errors[0].contains("inverted"));
    }

    #[test]
    fn test_validate_collects_multiple_problems() {
        let mut config = RuntimeConfiguration::default();
        config.server.listen.port = 0;
        config.server.listen.ip = "not-an-ip".to_string();
        config.mediasoup.num_workers = 0;
        config.mediasoup.announced_address = "nowhere".to_string();
        config.observability.log.output = "syslog".to_string();

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 5);
    }
}
