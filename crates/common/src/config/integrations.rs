//! 集成与安全相关配置段
//!
//! 这些配置只做结构性装配，真正消费它们的适配器（邮件、聊天机器人、统计等）不在本项目内。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// 控制台日志显示选项
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ConsoleConfig {
    /// IANA 时区标识，例如 "Europe/Rome"
    pub time_zone: String,
    pub debug: bool,
    pub colors: bool,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            time_zone: "UTC".to_string(),
            debug: true,
            colors: true,
            extensions: Map::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct MiddlewareConfig {
    pub ip_whitelist: IpWhitelistConfig,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            ip_whitelist: IpWhitelistConfig {
                enabled: false,
                allowed: vec!["127.0.0.1".to_string(), "::1".to_string()],
                extensions: Map::new(),
            },
            extensions: Map::new(),
        }
    }
}

/// IP 白名单
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct IpWhitelistConfig {
    pub enabled: bool,
    pub allowed: Vec<String>,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

/// REST API 配置
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    pub key_secret: String,
    pub allowed: ApiAllowed,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key_secret: "sfukit_default_secret".to_string(),
            allowed: ApiAllowed::default(),
            extensions: Map::new(),
        }
    }
}

/// 各 API 端点开关
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ApiAllowed {
    pub stats: bool,
    pub meetings: bool,
    pub meeting: bool,
    pub join: bool,
    pub token: bool,
    pub slack: bool,
    pub mattermost: bool,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Default for ApiAllowed {
    fn default() -> Self {
        Self {
            stats: true,
            meetings: false,
            meeting: true,
            join: true,
            token: false,
            slack: true,
            mattermost: true,
            extensions: Map::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct JwtConfig {
    pub key: String,
    /// 过期时间，例如 "1h"
    pub exp: String,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            key: "sfukit_jwt_secret".to_string(),
            exp: "1h".to_string(),
            extensions: Map::new(),
        }
    }
}

/// 主持人列表
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PresentersConfig {
    pub list: Vec<String>,
    /// true：第一个加入的参与者成为主持人
    pub join_first: bool,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Default for PresentersConfig {
    fn default() -> Self {
        Self {
            list: Vec::new(),
            join_first: true,
            extensions: Map::new(),
        }
    }
}

/// 统计脚本（Umami）
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct StatsConfig {
    pub enabled: bool,
    pub src: String,
    pub id: String,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

/// 单个集成的开关及其自由格式设置
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct IntegrationToggle {
    #[serde(default)]
    pub enabled: bool,
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

impl IntegrationToggle {
    fn disabled() -> Self {
        Self::default()
    }

    pub fn setting_str(&self, key: &str) -> Option<&str> {
        self.settings.get(key).and_then(Value::as_str)
    }
}

/// 已知的集成名称
pub const KNOWN_INTEGRATIONS: &[&str] = &[
    "oidc",
    "email",
    "ngrok",
    "sentry",
    "webhook",
    "slack",
    "discord",
    "mattermost",
    "chatgpt",
    "video_ai",
    "ip_lookup",
    "survey",
    "redirect",
];

/// 集成开关集合（名称 -> 开关）
///
/// 默认包含所有已知集成且全部关闭；覆盖层可以加入任意新名称。
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(transparent)]
pub struct IntegrationsConfig(pub BTreeMap<String, IntegrationToggle>);

impl Default for IntegrationsConfig {
    fn default() -> Self {
        Self(
            KNOWN_INTEGRATIONS
                .iter()
                .map(|name| (name.to_string(), IntegrationToggle::disabled()))
                .collect(),
        )
    }
}

impl IntegrationsConfig {
    pub fn get(&self, name: &str) -> Option<&IntegrationToggle> {
        self.0.get(name)
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.get(name).is_some_and(|toggle| toggle.enabled)
    }

    /// 所有已启用集成的名称
    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, toggle)| toggle.enabled)
            .map(|(name, _)| name.as_str())
    }
}
