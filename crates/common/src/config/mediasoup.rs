//! mediasoup 媒体层配置
//!
//! worker 端口、编解码器列表以及 WebRtcServer / WebRtcTransport 的监听信息。
//! 这些值在媒体子系统启动时绑定，修改后必须重启进程。

use crate::ports::{
    DEFAULT_EXPECTED_PARTICIPANTS, DEFAULT_RTC_MAX_PORT, DEFAULT_RTC_MIN_PORT, PortRange,
    compute_server_port_range, compute_transport_port_range,
};
use crate::error::PortRangeError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// 传输协议
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Udp,
    Tcp,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Udp => f.write_str("udp"),
            Protocol::Tcp => f.write_str("tcp"),
        }
    }
}

/// 网络监听端点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkEndpoint {
    pub protocol: Protocol,
    /// 绑定地址
    pub ip: String,
    /// 对外宣告地址（NAT 之后的公网地址）
    #[serde(default)]
    pub announced_address: String,
    pub port_range: PortRange,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl NetworkEndpoint {
    /// 为 udp 和 tcp 各生成一个绑定 `0.0.0.0` 的端点
    pub fn udp_and_tcp(announced_address: &str, port_range: PortRange) -> Vec<Self> {
        [Protocol::Udp, Protocol::Tcp]
            .into_iter()
            .map(|protocol| Self {
                protocol,
                ip: "0.0.0.0".to_string(),
                announced_address: announced_address.to_string(),
                port_range,
                extensions: Map::new(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

/// RTP 编解码器能力
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaCodec {
    pub kind: MediaKind,
    pub mime_type: String,
    pub clock_rate: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u8>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl MediaCodec {
    fn video(mime_type: &str, parameters: Value) -> Self {
        let parameters = match parameters {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            kind: MediaKind::Video,
            mime_type: mime_type.to_string(),
            clock_rate: 90000,
            channels: None,
            parameters,
            extensions: Map::new(),
        }
    }
}

fn default_media_codecs() -> Vec<MediaCodec> {
    vec![
        MediaCodec {
            kind: MediaKind::Audio,
            mime_type: "audio/opus".to_string(),
            clock_rate: 48000,
            channels: Some(2),
            parameters: Map::new(),
            extensions: Map::new(),
        },
        MediaCodec::video("video/VP8", json!({ "x-google-start-bitrate": 1000 })),
        MediaCodec::video(
            "video/VP9",
            json!({ "profile-id": 0, "x-google-start-bitrate": 1000 }),
        ),
        MediaCodec::video(
            "video/VP9",
            json!({ "profile-id": 2, "x-google-start-bitrate": 1000 }),
        ),
        MediaCodec::video(
            "video/h264",
            json!({
                "packetization-mode": 1,
                "profile-level-id": "42e01f",
                "level-asymmetry-allowed": 1,
                "x-google-start-bitrate": 1000
            }),
        ),
        MediaCodec::video(
            "video/h264",
            json!({
                "packetization-mode": 1,
                "profile-level-id": "4d0032",
                "level-asymmetry-allowed": 1,
                "x-google-start-bitrate": 1000
            }),
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub rtc_min_port: u16,
    pub rtc_max_port: u16,
    pub disable_liburing: bool,
    pub log_level: String,
    pub log_tags: Vec<String>,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            rtc_min_port: DEFAULT_RTC_MIN_PORT,
            rtc_max_port: DEFAULT_RTC_MAX_PORT,
            disable_liburing: false,
            log_level: "error".to_string(),
            log_tags: [
                "info", "ice", "dtls", "rtp", "srtp", "rtcp", "rtx", "bwe", "score", "simulcast",
                "svc", "sctp",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            extensions: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub audio_level_observer_enabled: bool,
    pub active_speaker_observer_enabled: bool,
    pub media_codecs: Vec<MediaCodec>,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            audio_level_observer_enabled: true,
            active_speaker_observer_enabled: false,
            media_codecs: default_media_codecs(),
            extensions: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebRtcServerOptions {
    /// 为空时由装配器按 worker 数量推导
    pub listen_infos: Vec<NetworkEndpoint>,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebRtcTransportConfig {
    /// 为空时由装配器按 worker 端口范围推导
    pub listen_infos: Vec<NetworkEndpoint>,
    pub initial_available_outgoing_bitrate: u64,
    pub minimum_available_outgoing_bitrate: u64,
    pub max_sctp_message_size: u64,
    pub max_incoming_bitrate: u64,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Default for WebRtcTransportConfig {
    fn default() -> Self {
        Self {
            listen_infos: Vec::new(),
            initial_available_outgoing_bitrate: 1_000_000,
            minimum_available_outgoing_bitrate: 600_000,
            max_sctp_message_size: 262_144,
            max_incoming_bitrate: 1_500_000,
            extensions: Map::new(),
        }
    }
}

/// mediasoup 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediasoupConfig {
    /// worker 数量，环境层填充为 CPU 核数
    pub num_workers: usize,

    /// 预期并发参与者数量，用于校验传输端口范围容量
    pub expected_participants: u32,

    /// 对外宣告地址，环境层填充为主机主 IPv4
    pub announced_address: String,

    pub worker: WorkerConfig,

    pub router: RouterConfig,

    /// 启用 WebRtcServer 模式（所有 transport 共享 worker 端口）
    pub web_rtc_server_active: bool,

    pub web_rtc_server_options: WebRtcServerOptions,

    pub web_rtc_transport: WebRtcTransportConfig,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Default for MediasoupConfig {
    fn default() -> Self {
        Self {
            num_workers: 1,
            expected_participants: DEFAULT_EXPECTED_PARTICIPANTS,
            announced_address: String::new(),
            worker: WorkerConfig::default(),
            router: RouterConfig::default(),
            web_rtc_server_active: false,
            web_rtc_server_options: WebRtcServerOptions::default(),
            web_rtc_transport: WebRtcTransportConfig::default(),
            extensions: Map::new(),
        }
    }
}

impl MediasoupConfig {
    /// 补全未显式配置的监听信息
    ///
    /// WebRtcServer 使用 `{rtc_min_port, rtc_min_port + num_workers}`，
    /// WebRtcTransport 使用 `{rtc_min_port, rtc_max_port}`。
    pub fn derive_listen_infos(&mut self) -> Result<(), PortRangeError> {
        if self.web_rtc_server_options.listen_infos.is_empty() {
            let range = compute_server_port_range(self.worker.rtc_min_port, self.num_workers)?;
            self.web_rtc_server_options.listen_infos =
                NetworkEndpoint::udp_and_tcp(&self.announced_address, range);
        }

        if self.web_rtc_transport.listen_infos.is_empty() {
            let range = compute_transport_port_range(
                self.worker.rtc_min_port,
                self.worker.rtc_max_port,
                self.expected_participants,
            )?;
            self.web_rtc_transport.listen_infos =
                NetworkEndpoint::udp_and_tcp(&self.announced_address, range);
        }

        Ok(())
    }

    /// worker 的 RTC 端口范围（未校验顺序）
    pub fn worker_port_range(&self) -> PortRange {
        PortRange {
            min: self.worker.rtc_min_port,
            max: self.worker.rtc_max_port,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_codecs() {
        let codecs = RouterConfig::default().media_codecs;
        assert_eq!(codecs.len(), 6);
        assert_eq!(codecs[0].mime_type, "audio/opus");
        assert_eq!(codecs[0].channels, Some(2));
        assert_eq!(codecs[3].parameters["profile-id"], 2);
        assert_eq!(codecs[5].parameters["profile-level-id"], "4d0032");
    }

    #[test]
    fn test_derive_listen_infos() {
        let mut config = MediasoupConfig {
            num_workers: 4,
            announced_address: "203.0.113.7".to_string(),
            ..Default::default()
        };
        config.derive_listen_infos().unwrap();

        let server = &config.web_rtc_server_options.listen_infos;
        assert_eq!(server.len(), 2);
        assert_eq!(server[0].protocol, Protocol::Udp);
        assert_eq!(server[1].protocol, Protocol::Tcp);
        assert_eq!(server[0].port_range, PortRange { min: 40000, max: 40004 });
        assert_eq!(server[0].announced_address, "203.0.113.7");

        let transport = &config.web_rtc_transport.listen_infos;
        assert_eq!(transport[1].port_range, PortRange { min: 40000, max: 40100 });
        assert_eq!(transport[1].ip, "0.0.0.0");
    }

    #[test]
    fn test_derive_keeps_explicit_listen_infos() {
        let explicit = NetworkEndpoint {
            protocol: Protocol::Udp,
            ip: "10.0.0.1".to_string(),
            announced_address: String::new(),
            port_range: PortRange { min: 50000, max: 50200 },
            extensions: Map::new(),
        };
        let mut config = MediasoupConfig::default();
        config.web_rtc_transport.listen_infos = vec![explicit.clone()];
        config.derive_listen_infos().unwrap();
        assert_eq!(config.web_rtc_transport.listen_infos, vec![explicit]);
    }

    #[test]
    fn test_derive_rejects_small_transport_range() {
        let mut config = MediasoupConfig::default();
        config.worker.rtc_max_port = 40010;
        assert!(matches!(
            config.derive_listen_infos(),
            Err(PortRangeError::InsufficientCapacity { .. })
        ));
    }
}
