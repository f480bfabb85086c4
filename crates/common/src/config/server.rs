use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 默认 HTTP 监听端口
pub const DEFAULT_LISTEN_PORT: u16 = 3010;

/// HTTP 服务配置
///
/// 监听地址、CORS 策略和录制/RTMP 开关。实际的 HTTP 层不在本项目范围内，
/// 这里只负责把它们装配成只读配置。
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// 对外访问地址，留空时为 `http://localhost:<port>`
    pub host_url: String,

    pub listen: ListenConfig,

    /// 是否信任代理头（X-Forwarded-For 等）
    pub trust_proxy: bool,

    pub ssl: SslConfig,

    pub cors: CorsConfig,

    pub recording: RecordingConfig,

    pub rtmp: RtmpConfig,

    /// 未识别的键，原样保留
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host_url: String::new(),
            listen: ListenConfig::default(),
            trust_proxy: false,
            ssl: SslConfig::default(),
            cors: CorsConfig::default(),
            recording: RecordingConfig::default(),
            rtmp: RtmpConfig::default(),
            extensions: Map::new(),
        }
    }
}

impl ServerConfig {
    /// 实际对外地址
    pub fn effective_host_url(&self) -> String {
        if self.host_url.trim().is_empty() {
            format!("http://localhost:{}", self.listen.port)
        } else {
            self.host_url.clone()
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ListenConfig {
    pub ip: String,
    /// 可被 `PORT` 环境变量覆盖
    pub port: u16,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            ip: "0.0.0.0".to_string(),
            port: DEFAULT_LISTEN_PORT,
            extensions: Map::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SslConfig {
    pub cert: String,
    pub key: String,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Default for SslConfig {
    fn default() -> Self {
        Self {
            cert: "../ssl/cert.pem".to_string(),
            key: "../ssl/key.pem".to_string(),
            extensions: Map::new(),
        }
    }
}

/// CORS 策略
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CorsConfig {
    /// 允许的来源；`["*"]` 表示全部
    pub origin: Vec<String>,
    pub methods: Vec<String>,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origin: vec!["*".to_string()],
            methods: vec!["GET".to_string(), "POST".to_string()],
            extensions: Map::new(),
        }
    }
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.origin.is_empty() || self.origin.iter().any(|o| o == "*")
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RecordingConfig {
    pub enabled: bool,
    /// 远程保存地址，留空则保存到本地 `dir`
    pub endpoint: String,
    pub dir: String,
    /// 单个录制文件上限（字节）
    pub max_file_size: u64,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            dir: "rec".to_string(),
            max_file_size: 1024 * 1024 * 1024,
            extensions: Map::new(),
        }
    }
}

/// RTMP 推流配置
///
/// `ffmpeg_path` 和 `platform` 由环境层按主机平台填充。
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RtmpConfig {
    pub enabled: bool,
    pub from_file: bool,
    pub from_url: bool,
    pub from_stream: bool,
    pub max_streams: u32,
    pub server: String,
    pub app_name: String,
    pub stream_key: String,
    pub secret: String,
    pub api_secret: String,
    pub expiration_hours: u32,
    pub dir: String,
    pub ffmpeg_path: String,
    pub platform: String,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Default for RtmpConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            from_file: true,
            from_url: true,
            from_stream: true,
            max_streams: 1,
            server: "rtmp://localhost:1935".to_string(),
            app_name: "sfukit".to_string(),
            stream_key: String::new(),
            secret: "sfukitRtmpSecret".to_string(),
            api_secret: "sfukitRtmpApiSecret".to_string(),
            expiration_hours: 4,
            dir: "rtmp".to_string(),
            ffmpeg_path: crate::environment::DEFAULT_EXECUTABLE_PATH.to_string(),
            platform: String::new(),
            extensions: Map::new(),
        }
    }
}
