//! 主机环境解析
//!
//! 从主机事实（平台标识、网络接口、环境变量）推导平台相关的默认值。
//! 这里的函数永不失败：任何解析错误都会记录日志并回落到文档化的默认值。

use crate::error::EnvironmentResolutionError;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::str::FromStr;
use strum::EnumString;
use tracing::{debug, warn};

/// 监听端口覆盖使用的环境变量
pub const PORT_ENV_VAR: &str = "PORT";

/// 没有合格 IPv4 地址时返回的哨兵地址
pub const UNSPECIFIED_IPV4: Ipv4Addr = Ipv4Addr::UNSPECIFIED;

/// 未识别平台使用的 ffmpeg 路径（CentOS 及其他 Linux 发行版）
pub const DEFAULT_EXECUTABLE_PATH: &str = "/usr/bin/ffmpeg";

/// 主机平台标识
///
/// 取值沿用 `darwin` / `linux` / `win32` 这组标识，其余标识原样保存在 `Other` 中。
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString)]
pub enum Platform {
    #[strum(serialize = "darwin")]
    Darwin,
    #[strum(serialize = "linux")]
    Linux,
    #[strum(serialize = "win32")]
    Win32,
    #[strum(default)]
    Other(String),
}

impl Platform {
    /// 解析平台标识，未知标识得到 `Platform::Other`
    pub fn from_id(id: &str) -> Self {
        Platform::from_str(id).unwrap_or_else(|_| Platform::Other(id.to_string()))
    }

    /// 当前编译目标对应的平台
    pub fn current() -> Self {
        match std::env::consts::OS {
            "macos" => Platform::Darwin,
            "windows" => Platform::Win32,
            other => Platform::from_id(other),
        }
    }

    /// 平台标识字符串
    pub fn id(&self) -> &str {
        match self {
            Platform::Darwin => "darwin",
            Platform::Linux => "linux",
            Platform::Win32 => "win32",
            Platform::Other(id) => id,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// 平台对应的 ffmpeg 安装路径
pub fn resolve_executable_path(platform: &Platform) -> PathBuf {
    let path = match platform {
        Platform::Darwin => "/usr/local/bin/ffmpeg",
        Platform::Linux => "/usr/bin/ffmpeg",
        Platform::Win32 => "C:\\ffmpeg\\bin\\ffmpeg.exe",
        Platform::Other(_) => DEFAULT_EXECUTABLE_PATH,
    };
    PathBuf::from(path)
}

/// 从接口列表中挑选第一个非回环 IPv4 地址
///
/// 接口顺序即枚举顺序；没有合格地址时返回 `0.0.0.0`。
pub fn primary_ipv4_from<I, N>(interfaces: I) -> Ipv4Addr
where
    I: IntoIterator<Item = (N, IpAddr)>,
{
    interfaces
        .into_iter()
        .find_map(|(_, ip)| match ip {
            IpAddr::V4(v4) if !v4.is_loopback() && !v4.is_unspecified() => Some(v4),
            _ => None,
        })
        .unwrap_or(UNSPECIFIED_IPV4)
}

/// 主机的主出口 IPv4 地址
///
/// 枚举失败视为没有合格地址，返回 `0.0.0.0`。
pub fn resolve_primary_ipv4() -> Ipv4Addr {
    match local_ip_address::list_afinet_netifas() {
        Ok(interfaces) => {
            let ip = primary_ipv4_from(interfaces);
            debug!("Primary IPv4 resolved: {}", ip);
            ip
        }
        Err(e) => {
            let err = EnvironmentResolutionError::InterfaceEnumeration {
                message: e.to_string(),
            };
            warn!("{}, falling back to {}", err, UNSPECIFIED_IPV4);
            UNSPECIFIED_IPV4
        }
    }
}

/// 解析监听端口覆盖值
///
/// 空值返回 `Ok(None)`；非数字或 0 返回错误。
pub fn parse_port_override(
    raw: Option<&str>,
) -> Result<Option<u16>, EnvironmentResolutionError> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    match raw.parse::<u16>() {
        Ok(port) if port != 0 => Ok(Some(port)),
        _ => Err(EnvironmentResolutionError::InvalidPortOverride {
            var: PORT_ENV_VAR.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// 读取 `PORT` 环境变量作为监听端口覆盖
pub fn listen_port_override() -> Option<u16> {
    let raw = std::env::var(PORT_ENV_VAR).ok();
    parse_port_override(raw.as_deref()).unwrap_or_else(|e| {
        warn!("{}, ignoring override", e);
        None
    })
}

/// 主机事实快照
///
/// 配置装配时作为环境层的输入。测试中可直接构造。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnvironment {
    pub platform: Platform,
    pub primary_ipv4: Ipv4Addr,
    pub num_workers: usize,
    pub listen_port: Option<u16>,
}

impl HostEnvironment {
    /// 探测当前主机
    pub fn detect() -> Self {
        let host = Self {
            platform: Platform::current(),
            primary_ipv4: resolve_primary_ipv4(),
            num_workers: num_cpus::get().max(1),
            listen_port: listen_port_override(),
        };
        debug!(
            "Host environment: platform={}, ipv4={}, workers={}, port_override={:?}",
            host.platform, host.primary_ipv4, host.num_workers, host.listen_port
        );
        host
    }

    /// 当前平台的 ffmpeg 路径
    pub fn executable_path(&self) -> PathBuf {
        resolve_executable_path(&self.platform)
    }
}
