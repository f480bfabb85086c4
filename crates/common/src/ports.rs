//! 端口范围分配
//!
//! 为 mediasoup worker 池（WebRtcServer）和每连接传输（WebRtcTransport）计算端口范围。
//! 这里全部是纯函数，可以重复或并发调用。

use crate::error::PortRangeError;
use serde::{Deserialize, Serialize};

/// 默认 RTC 起始端口
pub const DEFAULT_RTC_MIN_PORT: u16 = 40000;

/// 默认 RTC 结束端口
pub const DEFAULT_RTC_MAX_PORT: u16 = 40100;

/// 默认预期并发参与者数量
///
/// 每个参与者占用两个端口（音频 + 视频），默认范围 40000-40100 可支撑 50 人。
pub const DEFAULT_EXPECTED_PARTICIPANTS: u32 = 50;

/// 每个参与者需要的端口数
pub const PORTS_PER_PARTICIPANT: u32 = 2;

/// 闭区间端口范围 `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRange {
    pub min: u16,
    pub max: u16,
}

impl PortRange {
    /// 创建端口范围，要求 `min <= max`
    pub fn new(min: u16, max: u16) -> Result<Self, PortRangeError> {
        let range = Self { min, max };
        range.check_order()?;
        Ok(range)
    }

    /// 范围内的端口数量（`max - min + 1`），倒置范围返回 0
    pub fn len(&self) -> u32 {
        if self.min > self.max {
            0
        } else {
            u32::from(self.max) - u32::from(self.min) + 1
        }
    }

    pub fn contains(&self, port: u16) -> bool {
        self.min <= port && port <= self.max
    }

    /// 检查 `min <= max`
    pub fn check_order(&self) -> Result<(), PortRangeError> {
        if self.min > self.max {
            return Err(PortRangeError::Inverted {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// 检查范围能否容纳 `participants` 个参与者（每人两个端口）
    pub fn check_capacity(&self, participants: u32) -> Result<(), PortRangeError> {
        self.check_order()?;
        let required = participants.saturating_mul(PORTS_PER_PARTICIPANT);
        let available = self.len();
        if available < required {
            return Err(PortRangeError::InsufficientCapacity {
                min: self.min,
                max: self.max,
                available,
                required,
                participants,
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for PortRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// WebRtcServer 的端口范围：`{base_port, base_port + worker_count}`
///
/// 每个 worker 在基准端口之上至少保留一个端口。
pub fn compute_server_port_range(
    base_port: u16,
    worker_count: usize,
) -> Result<PortRange, PortRangeError> {
    let overflow = PortRangeError::Overflow {
        base: base_port,
        workers: worker_count,
    };
    let workers = u16::try_from(worker_count).map_err(|_| overflow.clone())?;
    let max = base_port.checked_add(workers).ok_or(overflow)?;
    Ok(PortRange {
        min: base_port,
        max,
    })
}

/// WebRtcTransport 的端口范围：原样返回静态边界
///
/// 同时校验容量假设 `max - min + 1 >= 2 * expected_participants`。
pub fn compute_transport_port_range(
    base_port: u16,
    max_port: u16,
    expected_participants: u32,
) -> Result<PortRange, PortRangeError> {
    let range = PortRange {
        min: base_port,
        max: max_port,
    };
    range.check_capacity(expected_participants)?;
    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_port_range() {
        let range = compute_server_port_range(40000, 4).unwrap();
        assert_eq!(range, PortRange { min: 40000, max: 40004 });
        assert_eq!(range.len(), 5);
    }

    #[test]
    fn test_server_port_range_zero_workers() {
        let range = compute_server_port_range(40000, 0).unwrap();
        assert_eq!(range.min, range.max);
    }

    #[test]
    fn test_server_port_range_overflow() {
        let err = compute_server_port_range(65530, 10).unwrap_err();
        assert!(matches!(err, PortRangeError::Overflow { base: 65530, workers: 10 }));

        let err = compute_server_port_range(1, usize::MAX).unwrap_err();
        assert!(matches!(err, PortRangeError::Overflow { .. }));
    }

    #[test]
    fn test_transport_port_range_default_capacity() {
        let range = compute_transport_port_range(
            DEFAULT_RTC_MIN_PORT,
            DEFAULT_RTC_MAX_PORT,
            DEFAULT_EXPECTED_PARTICIPANTS,
        )
        .unwrap();
        assert_eq!(range, PortRange { min: 40000, max: 40100 });
        assert_eq!(range.len(), 101);
        assert!(range.len() >= 2 * DEFAULT_EXPECTED_PARTICIPANTS);
    }

    #[test]
    fn test_transport_port_range_too_small() {
        let err = compute_transport_port_range(40000, 40098, 50).unwrap_err();
        assert_eq!(
            err,
            PortRangeError::InsufficientCapacity {
                min: 40000,
                max: 40098,
                available: 99,
                required: 100,
                participants: 50,
            }
        );
    }

    #[test]
    fn test_transport_port_range_inverted() {
        let err = compute_transport_port_range(40100, 40000, 1).unwrap_err();
        assert!(matches!(err, PortRangeError::Inverted { .. }));
    }

    #[test]
    fn test_port_range_helpers() {
        assert!(PortRange::new(10, 5).is_err());
        let range = PortRange::new(10, 20).unwrap();
        assert!(range.contains(10));
        assert!(range.contains(20));
        assert!(!range.contains(21));
        assert_eq!(range.to_string(), "10-20");
    }
}
