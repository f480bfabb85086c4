//! 端口范围错误

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortRangeError {
    #[error("port range {min}-{max} is inverted (min > max)")]
    Inverted { min: u16, max: u16 },

    #[error("base port {base} plus {workers} workers exceeds 65535")]
    Overflow { base: u16, workers: usize },

    #[error(
        "port range {min}-{max} holds {available} ports, {required} needed for {participants} participants"
    )]
    InsufficientCapacity {
        min: u16,
        max: u16,
        available: u32,
        required: u32,
        participants: u32,
    },
}
