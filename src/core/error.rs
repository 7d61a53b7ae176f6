//! Error types for the timber engine

use thiserror::Error;

use crate::core::types::BlockPos;

/// Main error type for the engine
///
/// Every variant is local to a single chop attempt or a config reload;
/// none of them should ever take the host down.
#[derive(Debug, Error)]
pub enum Error {
    #[error("tree too large: {size} blocks (max {max})")]
    RegionTooLarge { size: usize, max: usize },

    #[error("protection denied at {pos:?}")]
    ProtectionDenied { pos: BlockPos },

    #[error("host removal failed at {pos:?}")]
    HostRemovalFailed { pos: BlockPos },

    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
