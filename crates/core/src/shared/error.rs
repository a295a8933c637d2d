use thiserror::Error;

/// Errors raised by the simulation core.
///
/// Configuration errors are raised while building profiles or settings,
/// never from inside the per-frame path. Frame errors are local to a single
/// frame; callers drop the frame and move on.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("unknown severity level: {0}")]
    UnknownSeverity(String),
    #[error("invalid {axis} kernel size {size} for {level} (must be a positive odd integer)")]
    InvalidKernelSize {
        level: String,
        axis: &'static str,
        size: i64,
    },
    #[error("invalid opacity {opacity} for {level} (must be within 0.0-1.0)")]
    InvalidOpacity { level: String, opacity: f64 },
    #[error("split position must be between 0 and 100, got {0}")]
    InvalidSplitPosition(u32),
    #[error("unsupported frame layout: expected 3 channels, got {channels}")]
    UnsupportedFrame { channels: u8 },
    #[error("frame shape changed from {expected:?} to {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("configuration error: {0}")]
    Config(String),
}
