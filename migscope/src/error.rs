//! Configuration errors.

use thiserror::Error;

/// Errors detected while building or arming a recorder.
///
/// The clocked model itself never fails; every error here is a misconfiguration.
#[allow(missing_docs)]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("{requested} inputs requested, but a boolean function unit takes at most {max}")]
    TooManyInputs { requested: usize, max: usize },

    #[error("{requested} detector ports requested, but a trigger aggregates at most {max}")]
    TooManyPorts { requested: usize, max: usize },

    #[error("{what} width must be between 1 and 64 bits, got {width}")]
    InvalidWidth { what: &'static str, width: usize },

    #[error("{what} is {actual} bits wide, expected {expected}")]
    WidthMismatch { what: &'static str, expected: usize, actual: usize },

    #[error("detector port {port} is {actual} bits wide, but the trigger value is {expected} bits wide")]
    PortWidthMismatch { port: usize, expected: usize, actual: usize },

    #[error("detector port {port} has a latency of {actual} cycles, but port 0 has {expected}")]
    LatencyMismatch { port: usize, expected: usize, actual: usize },

    #[error("storage depth must be at least 1")]
    ZeroDepth,

    #[error("window offset {offset} exceeds window size {size}")]
    OffsetExceedsSize { offset: usize, size: usize },

    #[error("window size {size} exceeds storage depth {depth}")]
    SizeExceedsDepth { size: usize, depth: usize },
}

impl ConfigurationError {
    /// Checks a data width against the supported range.
    pub fn check_width(what: &'static str, width: usize) -> Result<(), Self> {
        if width == 0 || width > 64 {
            return Err(Self::InvalidWidth { what, width });
        }
        Ok(())
    }

    /// Checks a capture window against the storage depth.
    pub fn check_window(offset: usize, size: usize, depth: usize) -> Result<(), Self> {
        if offset > size {
            return Err(Self::OffsetExceedsSize { offset, size });
        }
        if size > depth {
            return Err(Self::SizeExceedsDepth { size, depth });
        }
        Ok(())
    }
}
