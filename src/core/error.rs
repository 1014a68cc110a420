//! Infrastructure error types.
//!
//! Rule-level failures (wrong turn owner, missing card, unaffordable cost)
//! are not errors: they are [`Rejection`](super::diagnostics::Rejection)s,
//! reported through the diagnostics hook and otherwise swallowed. This module
//! covers everything that *is* propagated: bad configuration, malformed
//! frames, transport failures.

use thiserror::Error;

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Server error types.
#[derive(Debug, Error)]
pub enum Error {
    /// Match or card configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A frame could not be encoded or decoded.
    #[error("Codec error: {0}")]
    Codec(String),

    /// A frame exceeded the configured maximum size.
    #[error("Frame too large: {size} bytes (max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// The peer for a connection is gone.
    #[error("Connection closed: {0}")]
    ConnectionClosed(String),

    /// The match actor has shut down and no longer accepts events.
    #[error("Match closed")]
    MatchClosed,

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failure while loading configuration or card data.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Codec(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::FrameTooLarge { size: 10, max: 4 };
        assert_eq!(err.to_string(), "Frame too large: 10 bytes (max 4)");

        let err = Error::InvalidConfig("no zones".into());
        assert_eq!(err.to_string(), "Invalid configuration: no zones");
    }

    #[test]
    fn test_json_error_converts() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("nope");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }
}
