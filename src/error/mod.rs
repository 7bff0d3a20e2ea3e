//! Error types for chunkstream.

use std::io;
use std::str::Utf8Error;

use thiserror::Error;

/// Errors that can occur while configuring or materializing a stream.
#[derive(Debug, Error)]
pub enum StreamError {
    /// An I/O error reported by a wrapped stream.
    #[error("io error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// The stored bytes are not valid text in the requested encoding.
    #[error("failed to decode body: {source}")]
    Decode {
        /// The decoder error.
        #[from]
        source: Utf8Error,
    },
}

impl StreamError {
    pub(crate) fn invalid_config(message: &'static str) -> Self {
        Self::InvalidConfig { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test");
        let err: StreamError = io_err.into();
        assert!(matches!(err, StreamError::Io { .. }));
    }

    #[test]
    fn test_decode_error_conversion() {
        let bytes = [0xffu8, 0xfe];
        let utf8_err = std::str::from_utf8(&bytes).unwrap_err();
        let err: StreamError = utf8_err.into();
        assert!(err.to_string().starts_with("failed to decode body"));
    }

    #[test]
    fn test_display() {
        let err = StreamError::invalid_config("chunk size must be non-zero");
        assert_eq!(err.to_string(), "invalid config: chunk size must be non-zero");
    }
}
