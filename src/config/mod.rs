//! Configuration for chunked streams and body capture.
//!
//! - [`StreamConfig`] - Chunk size used by a [`ChunkedStream`](crate::ChunkedStream)
//! - [`CaptureConfig`] - Chunk size and capture level used when recording exchanges
//!
//! # Example
//!
//! ```
//! use chunkstream::{CaptureConfig, CaptureLevel, StreamConfig};
//!
//! let config = StreamConfig::new(4096)?;
//! assert_eq!(config.chunk_size(), 4096);
//!
//! let capture = CaptureConfig::default()
//!     .with_stream_config(config)
//!     .with_level(CaptureLevel::Full);
//! assert_eq!(capture.level(), Some(CaptureLevel::Full));
//! # Ok::<(), chunkstream::StreamError>(())
//! ```

use crate::capture::CaptureLevel;
use crate::error::StreamError;

/// Default chunk size (256 bytes), sized for typical API request bodies.
pub const DEFAULT_CHUNK_SIZE: usize = 256;

/// Configuration for a chunked stream.
///
/// The only knob is the chunk size: every chunk leased from the pool is
/// exactly this many bytes long as far as the stream is concerned. Small
/// chunks waste less memory on short bodies, large chunks mean fewer pool
/// round-trips on long ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamConfig {
    chunk_size: usize,
}

impl StreamConfig {
    /// Creates a new configuration with the given chunk size.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidConfig`] if `chunk_size` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use chunkstream::StreamConfig;
    ///
    /// assert!(StreamConfig::new(16).is_ok());
    /// assert!(StreamConfig::new(0).is_err());
    /// ```
    pub fn new(chunk_size: usize) -> Result<Self, StreamError> {
        if chunk_size == 0 {
            return Err(StreamError::invalid_config("chunk size must be non-zero"));
        }

        Ok(Self { chunk_size })
    }

    /// Sets the chunk size.
    ///
    /// Note: This does not validate the configuration. Use [`StreamConfig::validate`]
    /// to check if the configuration is valid.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Returns the chunk size.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), StreamError> {
        Self::new(self.chunk_size).map(|_| ())
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Configuration for capturing request/response exchanges.
///
/// When no level is set, the level is derived from the active `tracing`
/// subscriber each time a capture begins (see [`CaptureLevel::from_tracing`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CaptureConfig {
    stream: StreamConfig,
    level: Option<CaptureLevel>,
}

impl CaptureConfig {
    /// Sets the stream configuration used for stored bodies.
    pub fn with_stream_config(mut self, stream: StreamConfig) -> Self {
        self.stream = stream;
        self
    }

    /// Pins the capture level instead of deriving it from `tracing`.
    pub fn with_level(mut self, level: CaptureLevel) -> Self {
        self.level = Some(level);
        self
    }

    /// Returns the stream configuration.
    pub fn stream_config(&self) -> &StreamConfig {
        &self.stream
    }

    /// Returns the pinned capture level, if any.
    pub fn level(&self) -> Option<CaptureLevel> {
        self.level
    }

    /// Returns the level to use for the next capture.
    pub fn effective_level(&self) -> CaptureLevel {
        self.level.unwrap_or_else(CaptureLevel::from_tracing)
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), StreamError> {
        self.stream.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chunk_size() {
        assert_eq!(StreamConfig::default().chunk_size(), DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let err = StreamConfig::new(0).unwrap_err();
        assert!(matches!(err, StreamError::InvalidConfig { .. }));
    }

    #[test]
    fn test_builder_does_not_validate() {
        let config = StreamConfig::default().with_chunk_size(0);
        assert_eq!(config.chunk_size(), 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_capture_config_pinned_level() {
        let config = CaptureConfig::default().with_level(CaptureLevel::Summary);
        assert_eq!(config.effective_level(), CaptureLevel::Summary);
    }

    #[test]
    fn test_capture_config_validates_stream() {
        let config =
            CaptureConfig::default().with_stream_config(StreamConfig::default().with_chunk_size(0));
        assert!(config.validate().is_err());
    }
}
