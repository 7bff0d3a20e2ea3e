//! How much of an exchange to capture.

use tracing::Level;

/// Fidelity of a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CaptureLevel {
    /// Nothing is captured; traffic passes through untouched.
    Off,
    /// Request line, status and body sizes. Bodies are counted, not stored.
    Summary,
    /// Everything including headers and bodies. Bodies are stored in
    /// chunked streams.
    Full,
}

impl CaptureLevel {
    /// Derives the level from the current `tracing` subscriber.
    ///
    /// `DEBUG` enabled means [`CaptureLevel::Full`], `INFO` enabled means
    /// [`CaptureLevel::Summary`], anything quieter means
    /// [`CaptureLevel::Off`].
    pub fn from_tracing() -> Self {
        if tracing::enabled!(Level::DEBUG) {
            CaptureLevel::Full
        } else if tracing::enabled!(Level::INFO) {
            CaptureLevel::Summary
        } else {
            CaptureLevel::Off
        }
    }

    /// Returns true if bodies are stored rather than counted.
    pub fn stores_bodies(&self) -> bool {
        *self == CaptureLevel::Full
    }
}
