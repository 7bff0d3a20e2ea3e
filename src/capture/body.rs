//! Body sinks for captured exchanges.

use std::io::{self, Seek, SeekFrom, Write};
use std::sync::Arc;

use super::CaptureLevel;
use crate::config::StreamConfig;
use crate::error::StreamError;
use crate::io::{LengthCountingStream, SetLength};
use crate::pool::ChunkPool;
use crate::stream::ChunkedStream;

/// Where a sniffed body ends up.
#[derive(Debug)]
pub enum CaptureBody {
    /// The full body, kept in pooled chunks.
    Stored(ChunkedStream),
    /// Only the size of the body.
    Counted(LengthCountingStream),
}

impl CaptureBody {
    /// Creates the sink matching `level`, or `None` when capture is off.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidConfig`] if bodies are stored and
    /// `config` is invalid.
    pub fn for_level(
        level: CaptureLevel,
        pool: &Arc<dyn ChunkPool>,
        config: &StreamConfig,
    ) -> Result<Option<Self>, StreamError> {
        let body = match level {
            CaptureLevel::Off => None,
            CaptureLevel::Summary => Some(CaptureBody::Counted(LengthCountingStream::new())),
            CaptureLevel::Full => Some(CaptureBody::Stored(ChunkedStream::with_config(
                Arc::clone(pool),
                *config,
            )?)),
        };
        Ok(body)
    }

    /// Returns the captured length in bytes.
    pub fn len(&self) -> u64 {
        match self {
            CaptureBody::Stored(stream) => stream.len() as u64,
            CaptureBody::Counted(counter) => counter.len(),
        }
    }

    /// Returns true if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the stored body, if bodies are being stored.
    pub fn stored(&self) -> Option<&ChunkedStream> {
        match self {
            CaptureBody::Stored(stream) => Some(stream),
            CaptureBody::Counted(_) => None,
        }
    }
}

impl Write for CaptureBody {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            CaptureBody::Stored(stream) => stream.write(buf),
            CaptureBody::Counted(counter) => counter.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for CaptureBody {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            CaptureBody::Stored(stream) => stream.seek(pos),
            CaptureBody::Counted(counter) => counter.seek(pos),
        }
    }
}

impl SetLength for CaptureBody {
    fn set_length(&mut self, len: u64) -> io::Result<()> {
        match self {
            CaptureBody::Stored(stream) => stream.set_length(len),
            CaptureBody::Counted(counter) => counter.set_length(len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::HeapPool;

    fn pool() -> Arc<dyn ChunkPool> {
        Arc::new(HeapPool)
    }

    #[test]
    fn test_off_has_no_sink() {
        let body = CaptureBody::for_level(CaptureLevel::Off, &pool(), &StreamConfig::default());
        assert!(body.unwrap().is_none());
    }

    #[test]
    fn test_summary_counts() {
        let mut body =
            CaptureBody::for_level(CaptureLevel::Summary, &pool(), &StreamConfig::default())
                .unwrap()
                .unwrap();
        body.write_all(&[1u8; 600]).unwrap();
        assert_eq!(body.len(), 600);
        assert!(body.stored().is_none());
    }

    #[test]
    fn test_full_stores() {
        let config = StreamConfig::new(16).unwrap();
        let mut body = CaptureBody::for_level(CaptureLevel::Full, &pool(), &config)
            .unwrap()
            .unwrap();
        body.write_all(b"{\"id\":1}").unwrap();

        let stream = body.stored().unwrap();
        assert_eq!(stream.chunk_size(), 16);
        assert_eq!(stream.to_vec(), b"{\"id\":1}");
    }

    #[test]
    fn test_full_rejects_zero_chunk_size() {
        let config = StreamConfig::default().with_chunk_size(0);
        let err = CaptureBody::for_level(CaptureLevel::Full, &pool(), &config).unwrap_err();
        assert!(matches!(err, StreamError::InvalidConfig { .. }));
    }
}
