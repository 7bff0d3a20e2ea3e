//! chunkstream
//!
//! Seekable in-memory byte streams backed by pooled fixed-size chunks.
//!
//! `chunkstream` is built for capturing HTTP request and response bodies of
//! unknown size without growing one contiguous buffer per request. A
//! [`ChunkedStream`] leases fixed-size chunks from a shared [`ChunkPool`] as it
//! grows and hands them back when it shrinks or is dropped. Reads, writes and
//! seeks behave like a `Cursor<Vec<u8>>`.
//!
//! Around the stream the crate provides:
//!
//! - [`SnifferStream`] - tees a body into a sink while it is being read or written
//! - [`LengthCountingStream`] - a sink that only counts bytes
//! - [`mask`] / [`fnv1a`] - hiding credentials in logs
//! - [`Capture`] - records an exchange and logs it through `tracing`
//!
//! The crate intentionally:
//! - does NOT synchronize access to a single stream
//! - does NOT persist anything
//! - does NOT compress
//!
//! # Sync
//!
//! ```
//! use std::io::{Read, Seek, SeekFrom, Write};
//! use chunkstream::{ChunkedStream, SharedPool, TextEncoding};
//!
//! let mut stream = ChunkedStream::new(SharedPool::global(), 256);
//! stream.write_all(b"{\"status\":\"ok\"}")?;
//! stream.seek(SeekFrom::Start(0))?;
//!
//! let text = stream.get_string(TextEncoding::Utf8)?;
//! assert_eq!(text.as_deref(), Some("{\"status\":\"ok\"}"));
//! # Ok::<(), chunkstream::StreamError>(())
//! ```
//!
//! # Async (feature = "async-io")
//!
//! ```ignore
//! use futures_util::AsyncWriteExt;
//! use chunkstream::{ChunkedStream, SharedPool};
//!
//! async fn demo() -> std::io::Result<()> {
//!     let mut stream = ChunkedStream::new(SharedPool::global(), 256);
//!     stream.write_all(b"body").await?;
//!     assert_eq!(stream.len(), 4);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod capture;
mod config;
mod error;
mod io;
mod mask;
mod pool;
mod stream;

//
// Public surface
//

pub use capture::{
    BODY_DECODE_FAILED, BODY_NOT_STORED, Capture, CaptureBody, CaptureLevel, Exchange,
    ExchangeFormatter, FullFormatter, SummaryFormatter,
};
pub use config::{CaptureConfig, DEFAULT_CHUNK_SIZE, StreamConfig};
pub use error::StreamError;
pub use io::{LengthCountingStream, SetLength, SnifferStream};
pub use mask::{fnv1a, is_sensitive, mask};
pub use pool::{ChunkPool, HeapPool, Lease, PoolStats, SharedPool};
pub use stream::{ChunkedStream, TextEncoding};

#[cfg(feature = "async-io")]
pub use io::AsyncSnifferStream;
