//! The chunked stream and its text materialization.
//!
//! - [`ChunkedStream`] - Seekable byte stream backed by pooled chunks
//! - [`TextEncoding`] - Decoder used by [`ChunkedStream::get_string`]

#[cfg(feature = "async-io")]
mod async_io;
mod chunked;
mod encoding;

pub use chunked::ChunkedStream;
pub use encoding::TextEncoding;
