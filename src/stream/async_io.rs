//! Async I/O trait implementations for [`ChunkedStream`].
//!
//! The stream lives in memory, so every poll completes immediately with the
//! result of the matching synchronous call. A future that is dropped before
//! its first poll never touches the stream.
//!
//! This module requires the `async-io` feature to be enabled.

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_io::{AsyncRead, AsyncSeek, AsyncWrite};

use super::ChunkedStream;

impl AsyncRead for ChunkedStream {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Ready(self.get_mut().read(buf))
    }
}

impl AsyncWrite for ChunkedStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Ready(self.get_mut().write(buf))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

impl AsyncSeek for ChunkedStream {
    fn poll_seek(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        pos: SeekFrom,
    ) -> Poll<io::Result<u64>> {
        Poll::Ready(self.get_mut().seek(pos))
    }
}

#[cfg(test)]
mod tests {
    use std::io::SeekFrom;
    use std::sync::Arc;

    use futures_util::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

    use crate::pool::SharedPool;
    use crate::stream::ChunkedStream;

    #[tokio::test]
    async fn test_async_round_trip() {
        let mut stream = ChunkedStream::new(Arc::new(SharedPool::new()), 8);
        stream.write_all(b"async chunked body").await.unwrap();
        stream.seek(SeekFrom::Start(6)).await.unwrap();

        let mut out = String::new();
        stream.read_to_string(&mut out).await.unwrap();
        assert_eq!(out, "chunked body");
    }

    #[tokio::test]
    async fn test_unpolled_write_leaves_stream_untouched() {
        let mut stream = ChunkedStream::new(Arc::new(SharedPool::new()), 8);
        let pending = AsyncWriteExt::write_all(&mut stream, b"never");
        drop(pending);
        assert_eq!(stream.chunk_count(), 0);
        assert!(stream.is_empty());
    }

    #[tokio::test]
    async fn test_copy_from_async_reader() {
        let source: &[u8] = &[5u8; 100];
        let mut stream = ChunkedStream::new(Arc::new(SharedPool::new()), 16);
        futures_util::io::copy(source, &mut stream).await.unwrap();
        assert_eq!(stream.len(), 100);
        assert_eq!(stream.chunk_count(), 7);
    }
}
