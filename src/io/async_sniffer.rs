//! Async tee stream with an in-memory sink.
//!
//! This module requires the `async-io` feature to be enabled.

use std::io::{self, Write};
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_io::{AsyncRead, AsyncWrite};
use pin_project_lite::pin_project;

pin_project! {
    /// Async counterpart of [`SnifferStream`](crate::SnifferStream).
    ///
    /// The master is polled as usual; the sink is a synchronous writer
    /// (typically a [`ChunkedStream`](crate::ChunkedStream) or a
    /// [`LengthCountingStream`](crate::LengthCountingStream)) that completes
    /// immediately, so copying never adds a suspension point.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use chunkstream::{AsyncSnifferStream, ChunkedStream, SharedPool};
    /// use futures_util::AsyncReadExt;
    /// use std::sync::Arc;
    ///
    /// async fn demo<R: futures_io::AsyncRead + Unpin>(body: R) -> std::io::Result<()> {
    ///     let sink = ChunkedStream::new(Arc::new(SharedPool::new()), 256);
    ///     let mut sniffer = AsyncSnifferStream::new(body, sink);
    ///     let mut buf = Vec::new();
    ///     sniffer.read_to_end(&mut buf).await?;
    ///     assert_eq!(sniffer.sink().to_vec(), buf);
    ///     Ok(())
    /// }
    /// ```
    #[derive(Debug)]
    pub struct AsyncSnifferStream<M, S> {
        #[pin]
        master: M,
        sink: S,
    }
}

impl<M, S> AsyncSnifferStream<M, S> {
    /// Creates a sniffer over `master` that copies into `sink`.
    pub fn new(master: M, sink: S) -> Self {
        Self { master, sink }
    }

    /// Returns a reference to the master stream.
    pub fn master(&self) -> &M {
        &self.master
    }

    /// Returns a reference to the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consumes the sniffer, returning `(master, sink)`.
    pub fn into_inner(self) -> (M, S) {
        (self.master, self.sink)
    }
}

impl<M: AsyncRead, S: Write> AsyncRead for AsyncSnifferStream<M, S> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.project();
        match this.master.poll_read(cx, buf) {
            Poll::Ready(Ok(n)) => {
                if n > 0 {
                    this.sink.write_all(&buf[..n])?;
                }
                Poll::Ready(Ok(n))
            }
            other => other,
        }
    }
}

impl<M: AsyncWrite, S: Write> AsyncWrite for AsyncSnifferStream<M, S> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.project();
        match this.master.poll_write(cx, buf) {
            Poll::Ready(Ok(n)) => {
                this.sink.write_all(&buf[..n])?;
                Poll::Ready(Ok(n))
            }
            other => other,
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.project();
        this.sink.flush()?;
        this.master.poll_flush(cx)
    }

    fn poll_close(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.project().master.poll_close(cx)
    }
}
