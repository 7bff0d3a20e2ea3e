//! Stream adapters used around a [`ChunkedStream`](crate::ChunkedStream).
//!
//! - [`SnifferStream`] - Tees everything read from or written to a stream into a sink
//! - [`LengthCountingStream`] - Sink that only tracks position and length
//! - [`SetLength`] - Resizing for streams that support it
//!
//! With the `async-io` feature, [`AsyncSnifferStream`] tees an async master
//! into a synchronous in-memory sink.

#[cfg(feature = "async-io")]
mod async_sniffer;
mod counting;
mod sniffer;

#[cfg(feature = "async-io")]
pub use async_sniffer::AsyncSnifferStream;
pub use counting::LengthCountingStream;
pub use sniffer::SnifferStream;

use std::io;

use crate::stream::ChunkedStream;

/// Streams whose logical length can be set directly.
pub trait SetLength {
    /// Truncates or extends the stream to `len` bytes.
    ///
    /// Truncating below the cursor moves the cursor to the new end;
    /// extending leaves it where it is.
    fn set_length(&mut self, len: u64) -> io::Result<()>;
}

impl SetLength for ChunkedStream {
    fn set_length(&mut self, len: u64) -> io::Result<()> {
        let len = usize::try_from(len).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "length exceeds addressable memory")
        })?;
        self.set_len(len);
        Ok(())
    }
}

impl SetLength for io::Cursor<Vec<u8>> {
    fn set_length(&mut self, len: u64) -> io::Result<()> {
        let len = usize::try_from(len).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "length exceeds addressable memory")
        })?;
        let shrinking = len < self.get_ref().len();
        self.get_mut().resize(len, 0);
        if shrinking && self.position() > len as u64 {
            self.set_position(len as u64);
        }
        Ok(())
    }
}

impl<T: SetLength + ?Sized> SetLength for &mut T {
    fn set_length(&mut self, len: u64) -> io::Result<()> {
        (**self).set_length(len)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_cursor_truncate_moves_cursor() {
        let mut cursor = Cursor::new(vec![1u8; 10]);
        cursor.set_position(8);
        cursor.set_length(4).unwrap();
        assert_eq!(cursor.get_ref().len(), 4);
        assert_eq!(cursor.position(), 4);
    }

    #[test]
    fn test_cursor_extend_keeps_cursor() {
        let mut cursor = Cursor::new(Vec::new());
        cursor.set_position(8);
        cursor.set_length(4).unwrap();
        assert_eq!(cursor.get_ref(), &[0u8; 4]);
        assert_eq!(cursor.position(), 8);
    }

    #[test]
    fn test_set_length_through_mut_ref() {
        fn truncate(mut stream: impl SetLength) {
            stream.set_length(1).unwrap();
        }

        let mut cursor = Cursor::new(vec![1u8, 2, 3]);
        truncate(&mut cursor);
        assert_eq!(cursor.get_ref(), &[1u8]);
    }
}
