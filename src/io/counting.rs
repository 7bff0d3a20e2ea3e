//! A sink that counts bytes without storing them.

use std::io::{self, Read, Seek, SeekFrom, Write};

use super::SetLength;

/// Write-only, seekable sink that records how much was written.
///
/// Writing `n` bytes advances the position by `n` and extends the length to
/// the position if needed; the bytes themselves are discarded. Used when only
/// body sizes are logged.
///
/// # Example
///
/// ```
/// use std::io::Write;
/// use chunkstream::LengthCountingStream;
///
/// let mut counter = LengthCountingStream::new();
/// counter.write_all(b"hello")?;
/// assert_eq!(counter.len(), 5);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LengthCountingStream {
    position: u64,
    length: u64,
}

impl LengthCountingStream {
    /// Creates an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the counted length.
    pub fn len(&self) -> u64 {
        self.length
    }

    /// Returns true if nothing was counted.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the cursor position.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Moves the cursor.
    pub fn set_position(&mut self, position: u64) {
        self.position = position;
    }
}

impl Write for LengthCountingStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.position = self
            .position
            .checked_add(buf.len() as u64)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "cursor position exceeds maximum possible stream length",
                )
            })?;
        self.length = self.length.max(self.position);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Read for LengthCountingStream {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "length counting stream does not store data",
        ))
    }
}

impl Seek for LengthCountingStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let (base, offset) = match pos {
            SeekFrom::Start(n) => {
                self.position = n;
                return Ok(n);
            }
            SeekFrom::End(n) => (self.length, n),
            SeekFrom::Current(n) => (self.position, n),
        };

        match base.checked_add_signed(offset) {
            Some(n) => {
                self.position = n;
                Ok(n)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )),
        }
    }
}

impl SetLength for LengthCountingStream {
    fn set_length(&mut self, len: u64) -> io::Result<()> {
        self.length = len;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_counts() {
        let mut counter = LengthCountingStream::new();
        counter.write_all(&[0u8; 30]).unwrap();
        counter.write_all(&[0u8; 12]).unwrap();
        assert_eq!(counter.len(), 42);
        assert_eq!(counter.position(), 42);
    }

    #[test]
    fn test_overwrite_does_not_extend() {
        let mut counter = LengthCountingStream::new();
        counter.write_all(&[0u8; 10]).unwrap();
        counter.seek(SeekFrom::Start(2)).unwrap();
        counter.write_all(&[0u8; 3]).unwrap();
        assert_eq!(counter.len(), 10);
        assert_eq!(counter.position(), 5);
    }

    #[test]
    fn test_seek_from_end() {
        let mut counter = LengthCountingStream::new();
        counter.write_all(&[0u8; 10]).unwrap();
        assert_eq!(counter.seek(SeekFrom::End(5)).unwrap(), 15);
        assert!(counter.seek(SeekFrom::Current(-20)).is_err());
    }

    #[test]
    fn test_set_length_keeps_position() {
        let mut counter = LengthCountingStream::new();
        counter.write_all(&[0u8; 10]).unwrap();
        counter.set_length(4).unwrap();
        assert_eq!(counter.len(), 4);
        assert_eq!(counter.position(), 10);
    }

    #[test]
    fn test_write_at_max_position_fails() {
        let mut counter = LengthCountingStream::new();
        counter.seek(SeekFrom::Start(u64::MAX)).unwrap();

        let err = counter.write(&[0u8; 2]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert_eq!(counter.position(), u64::MAX);
        assert_eq!(counter.len(), 0);
    }

    #[test]
    fn test_read_unsupported() {
        let mut counter = LengthCountingStream::new();
        let err = counter.read(&mut [0u8; 4]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
    }
}
