//! Tee stream that copies traffic into a sink.

use std::io::{self, Read, Seek, SeekFrom, Write};

use super::SetLength;

/// Wraps a master stream and copies every byte that passes through it into a
/// sink.
///
/// Reads come from the master and whatever was read is written to the sink;
/// writes go to the master first and the accepted bytes to the sink. Seeks and
/// resizes are applied to both so the sink mirrors the master's layout. The
/// sink must be writable, which the `Write` bounds enforce at compile time.
///
/// # Example
///
/// ```
/// use std::io::Read;
/// use std::sync::Arc;
/// use chunkstream::{ChunkedStream, SharedPool, SnifferStream};
///
/// let body: &[u8] = b"request body";
/// let sink = ChunkedStream::new(Arc::new(SharedPool::new()), 4);
/// let mut sniffer = SnifferStream::new(body, sink);
///
/// let mut seen = Vec::new();
/// sniffer.read_to_end(&mut seen)?;
///
/// let (_, sink) = sniffer.into_inner();
/// assert_eq!(sink.to_vec(), seen);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct SnifferStream<M, S> {
    master: M,
    sink: S,
}

impl<M, S> SnifferStream<M, S> {
    /// Creates a sniffer over `master` that copies into `sink`.
    pub fn new(master: M, sink: S) -> Self {
        Self { master, sink }
    }

    /// Returns a reference to the master stream.
    pub fn master(&self) -> &M {
        &self.master
    }

    /// Returns a mutable reference to the master stream.
    ///
    /// Bytes moved through this reference bypass the sink.
    pub fn master_mut(&mut self) -> &mut M {
        &mut self.master
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

impl<M: Read, S: Write> SnifferStream<M, S> {
    /// Reads one byte from the master and copies it to the sink.
    ///
    /// Returns `None` at the end of the master stream.
    pub fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.master.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.sink.write_all(&byte)?;
                    return Ok(Some(byte[0]));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<M: Read, S: Write> Read for SnifferStream<M, S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.master.read(buf)?;
        if n > 0 {
            self.sink.write_all(&buf[..n])?;
        }
        Ok(n)
    }
}

impl<M: Write, S: Write> Write for SnifferStream<M, S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.master.write(buf)?;
        self.sink.write_all(&buf[..n])?;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.master.flush()?;
        self.sink.flush()
    }
}

impl<M: Seek, S: Seek> Seek for SnifferStream<M, S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let position = self.master.seek(pos)?;
        self.sink.seek(pos)?;
        Ok(position)
    }
}

impl<M: SetLength, S: SetLength> SetLength for SnifferStream<M, S> {
    fn set_length(&mut self, len: u64) -> io::Result<()> {
        self.master.set_length(len)?;
        self.sink.set_length(len)
    }
}
