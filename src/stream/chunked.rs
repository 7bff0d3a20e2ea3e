//! Seekable byte stream stored in fixed-size pooled chunks.
//!
//! Chunk `i` holds logical bytes `[i * chunk_size, (i + 1) * chunk_size)`.
//! Every operation translates the cursor into a `(chunk index, offset)` pair
//! and walks chunk by chunk, so the stream never needs one contiguous
//! allocation for its contents.

use std::borrow::Cow;
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::sync::Arc;

use bytes::Bytes;
use tracing::trace;

use super::TextEncoding;
use crate::config::StreamConfig;
use crate::error::StreamError;
use crate::pool::{ChunkPool, Lease};

/// A growable, seekable in-memory stream built from pooled chunks.
///
/// Position and length behave like a [`std::io::Cursor`] over a `Vec<u8>`:
/// the cursor can be placed anywhere, reads stop at the logical length, and
/// writes past the end extend it. Storage grows one chunk at a time and
/// chunks go back to the pool when the stream shrinks or is dropped.
///
/// A stream is meant to be used by one owner at a time; the pool is the only
/// shared part.
///
/// # Example
///
/// ```
/// use std::io::{Read, Seek, SeekFrom, Write};
/// use std::sync::Arc;
/// use chunkstream::{ChunkedStream, SharedPool};
///
/// let pool = Arc::new(SharedPool::new());
/// let mut stream = ChunkedStream::new(pool.clone(), 16);
///
/// stream.write_all(&[7u8; 50])?;
/// assert_eq!(stream.len(), 50);
/// assert_eq!(stream.chunk_count(), 4);
///
/// stream.seek(SeekFrom::Start(48))?;
/// let mut tail = Vec::new();
/// stream.read_to_end(&mut tail)?;
/// assert_eq!(tail, [7, 7]);
///
/// drop(stream);
/// assert_eq!(pool.stats().outstanding(), 0);
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct ChunkedStream {
    pool: Arc<dyn ChunkPool>,
    chunks: Vec<Vec<u8>>,
    chunk_size: usize,
    length: usize,
    position: u64,
}

impl ChunkedStream {
    /// Creates an empty stream leasing `chunk_size`-byte chunks from `pool`.
    ///
    /// No chunk is leased until the first write or resize.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero. Use [`ChunkedStream::with_config`] to
    /// validate untrusted sizes instead.
    pub fn new(pool: Arc<dyn ChunkPool>, chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk size must be non-zero");

        Self {
            pool,
            chunks: Vec::new(),
            chunk_size,
            length: 0,
            position: 0,
        }
    }

    /// Creates an empty stream from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidConfig`] if the configuration is invalid.
    pub fn with_config(pool: Arc<dyn ChunkPool>, config: StreamConfig) -> Result<Self, StreamError> {
        config.validate()?;
        Ok(Self::new(pool, config.chunk_size()))
    }

    /// Returns the size of each chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns the number of chunks currently held.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Returns the logical length in bytes.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns true if the logical length is zero.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the cursor position.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Moves the cursor. Positions past the end are allowed.
    pub fn set_position(&mut self, position: u64) {
        self.position = position;
    }

    /// Resizes the stream to `new_len` bytes.
    ///
    /// Shrinking returns chunks that are no longer needed to the pool but
    /// leaves the bytes past `new_len` in the kept chunks untouched; growing
    /// back over them exposes those stale bytes again. Growing leases
    /// zero-filled chunks as needed. Only shrinking moves the cursor: if it
    /// ends up past the new length it is moved to the end.
    pub fn set_len(&mut self, new_len: usize) {
        if new_len == self.length {
            return;
        }

        if new_len < self.length {
            let keep = new_len / self.chunk_size + 1;
            if self.chunks.len() > keep {
                for chunk in self.chunks.drain(keep..) {
                    self.pool.release(chunk);
                }
                trace!(keep, new_len, "released trailing chunks");
            }

            // The only place the cursor is pulled back
            self.position = self.position.min(new_len as u64);
        } else {
            self.ensure_chunk((new_len - 1) / self.chunk_size);
        }

        self.length = new_len;
    }

    /// Reads the byte under the cursor, or `None` at the end of data.
    pub fn read_byte(&mut self) -> Option<u8> {
        let position = self.readable_position()?;
        let (index, offset) = self.locate(position);
        let value = self.chunks[index][offset];
        self.position += 1;
        Some(value)
    }

    /// Writes one byte at the cursor.
    ///
    /// # Errors
    ///
    /// Fails only if the cursor does not fit in memory addresses.
    pub fn write_byte(&mut self, value: u8) -> io::Result<()> {
        let position = self.writable_position(1)?;
        let (index, offset) = self.locate(position);
        self.ensure_chunk(index);
        self.chunks[index][offset] = value;
        self.advance_write(position + 1);
        Ok(())
    }

    /// Copies the logical contents into a new vector.
    ///
    /// Position and length are unchanged.
    pub fn to_vec(&self) -> Vec<u8> {
        if self.length == 0 {
            return Vec::new();
        }

        let mut buffer = vec![0u8; self.length];
        self.copy_chunks_to(&mut buffer);
        buffer
    }

    /// Copies the logical contents into [`Bytes`].
    pub fn to_bytes(&self) -> Bytes {
        Bytes::from(self.to_vec())
    }

    /// Decodes the logical contents as text.
    ///
    /// Returns `Ok(None)` when the stream holds no chunks at all. A single
    /// chunk is decoded in place; several chunks are first gathered into a
    /// scratch buffer leased from the pool, which is returned before this
    /// method returns, whether decoding succeeded or not.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Decode`] if the bytes are not valid in
    /// `encoding`.
    pub fn get_string(&self, encoding: TextEncoding) -> Result<Option<Cow<'_, str>>, StreamError> {
        match self.chunks.len() {
            0 => Ok(None),
            1 => Ok(Some(encoding.decode(&self.chunks[0][..self.length])?)),
            _ => {
                let mut scratch = Lease::new(self.pool.as_ref(), self.length);
                self.copy_chunks_to(&mut scratch);
                let text = encoding.decode(&scratch)?.into_owned();
                Ok(Some(Cow::Owned(text)))
            }
        }
    }

    /// Returns every chunk to the pool and resets the stream to empty.
    ///
    /// Calling this more than once is harmless. Dropping the stream does the
    /// same thing.
    pub fn dispose(&mut self) {
        if !self.chunks.is_empty() {
            trace!(count = self.chunks.len(), "returning chunks to pool");
        }

        for chunk in self.chunks.drain(..) {
            self.pool.release(chunk);
        }

        self.length = 0;
        self.position = 0;
    }

    /// Splits a logical offset into `(chunk index, offset in chunk)`.
    fn locate(&self, position: usize) -> (usize, usize) {
        (position / self.chunk_size, position % self.chunk_size)
    }

    /// Leases zero-filled chunks until `index` is addressable.
    fn ensure_chunk(&mut self, index: usize) {
        while self.chunks.len() <= index {
            let mut chunk = self.pool.lease(self.chunk_size);
            // Pooled buffers may hold bytes from a previous lease
            chunk[..self.chunk_size].fill(0);
            trace!(index = self.chunks.len(), chunk_size = self.chunk_size, "leased chunk");
            self.chunks.push(chunk);
        }
    }

    /// Copies every chunk's valid bytes into `buffer` in order.
    fn copy_chunks_to(&self, buffer: &mut [u8]) {
        for (index, chunk) in self.chunks.iter().enumerate() {
            let start = index * self.chunk_size;
            if start >= self.length {
                break;
            }

            let count = (self.length - start).min(self.chunk_size);
            buffer[start..start + count].copy_from_slice(&chunk[..count]);
        }
    }

    /// The cursor as an index, if it points at stored data.
    fn readable_position(&self) -> Option<usize> {
        if self.position >= self.length as u64 {
            return None;
        }

        // Below `length`, so it fits in usize.
        Some(self.position as usize)
    }

    /// The cursor as an index, if `count` bytes can be written there.
    fn writable_position(&self, count: usize) -> io::Result<usize> {
        usize::try_from(self.position)
            .ok()
            .filter(|position| position.checked_add(count).is_some())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "cursor position exceeds maximum possible stream length",
                )
            })
    }

    fn advance_write(&mut self, end: usize) {
        self.position = end as u64;
        self.length = self.length.max(end);
    }
}

impl Read for ChunkedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(mut position) = self.readable_position() else {
            return Ok(0);
        };

        let total = buf.len().min(self.length - position);
        let mut copied = 0;

        while copied < total {
            let (index, offset) = self.locate(position);
            let count = (total - copied).min(self.chunk_size - offset);
            buf[copied..copied + count]
                .copy_from_slice(&self.chunks[index][offset..offset + count]);
            copied += count;
            position += count;
        }

        self.position = position as u64;
        Ok(total)
    }
}

impl Write for ChunkedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let mut position = self.writable_position(buf.len())?;
        let mut remaining = buf;

        while !remaining.is_empty() {
            let (index, offset) = self.locate(position);
            self.ensure_chunk(index);

            let count = remaining.len().min(self.chunk_size - offset);
            self.chunks[index][offset..offset + count].copy_from_slice(&remaining[..count]);
            remaining = &remaining[count..];
            position += count;
        }

        self.advance_write(position);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for ChunkedStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let (base, offset) = match pos {
            SeekFrom::Start(n) => {
                self.position = n;
                return Ok(n);
            }
            SeekFrom::End(n) => (self.length as u64, n),
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

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.position)
    }
}

impl Drop for ChunkedStream {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for ChunkedStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkedStream")
            .field("chunk_size", &self.chunk_size)
            .field("chunks", &self.chunks.len())
            .field("length", &self.length)
            .field("position", &self.position)
            .finish()
    }
}
