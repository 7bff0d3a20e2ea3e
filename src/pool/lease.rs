//! Scoped pool leases.

use std::ops::{Deref, DerefMut};

use super::ChunkPool;

/// A buffer borrowed from a pool for the duration of a scope.
///
/// The buffer goes back to the pool when the lease is dropped, on every exit
/// path including early returns and unwinding.
///
/// # Example
///
/// ```
/// use chunkstream::{Lease, SharedPool};
///
/// let pool = SharedPool::new();
/// {
///     let mut scratch = Lease::new(&pool, 16);
///     scratch[..5].copy_from_slice(b"hello");
/// }
/// assert_eq!(pool.stats().outstanding(), 0);
/// ```
pub struct Lease<'a> {
    pool: &'a dyn ChunkPool,
    buffer: Vec<u8>,
    len: usize,
}

impl<'a> Lease<'a> {
    /// Leases `len` bytes from `pool`.
    ///
    /// The lease dereferences to exactly `len` bytes even if the pool handed
    /// out a longer buffer.
    pub fn new(pool: &'a dyn ChunkPool, len: usize) -> Self {
        let buffer = pool.lease(len);
        debug_assert!(buffer.len() >= len, "pool returned a short buffer");
        Self { pool, buffer, len }
    }
}

impl Deref for Lease<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.buffer[..self.len]
    }
}

impl DerefMut for Lease<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.buffer[..self.len]
    }
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buffer));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::SharedPool;

    #[test]
    fn test_lease_len_is_requested_len() {
        let pool = SharedPool::new();
        pool.release(vec![0u8; 64]);

        let lease = Lease::new(&pool, 10);
        assert_eq!(lease.len(), 10);
    }

    #[test]
    fn test_release_on_early_return() {
        fn fails(pool: &SharedPool) -> Result<(), ()> {
            let _scratch = Lease::new(pool, 8);
            Err(())
        }

        let pool = SharedPool::new();
        assert!(fails(&pool).is_err());
        assert_eq!(pool.stats().outstanding(), 0);
        assert_eq!(pool.stats().retained, 1);
    }
}
