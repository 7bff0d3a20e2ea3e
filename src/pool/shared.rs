//! Shared buffer pool for efficient memory reuse across streams.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tracing::{debug, trace};

use super::ChunkPool;

/// Default maximum number of buffers kept on the free list.
pub const DEFAULT_MAX_RETAINED: usize = 1024;

/// Default maximum length of a buffer that is kept for reuse (1 MiB).
pub const DEFAULT_MAX_BUFFER_LEN: usize = 1024 * 1024;

/// A pool of reusable byte buffers shared between threads.
///
/// Released buffers go onto a free list without being cleared. A lease of
/// `size` bytes gets one of them back as-is only if its length is between
/// `size` and twice `size`, so a large scratch buffer is never handed out as
/// a small chunk. Buffers larger than the retention limit, or released while
/// the free list is full, are simply dropped.
///
/// # Example
///
/// ```
/// use chunkstream::{ChunkPool, SharedPool};
///
/// let pool = SharedPool::new();
/// let buffer = pool.lease(64);
/// assert!(buffer.len() >= 64);
/// pool.release(buffer);
/// assert_eq!(pool.stats().retained, 1);
/// ```
#[derive(Debug)]
pub struct SharedPool {
    free: Mutex<Vec<Vec<u8>>>,
    max_retained: usize,
    max_buffer_len: usize,
    leased: AtomicUsize,
    released: AtomicUsize,
    allocated: AtomicUsize,
}

/// Counters describing pool activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    /// Total number of leases served.
    pub leased: usize,
    /// Total number of buffers handed back.
    pub released: usize,
    /// Number of leases that had to allocate a fresh buffer.
    pub allocated: usize,
    /// Buffers currently sitting on the free list.
    pub retained: usize,
}

impl PoolStats {
    /// Buffers leased and not yet released.
    ///
    /// Buffers released without a matching lease (pre-warming) are not
    /// counted as negative outstanding.
    pub fn outstanding(&self) -> usize {
        self.leased.saturating_sub(self.released)
    }
}

static GLOBAL_POOL: OnceLock<Arc<SharedPool>> = OnceLock::new();

impl SharedPool {
    /// Creates a pool with the default retention limits.
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_RETAINED, DEFAULT_MAX_BUFFER_LEN)
    }

    /// Creates a pool that keeps at most `max_retained` buffers, each no
    /// longer than `max_buffer_len` bytes.
    pub fn with_limits(max_retained: usize, max_buffer_len: usize) -> Self {
        debug!(max_retained, max_buffer_len, "creating shared chunk pool");
        Self {
            free: Mutex::new(Vec::new()),
            max_retained,
            max_buffer_len,
            leased: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
            allocated: AtomicUsize::new(0),
        }
    }

    /// Returns the process-wide pool, creating it on first use.
    pub fn global() -> Arc<SharedPool> {
        GLOBAL_POOL
            .get_or_init(|| Arc::new(SharedPool::new()))
            .clone()
    }

    /// Returns a snapshot of the pool counters.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            leased: self.leased.load(Ordering::Relaxed),
            released: self.released.load(Ordering::Relaxed),
            allocated: self.allocated.load(Ordering::Relaxed),
            retained: self.free_list().len(),
        }
    }

    fn free_list(&self) -> MutexGuard<'_, Vec<Vec<u8>>> {
        // A panic while holding the lock cannot leave the list inconsistent.
        self.free.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A pooled buffer of `len` bytes may serve a lease of `size` bytes.
fn fits(len: usize, size: usize) -> bool {
    len >= size && len <= size.saturating_mul(2)
}

impl Default for SharedPool {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkPool for SharedPool {
    fn lease(&self, size: usize) -> Vec<u8> {
        self.leased.fetch_add(1, Ordering::Relaxed);

        let reused = {
            let mut free = self.free_list();
            free.iter()
                .rposition(|buffer| fits(buffer.len(), size))
                .map(|index| free.swap_remove(index))
        };

        match reused {
            Some(buffer) => {
                trace!(size, len = buffer.len(), "reusing pooled buffer");
                buffer
            }
            None => {
                self.allocated.fetch_add(1, Ordering::Relaxed);
                trace!(size, "allocating pooled buffer");
                vec![0u8; size]
            }
        }
    }

    fn release(&self, buffer: Vec<u8>) {
        self.released.fetch_add(1, Ordering::Relaxed);

        if buffer.len() > self.max_buffer_len {
            trace!(len = buffer.len(), "dropping oversized buffer");
            return;
        }

        let mut free = self.free_list();
        if free.len() < self.max_retained {
            free.push(buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lease_allocates_when_empty() {
        let pool = SharedPool::new();
        let buffer = pool.lease(128);
        assert_eq!(buffer.len(), 128);
        assert_eq!(pool.stats().allocated, 1);
    }

    #[test]
    fn test_buffer_reuse_keeps_stale_bytes() {
        let pool = SharedPool::new();

        let mut buffer = pool.lease(4);
        buffer.copy_from_slice(b"dirt");
        pool.release(buffer);

        // The pool hands back the same buffer without clearing it
        let buffer = pool.lease(4);
        assert_eq!(&buffer[..], b"dirt");
        assert_eq!(pool.stats().allocated, 1);
    }

    #[test]
    fn test_small_buffer_not_reused_for_larger_lease() {
        let pool = SharedPool::new();
        pool.release(vec![0u8; 8]);

        let buffer = pool.lease(16);
        assert_eq!(buffer.len(), 16);
        assert_eq!(pool.stats().retained, 1);
    }

    #[test]
    fn test_large_buffer_not_reused_for_small_lease() {
        let pool = SharedPool::new();
        pool.release(vec![0u8; 1_000_000]);
        pool.release(vec![0u8; 300]);

        let buffer = pool.lease(256);
        assert_eq!(buffer.len(), 300);

        let buffer = pool.lease(256);
        assert_eq!(buffer.len(), 256);
        assert_eq!(pool.stats().allocated, 1);
        assert_eq!(pool.stats().retained, 1);
    }

    #[test]
    fn test_retention_limits() {
        let pool = SharedPool::with_limits(1, 32);
        pool.release(vec![0u8; 64]);
        assert_eq!(pool.stats().retained, 0);

        pool.release(vec![0u8; 16]);
        pool.release(vec![0u8; 16]);
        assert_eq!(pool.stats().retained, 1);
    }

    #[test]
    fn test_outstanding() {
        let pool = SharedPool::new();
        let a = pool.lease(8);
        let _b = pool.lease(8);
        pool.release(a);
        assert_eq!(pool.stats().outstanding(), 1);
    }

    #[test]
    fn test_outstanding_after_prewarm() {
        let pool = SharedPool::new();
        pool.release(vec![0u8; 256]);
        pool.release(vec![0u8; 256]);
        assert_eq!(pool.stats().outstanding(), 0);

        let _chunk = pool.lease(256);
        assert_eq!(pool.stats().outstanding(), 0);
        assert_eq!(pool.stats().allocated, 0);
    }

    #[test]
    fn test_global_is_shared() {
        let a = SharedPool::global();
        let b = SharedPool::global();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_concurrent_lease_release() {
        let pool = Arc::new(SharedPool::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pool = Arc::clone(&pool);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let buffer = pool.lease(32);
                        pool.release(buffer);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let stats = pool.stats();
        assert_eq!(stats.leased, 400);
        assert_eq!(stats.outstanding(), 0);
    }
}
