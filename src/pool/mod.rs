//! Chunk pools.
//!
//! A [`ChunkPool`] lends out byte buffers and takes them back. Streams lease
//! one buffer per chunk and hand it back when the chunk is dropped, so a pool
//! shared across many streams turns per-request allocation into reuse.
//!
//! - [`SharedPool`] - Mutex-protected free list, safe to share between threads
//! - [`HeapPool`] - Allocates on every lease and frees on every release
//! - [`Lease`] - Scoped buffer that is released when dropped

mod lease;
mod shared;

pub use lease::Lease;
pub use shared::{PoolStats, SharedPool};

/// Lends and reclaims byte buffers.
///
/// Implementations must be safe to call concurrently from many streams.
pub trait ChunkPool: Send + Sync {
    /// Returns a buffer of at least `size` bytes.
    ///
    /// The contents are unspecified: a reused buffer may still carry bytes
    /// from its previous lease.
    fn lease(&self, size: usize) -> Vec<u8>;

    /// Takes back a buffer previously obtained from [`ChunkPool::lease`].
    fn release(&self, buffer: Vec<u8>);
}

/// A pool that never retains anything.
///
/// Useful as a baseline in benchmarks and when pooling is not wanted.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeapPool;

impl ChunkPool for HeapPool {
    fn lease(&self, size: usize) -> Vec<u8> {
        vec![0u8; size]
    }

    fn release(&self, buffer: Vec<u8>) {
        drop(buffer);
    }
}
