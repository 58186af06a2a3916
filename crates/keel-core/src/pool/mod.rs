// Copyright 2025 the keel authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Object pooling for values that are expensive to create.
//!
//! [`Pool`] hands out RAII guards: dropping a [`Pooled`] guard returns the
//! value to the pool after an optional reset hook has run, so leaks require
//! an explicit [`Pooled::detach`]. [`BufferPool`] is a specialized pool for
//! `Vec<u8>` scratch buffers, bucketed by power-of-two capacity.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A thread-safe pool of reusable values.
///
/// Values are created on demand by a factory closure and recycled on guard
/// drop. The pool itself only needs a shared reference for all operations,
/// so it can be stored in a `static`, an `Arc`, or borrowed across scoped
/// threads.
pub struct Pool<T> {
    idle: Mutex<Vec<T>>,
    factory: Box<dyn Fn() -> T + Send + Sync>,
    reset: Option<Box<dyn Fn(&mut T) + Send + Sync>>,
    max_idle: usize,
    created: AtomicUsize,
}

impl<T> Pool<T> {
    /// Creates an empty pool that builds new values with `factory`.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            idle: Mutex::new(Vec::new()),
            factory: Box::new(factory),
            reset: None,
            max_idle: usize::MAX,
            created: AtomicUsize::new(0),
        }
    }

    /// Registers a hook that runs on every value as it returns to the pool.
    ///
    /// Typical resets clear contents while keeping allocations alive.
    pub fn with_reset<F>(mut self, reset: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.reset = Some(Box::new(reset));
        self
    }

    /// Caps how many idle values the pool retains.
    ///
    /// Values returned while the pool is full are dropped instead. The
    /// default is unbounded.
    pub fn with_max_idle(mut self, max_idle: usize) -> Self {
        self.max_idle = max_idle;
        self
    }

    fn lock_idle(&self) -> MutexGuard<'_, Vec<T>> {
        // A panic mid-acquire or mid-release cannot corrupt a Vec of whole
        // values, so a poisoned lock is recovered rather than propagated.
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a value from the pool, creating one if none are idle.
    pub fn acquire(&self) -> Pooled<'_, T> {
        let recycled = self.lock_idle().pop();
        let item = match recycled {
            Some(item) => item,
            None => {
                self.created.fetch_add(1, Ordering::Relaxed);
                (self.factory)()
            }
        };
        Pooled {
            item: Some(item),
            pool: self,
        }
    }

    /// Ensures at least `count` values sit idle, creating the shortfall now.
    ///
    /// Useful at load time to move factory cost out of the hot path. The
    /// idle cap still applies.
    pub fn warm_up(&self, count: usize) {
        let target = count.min(self.max_idle);
        let mut idle = self.lock_idle();
        while idle.len() < target {
            idle.push((self.factory)());
            self.created.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Returns how many values currently sit idle in the pool.
    pub fn idle_count(&self) -> usize {
        self.lock_idle().len()
    }

    /// Returns how many values the factory has created over the pool's lifetime.
    pub fn total_created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }

    fn release(&self, mut item: T) {
        if let Some(reset) = &self.reset {
            reset(&mut item);
        }
        let mut idle = self.lock_idle();
        if idle.len() < self.max_idle {
            idle.push(item);
        }
    }
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("idle", &self.idle_count())
            .field("max_idle", &self.max_idle)
            .field("total_created", &self.total_created())
            .finish()
    }
}

/// An RAII guard around a pooled value.
///
/// Dereferences to the value; dropping the guard returns the value to its
/// pool.
pub struct Pooled<'p, T> {
    // Some until the guard drops or detaches.
    item: Option<T>,
    pool: &'p Pool<T>,
}

impl<T> Pooled<'_, T> {
    /// Takes ownership of the value, permanently removing it from the pool.
    /// The reset hook does not run.
    pub fn detach(mut self) -> T {
        self.item.take().expect("pooled value present until drop")
    }
}

impl<T> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.item.as_ref().expect("pooled value present until drop")
    }
}

impl<T> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.item.as_mut().expect("pooled value present until drop")
    }
}

impl<T> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(item) = self.item.take() {
            self.pool.release(item);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Pooled<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pooled").field(&**self).finish()
    }
}

// --- BufferPool ---

/// Capacity of the smallest bucket (64 bytes).
const MIN_BUCKET_SHIFT: u32 = 6;
/// Capacity of the largest bucket (4 MiB); larger requests bypass the pool.
const MAX_BUCKET_SHIFT: u32 = 22;
const BUCKET_COUNT: usize = (MAX_BUCKET_SHIFT - MIN_BUCKET_SHIFT + 1) as usize;
const MAX_POOLED_CAPACITY: usize = 1 << MAX_BUCKET_SHIFT;
/// Idle buffers retained per bucket before further returns are dropped.
const MAX_IDLE_PER_BUCKET: usize = 32;

/// A pool of byte buffers bucketed by power-of-two capacity.
///
/// [`acquire`](Self::acquire) hands out an empty `Vec<u8>` with at least the
/// requested capacity; [`release`](Self::release) clears the buffer and files
/// it back by its real capacity. Requests beyond 4 MiB are served by a fresh
/// allocation and never pooled, so a burst of large frames cannot pin memory
/// for the rest of the run.
pub struct BufferPool {
    buckets: [Mutex<Vec<Vec<u8>>>; BUCKET_COUNT],
}

impl BufferPool {
    /// Creates a pool with all buckets empty.
    pub fn new() -> Self {
        Self {
            buckets: std::array::from_fn(|_| Mutex::new(Vec::new())),
        }
    }

    /// The smallest bucket that can serve `min_capacity`, or `None` when the
    /// request is too large to pool.
    fn bucket_index(min_capacity: usize) -> Option<usize> {
        if min_capacity > MAX_POOLED_CAPACITY {
            return None;
        }
        let needed = min_capacity.max(1).next_power_of_two();
        let shift = needed.trailing_zeros().max(MIN_BUCKET_SHIFT);
        Some((shift - MIN_BUCKET_SHIFT) as usize)
    }

    fn lock_bucket(&self, index: usize) -> MutexGuard<'_, Vec<Vec<u8>>> {
        self.buckets[index]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns an empty buffer with capacity of at least `min_capacity`.
    pub fn acquire(&self, min_capacity: usize) -> Vec<u8> {
        match Self::bucket_index(min_capacity) {
            Some(index) => match self.lock_bucket(index).pop() {
                Some(buffer) => buffer,
                None => Vec::with_capacity(1usize << (index as u32 + MIN_BUCKET_SHIFT)),
            },
            // Oversized requests bypass the pool entirely.
            None => Vec::with_capacity(min_capacity),
        }
    }

    /// Clears `buffer` and returns it to the bucket matching its capacity.
    ///
    /// Buffers smaller than the smallest bucket, larger than the pooled
    /// maximum, or arriving at a full bucket are dropped.
    pub fn release(&self, mut buffer: Vec<u8>) {
        buffer.clear();
        let capacity = buffer.capacity();
        if capacity < (1 << MIN_BUCKET_SHIFT) || capacity > MAX_POOLED_CAPACITY {
            return;
        }

        // File under the largest bucket size not exceeding the capacity, so
        // a buffer pulled from bucket i always satisfies bucket i requests.
        let shift = usize::BITS - 1 - capacity.leading_zeros();
        let index = (shift - MIN_BUCKET_SHIFT) as usize;
        let mut bucket = self.lock_bucket(index);
        if bucket.len() < MAX_IDLE_PER_BUCKET {
            bucket.push(buffer);
        }
    }

    /// Returns the total number of idle buffers across all buckets.
    pub fn idle_buffers(&self) -> usize {
        (0..BUCKET_COUNT)
            .map(|index| self.lock_bucket(index).len())
            .sum()
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferPool")
            .field("idle_buffers", &self.idle_buffers())
            .finish()
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_acquire_creates_then_recycles() {
        let pool: Pool<Vec<u8>> = Pool::new(Vec::new);
        {
            let mut buffer = pool.acquire();
            buffer.push(42);
        }
        assert_eq!(pool.total_created(), 1);
        assert_eq!(pool.idle_count(), 1);

        // Without a reset hook the recycled value keeps its contents
        let buffer = pool.acquire();
        assert_eq!(*buffer, vec![42]);
        assert_eq!(pool.total_created(), 1);
        assert_eq!(pool.idle_count(), 0);
    }

    #[test]
    fn test_reset_runs_on_release() {
        let pool: Pool<Vec<u8>> = Pool::new(Vec::new).with_reset(|buffer| buffer.clear());
        {
            let mut buffer = pool.acquire();
            buffer.extend_from_slice(&[1, 2, 3]);
        }
        let buffer = pool.acquire();
        assert!(buffer.is_empty());
        // The allocation survived the reset
        assert!(buffer.capacity() >= 3);
    }

    #[test]
    fn test_max_idle_caps_retention() {
        let pool: Pool<String> = Pool::new(String::new).with_max_idle(1);
        let first = pool.acquire();
        let second = pool.acquire();
        assert_eq!(pool.total_created(), 2);

        drop(first);
        drop(second);
        assert_eq!(pool.idle_count(), 1);
    }

    #[test]
    fn test_detach_removes_from_pool() {
        let pool: Pool<String> = Pool::new(|| "fresh".to_string());
        let guard = pool.acquire();
        let owned = guard.detach();
        assert_eq!(owned, "fresh");
        assert_eq!(pool.idle_count(), 0);
        assert_eq!(pool.total_created(), 1);
    }

    #[test]
    fn test_warm_up_prefills() {
        let pool: Pool<Vec<u8>> = Pool::new(Vec::new);
        pool.warm_up(3);
        assert_eq!(pool.idle_count(), 3);
        assert_eq!(pool.total_created(), 3);

        // Already warm: nothing new gets created
        pool.warm_up(2);
        assert_eq!(pool.total_created(), 3);

        // Acquisitions now skip the factory
        let _a = pool.acquire();
        let _b = pool.acquire();
        assert_eq!(pool.total_created(), 3);
    }

    #[test]
    fn test_warm_up_respects_max_idle() {
        let pool: Pool<Vec<u8>> = Pool::new(Vec::new).with_max_idle(2);
        pool.warm_up(10);
        assert_eq!(pool.idle_count(), 2);
    }

    #[test]
    fn test_concurrent_acquire_release() {
        let pool: Pool<Vec<u8>> = Pool::new(Vec::new).with_reset(|buffer| buffer.clear());
        thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        let mut buffer = pool.acquire();
                        buffer.push(1);
                    }
                });
            }
        });
        // Every value ever created is back in the pool
        assert_eq!(pool.idle_count(), pool.total_created());
        assert!(pool.total_created() <= 4);
    }

    #[test]
    fn test_buffer_pool_rounds_up_and_recycles() {
        let pool = BufferPool::new();
        let buffer = pool.acquire(100);
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 128);

        pool.release(buffer);
        assert_eq!(pool.idle_buffers(), 1);

        // Same bucket, so the stored buffer comes back
        let recycled = pool.acquire(100);
        assert_eq!(recycled.capacity(), 128);
        assert_eq!(pool.idle_buffers(), 0);
    }

    #[test]
    fn test_buffer_pool_minimum_bucket() {
        let pool = BufferPool::new();
        let buffer = pool.acquire(1);
        assert_eq!(buffer.capacity(), 64);
        let buffer = pool.acquire(0);
        assert_eq!(buffer.capacity(), 64);
    }

    #[test]
    fn test_buffer_pool_release_clears_contents() {
        let pool = BufferPool::new();
        let mut buffer = pool.acquire(64);
        buffer.extend_from_slice(&[9; 32]);
        pool.release(buffer);

        let recycled = pool.acquire(64);
        assert!(recycled.is_empty());
    }

    #[test]
    fn test_buffer_pool_oversize_bypasses_pool() {
        let pool = BufferPool::new();
        let big = pool.acquire(5 * 1024 * 1024);
        assert!(big.capacity() >= 5 * 1024 * 1024);

        pool.release(big);
        assert_eq!(pool.idle_buffers(), 0);
    }

    #[test]
    fn test_buffer_pool_tiny_release_is_dropped() {
        let pool = BufferPool::new();
        pool.release(Vec::with_capacity(8));
        assert_eq!(pool.idle_buffers(), 0);
    }
}
