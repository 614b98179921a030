//! Fixed-capacity circular (ring) buffer for per-block statistics.
//!
//! When the buffer is full, a new value **evicts** the oldest one so that the
//! most-recent `capacity` values are always available.  Push and evict are
//! both O(1); the backing storage is allocated once and never grows.
//!
//! # Example
//!
//! ```rust
//! use mic_visualizer::audio::RingBuffer;
//!
//! let mut buf = RingBuffer::new(3);
//! for v in [1.0_f32, 2.0, 3.0, 4.0] {
//!     buf.push(v); // 4 items → capacity 3 → oldest evicted
//! }
//! assert_eq!(buf.iter().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
//! ```

// ---------------------------------------------------------------------------
// RingBuffer
// ---------------------------------------------------------------------------

/// A fixed-capacity FIFO that evicts its oldest element on overflow.
///
/// Generic over `T: Copy + Default` so it can store any `Copy` scalar, though
/// the statistics window uses `RingBuffer<f32>` exclusively.
///
/// ## Capacity invariant
///
/// `len() <= capacity()` holds after every operation; the type offers no way
/// to grow past it.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    buf: Vec<T>,
    capacity: usize,
    /// Index of the oldest stored element.
    head: usize,
    /// Number of valid elements currently stored (≤ `capacity`).
    len: usize,
}

impl<T: Copy + Default> RingBuffer<T> {
    /// Create a new ring buffer with the given `capacity`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RingBuffer capacity must be > 0");
        Self {
            buf: vec![T::default(); capacity],
            capacity,
            head: 0,
            len: 0,
        }
    }

    /// Append `item`, returning the evicted oldest element when the buffer
    /// was already full.
    pub fn push(&mut self, item: T) -> Option<T> {
        if self.len < self.capacity {
            let tail = (self.head + self.len) % self.capacity;
            self.buf[tail] = item;
            self.len += 1;
            None
        } else {
            // Full: the slot at `head` is the oldest; overwrite it and advance.
            let evicted = std::mem::replace(&mut self.buf[self.head], item);
            self.head = (self.head + 1) % self.capacity;
            Some(evicted)
        }
    }

    /// Iterate over stored elements, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.len).map(move |i| self.buf[(self.head + i) % self.capacity])
    }

    /// Element at logical position `index` (0 = oldest).
    pub fn get(&self, index: usize) -> Option<T> {
        if index < self.len {
            Some(self.buf[(self.head + index) % self.capacity])
        } else {
            None
        }
    }

    /// Number of valid elements currently stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when the buffer contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of elements the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` when the next push will evict.
    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(buf: &RingBuffer<f32>) -> Vec<f32> {
        buf.iter().collect()
    }

    // ---- Basic push / iterate ----------------------------------------------

    #[test]
    fn push_within_capacity() {
        let mut buf = RingBuffer::new(8);
        for v in [1.0_f32, 2.0, 3.0] {
            assert_eq!(buf.push(v), None);
        }
        assert_eq!(buf.len(), 3);
        assert!(!buf.is_full());
        assert_eq!(contents(&buf), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn push_exactly_capacity() {
        let mut buf = RingBuffer::new(4);
        for v in [1.0_f32, 2.0, 3.0, 4.0] {
            buf.push(v);
        }
        assert!(buf.is_full());
        assert_eq!(contents(&buf), vec![1.0, 2.0, 3.0, 4.0]);
    }

    // ---- Overflow (oldest element evicted) ---------------------------------

    #[test]
    fn overflow_by_one_evicts_oldest() {
        let mut buf = RingBuffer::new(4);
        for v in [1.0_f32, 2.0, 3.0, 4.0] {
            buf.push(v);
        }
        assert_eq!(buf.push(5.0), Some(1.0));

        assert_eq!(buf.len(), 4);
        assert_eq!(contents(&buf), vec![2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn many_wraps_keep_newest_in_order() {
        let mut buf = RingBuffer::new(3);
        for i in 0..20 {
            buf.push(i as f32);
        }
        assert_eq!(buf.len(), 3);
        assert_eq!(contents(&buf), vec![17.0, 18.0, 19.0]);
    }

    #[test]
    fn capacity_one_holds_latest() {
        let mut buf = RingBuffer::new(1);
        buf.push(1.0_f32);
        assert_eq!(buf.push(2.0), Some(1.0));
        assert_eq!(contents(&buf), vec![2.0]);
    }

    // ---- Indexed access ----------------------------------------------------

    #[test]
    fn get_is_relative_to_oldest() {
        let mut buf = RingBuffer::new(3);
        for v in [1.0_f32, 2.0, 3.0, 4.0] {
            buf.push(v);
        }
        assert_eq!(buf.get(0), Some(2.0));
        assert_eq!(buf.get(2), Some(4.0));
        assert_eq!(buf.get(3), None);
    }

    #[test]
    fn new_buffer_is_empty() {
        let buf: RingBuffer<f32> = RingBuffer::new(10);
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 10);
        assert_eq!(buf.get(0), None);
    }

    // ---- Panic guard -------------------------------------------------------

    #[test]
    #[should_panic(expected = "RingBuffer capacity must be > 0")]
    fn zero_capacity_panics() {
        let _buf: RingBuffer<f32> = RingBuffer::new(0);
    }
}
