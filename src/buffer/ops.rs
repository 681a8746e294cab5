// src/buffer/ops.rs
//! Element operations: append, pop, indexed access, clear and reserve
//!
//! The plain methods trap on misuse. Each has a `try_*` twin that returns the
//! same [`BufferError`] as a value.

use super::core::{HybridBuffer, Storage, grow_heap};
use crate::element::Element;
use crate::error::{BufferError, Result, ResultExt};

impl<T: Element, const N: usize> HybridBuffer<T, N> {
    /// Appends an element, moving to heap storage when the inline array is full.
    ///
    /// Amortized O(1). The append that finds `N` inline elements allocates
    /// `N * growth_factor` heap slots and copies the inline contents over; a
    /// full heap region grows by the same factor.
    ///
    /// # Examples
    ///
    /// ```
    /// use hybridbuf::HybridBuffer;
    ///
    /// let mut buf: HybridBuffer<u8, 4> = HybridBuffer::new();
    /// for b in 0..4 {
    ///     buf.append(b);
    /// }
    /// assert!(buf.is_inline());
    ///
    /// buf.append(4);
    /// assert!(!buf.is_inline());
    /// assert_eq!(buf.capacity(), 8);
    /// ```
    #[inline]
    pub fn append(&mut self, value: T) {
        if let Storage::Inline { data, len } = &mut self.storage {
            if *len < N {
                data[*len] = value;
                *len += 1;
                return;
            }
            let capacity = self.config.grown_capacity(N, N + 1);
            self.spill_to_heap(capacity, "append");
        }
        if let Storage::Heap(heap) = &mut self.storage {
            if heap.len() == heap.capacity() {
                grow_heap(heap, &self.config);
            }
            heap.push(value);
        }
    }

    /// Removes and returns the last element.
    ///
    /// Never changes the representation.
    ///
    /// # Panics
    ///
    /// Panics with [`BufferError::EmptyBuffer`] if the buffer is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use hybridbuf::HybridBuffer;
    ///
    /// let mut buf: HybridBuffer<i64> = HybridBuffer::from_slice(&[1, 2, 3]);
    /// assert_eq!(buf.pop(), 3);
    /// assert_eq!(buf.pop(), 2);
    /// assert_eq!(buf.len(), 1);
    /// ```
    #[inline]
    #[track_caller]
    pub fn pop(&mut self) -> T {
        self.try_pop().or_trap()
    }

    /// Removes and returns the last element, or reports an empty buffer.
    #[inline]
    pub fn try_pop(&mut self) -> Result<T> {
        match &mut self.storage {
            Storage::Inline { data, len } => {
                if *len == 0 {
                    return Err(BufferError::EmptyBuffer { op: "pop" });
                }
                *len -= 1;
                Ok(data[*len])
            }
            Storage::Heap(heap) => heap.pop().ok_or(BufferError::EmptyBuffer { op: "pop" }),
        }
    }

    /// Returns the element at `index`.
    ///
    /// In [`CheckMode::Checked`](crate::CheckMode::Checked) an index at or past
    /// `len()` traps. In `Unchecked` mode the logical-length check is only a
    /// `debug_assert!`; release builds read whatever the active region holds at
    /// that slot, or panic if the region itself is too short.
    ///
    /// # Panics
    ///
    /// Panics with [`BufferError::IndexOutOfRange`] if `index >= len()` in
    /// checked mode.
    #[inline]
    #[track_caller]
    pub fn get(&self, index: usize) -> T {
        if self.config.is_checked() {
            return self.try_get(index).or_trap();
        }
        debug_assert!(
            index < self.len(),
            "get: index {} >= len {}",
            index,
            self.len()
        );
        match &self.storage {
            Storage::Inline { data, .. } => data[index],
            Storage::Heap(heap) => heap[index],
        }
    }

    /// Returns the element at `index`, or reports an out-of-range index.
    #[inline]
    pub fn try_get(&self, index: usize) -> Result<T> {
        self.as_slice()
            .get(index)
            .copied()
            .ok_or(BufferError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    /// Overwrites the element at `index`.
    ///
    /// Follows the same check-mode rules as [`get`](Self::get).
    ///
    /// # Panics
    ///
    /// Panics with [`BufferError::IndexOutOfRange`] if `index >= len()` in
    /// checked mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use hybridbuf::HybridBuffer;
    ///
    /// let mut buf: HybridBuffer<i64> = HybridBuffer::from_slice(&[0, 0, 0]);
    /// buf.set(1, 42);
    /// assert_eq!(buf.get(1), 42);
    /// ```
    #[inline]
    #[track_caller]
    pub fn set(&mut self, index: usize, value: T) {
        if self.config.is_checked() {
            return self.try_set(index, value).or_trap();
        }
        debug_assert!(
            index < self.len(),
            "set: index {} >= len {}",
            index,
            self.len()
        );
        match &mut self.storage {
            Storage::Inline { data, .. } => data[index] = value,
            Storage::Heap(heap) => heap[index] = value,
        }
    }

    /// Overwrites the element at `index`, or reports an out-of-range index.
    #[inline]
    pub fn try_set(&mut self, index: usize, value: T) -> Result<()> {
        let len = self.len();
        match self.as_mut_slice().get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(BufferError::IndexOutOfRange { index, len }),
        }
    }

    /// Returns the first element.
    ///
    /// # Panics
    ///
    /// Panics with [`BufferError::EmptyBuffer`] if the buffer is empty.
    #[inline]
    #[track_caller]
    pub fn first(&self) -> T {
        self.try_first().or_trap()
    }

    /// Returns the first element, or reports an empty buffer.
    #[inline]
    pub fn try_first(&self) -> Result<T> {
        self.as_slice()
            .first()
            .copied()
            .ok_or(BufferError::EmptyBuffer { op: "first" })
    }

    /// Returns the last element.
    ///
    /// # Panics
    ///
    /// Panics with [`BufferError::EmptyBuffer`] if the buffer is empty.
    #[inline]
    #[track_caller]
    pub fn last(&self) -> T {
        self.try_last().or_trap()
    }

    /// Returns the last element, or reports an empty buffer.
    #[inline]
    pub fn try_last(&self) -> Result<T> {
        self.as_slice()
            .last()
            .copied()
            .ok_or(BufferError::EmptyBuffer { op: "last" })
    }

    /// Removes all elements.
    ///
    /// Keeps the representation and any heap capacity: a heap buffer does
    /// not return to inline mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use hybridbuf::HybridBuffer;
    ///
    /// let mut buf: HybridBuffer<i64, 2> = HybridBuffer::from_slice(&[1, 2, 3]);
    /// let capacity = buf.capacity();
    /// buf.clear();
    /// assert!(buf.is_empty());
    /// assert!(!buf.is_inline());
    /// assert_eq!(buf.capacity(), capacity);
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        match &mut self.storage {
            Storage::Inline { len, .. } => *len = 0,
            Storage::Heap(heap) => heap.clear(),
        }
    }

    /// Moves an inline buffer to heap storage of at least `min_capacity` slots
    /// when `min_capacity > N`.
    ///
    /// The allocation is sized to the request, not to the growth factor. A
    /// no-op for inline buffers with `min_capacity <= N` and for every heap
    /// buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use hybridbuf::HybridBuffer;
    ///
    /// let mut buf: HybridBuffer<u8> = HybridBuffer::new();
    /// buf.reserve(100);
    /// assert!(!buf.is_inline());
    /// assert!(buf.capacity() >= 100);
    /// ```
    pub fn reserve(&mut self, min_capacity: usize) {
        if min_capacity > N && self.is_inline() {
            self.spill_to_heap(min_capacity, "reserve");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BufferConfig;

    #[test]
    fn test_append_spills_at_capacity() {
        let mut buf: HybridBuffer<i64, 4> = HybridBuffer::new();
        for i in 0..4 {
            buf.append(i);
            assert!(buf.is_inline());
        }
        buf.append(4);
        assert!(!buf.is_inline());
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.as_slice(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_heap_growth_factor() {
        let config = BufferConfig::default().with_growth_factor(3);
        let mut buf: HybridBuffer<u8, 2> = HybridBuffer::with_config(config);
        buf.append(1);
        buf.append(2);
        buf.append(3);
        assert_eq!(buf.capacity(), 6);

        for b in 4..=7 {
            buf.append(b);
        }
        assert!(buf.capacity() >= 18);
        assert_eq!(buf.as_slice(), &[1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_zero_inline_capacity() {
        let mut buf: HybridBuffer<i64, 0> = HybridBuffer::new();
        assert!(buf.is_inline());
        buf.append(5);
        assert!(!buf.is_inline());
        assert_eq!(buf.get(0), 5);
    }

    #[test]
    fn test_pop_lifo_across_modes() {
        let mut buf: HybridBuffer<i64, 3> = HybridBuffer::from_slice(&[1, 2, 3, 4, 5]);
        for expected in (1..=5).rev() {
            assert_eq!(buf.pop(), expected);
        }
        assert!(!buf.is_inline());
        assert!(buf.try_pop().is_err());
    }

    #[test]
    #[should_panic(expected = "Empty buffer: `pop`")]
    fn test_pop_empty_traps() {
        let mut buf: HybridBuffer<u8> = HybridBuffer::new();
        buf.pop();
    }

    #[test]
    #[should_panic(expected = "Index out of range")]
    fn test_get_past_len_traps_when_checked() {
        let buf: HybridBuffer<u8> = HybridBuffer::from_slice(&[1, 2]);
        buf.get(2);
    }

    #[test]
    #[should_panic(expected = "Index out of range")]
    fn test_set_past_len_traps_when_checked() {
        let mut buf: HybridBuffer<u8> = HybridBuffer::from_slice(&[1, 2]);
        buf.set(5, 0);
    }

    #[test]
    fn test_try_variants_report_errors() {
        let mut buf: HybridBuffer<i64> = HybridBuffer::new();
        assert_eq!(buf.try_first(), Err(BufferError::EmptyBuffer { op: "first" }));
        assert_eq!(buf.try_last(), Err(BufferError::EmptyBuffer { op: "last" }));
        assert_eq!(
            buf.try_get(0),
            Err(BufferError::IndexOutOfRange { index: 0, len: 0 })
        );
        assert_eq!(
            buf.try_set(3, 1),
            Err(BufferError::IndexOutOfRange { index: 3, len: 0 })
        );

        buf.append(10);
        buf.append(20);
        assert_eq!(buf.try_first(), Ok(10));
        assert_eq!(buf.try_last(), Ok(20));
    }

    #[test]
    fn test_unchecked_mode_in_range_access() {
        let mut buf: HybridBuffer<i64, 4> = HybridBuffer::with_config(BufferConfig::unchecked());
        for i in 0..6 {
            buf.append(i * 10);
        }
        buf.set(5, -1);
        assert_eq!(buf.get(0), 0);
        assert_eq!(buf.get(5), -1);
    }

    #[test]
    fn test_clear_keeps_inline_mode() {
        let mut buf: HybridBuffer<u8> = HybridBuffer::from_slice(&[1, 2, 3]);
        buf.clear();
        assert!(buf.is_inline());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_reserve_rules() {
        let mut buf: HybridBuffer<i64, 8> = HybridBuffer::from_slice(&[1, 2]);
        buf.reserve(8);
        assert!(buf.is_inline());

        buf.reserve(20);
        assert!(!buf.is_inline());
        assert!(buf.capacity() >= 20);
        assert_eq!(buf.as_slice(), &[1, 2]);

        let capacity = buf.capacity();
        buf.reserve(1000);
        assert_eq!(buf.capacity(), capacity);
    }
}
