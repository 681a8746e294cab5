// src/buffer/core.rs
//! Core hybrid buffer structure, construction and the inline-to-heap transition
//!
//! This module provides the fundamental [`HybridBuffer`] type. A buffer starts
//! with its elements stored inline and moves them to a heap allocation the
//! first time it needs more than `N` slots. The move is one-way: a heap buffer
//! stays a heap buffer, even after [`clear`](HybridBuffer::clear).

use crate::config::BufferConfig;
use crate::element::{Element, ElementKind};
use std::fmt;
use zeroize::Zeroize;

/// Inline capacity used when `N` is not given
pub const DEFAULT_INLINE_CAPACITY: usize = 64;

/// Which storage region currently holds a buffer's elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    /// Elements live in the fixed array inside the buffer itself
    Inline,
    /// Elements live in an owned, growable heap allocation
    Heap,
}

/// Active storage region. The tag and the payload cannot disagree.
#[allow(clippy::large_enum_variant)]
pub(crate) enum Storage<T, const N: usize> {
    Inline { data: [T; N], len: usize },
    Heap(Vec<T>),
}

/// A small-vector buffer that keeps up to `N` elements inline.
///
/// Appending element `N + 1` moves the contents to a heap allocation of
/// capacity `N * growth_factor` (2N by default). That transition never
/// reverses. Heap capacity only ever grows.
///
/// Only the scalar kinds implementing [`Element`] are supported: `i64` and `u8`.
/// Byte buffers additionally offer [`simd_equals`](HybridBuffer::simd_equals)
/// and [`simd_sum`](HybridBuffer::simd_sum).
///
/// # Examples
///
/// ```
/// use hybridbuf::HybridBuffer;
///
/// let mut buf: HybridBuffer<i64> = HybridBuffer::new();
/// for i in 0..64 {
///     buf.append(i);
/// }
/// assert!(buf.is_inline());
///
/// buf.append(64);
/// assert!(!buf.is_inline());
/// assert!(buf.capacity() >= 128);
/// assert_eq!(buf.get(64), 64);
/// ```
pub struct HybridBuffer<T: Element, const N: usize = 64> {
    /// Active storage region and its contents
    pub(crate) storage: Storage<T, N>,
    /// Check mode and growth policy, fixed at construction
    pub(crate) config: BufferConfig,
}

impl<T: Element, const N: usize> HybridBuffer<T, N> {
    /// Creates an empty inline buffer with the default configuration.
    ///
    /// Never allocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use hybridbuf::HybridBuffer;
    ///
    /// let buf: HybridBuffer<u8> = HybridBuffer::new();
    /// assert!(buf.is_inline());
    /// assert_eq!(buf.capacity(), 64);
    /// assert_eq!(buf.len(), 0);
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::with_config(BufferConfig::default())
    }

    /// Creates an empty inline buffer with the given configuration.
    #[inline]
    pub fn with_config(config: BufferConfig) -> Self {
        Self {
            storage: Storage::Inline {
                data: [T::default(); N],
                len: 0,
            },
            config,
        }
    }

    /// Creates an empty buffer able to hold `capacity` elements without
    /// reallocating.
    ///
    /// Stays inline when `capacity <= N`; otherwise pre-allocates heap storage
    /// of that capacity and starts in heap mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use hybridbuf::HybridBuffer;
    ///
    /// let small: HybridBuffer<i64> = HybridBuffer::with_capacity(10);
    /// assert!(small.is_inline());
    ///
    /// let large: HybridBuffer<i64> = HybridBuffer::with_capacity(500);
    /// assert!(!large.is_inline());
    /// assert!(large.capacity() >= 500);
    /// ```
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_config(capacity, BufferConfig::default())
    }

    /// Creates an empty buffer with both a requested capacity and a configuration.
    pub fn with_capacity_and_config(capacity: usize, config: BufferConfig) -> Self {
        if capacity <= N {
            return Self::with_config(config);
        }
        tracing::trace!(
            cause = "with_capacity",
            capacity,
            inline_capacity = N,
            "buffer created in heap mode"
        );
        Self {
            storage: Storage::Heap(Vec::with_capacity(capacity)),
            config,
        }
    }

    /// Creates a buffer holding a copy of `values`, appended one by one.
    ///
    /// # Examples
    ///
    /// ```
    /// use hybridbuf::HybridBuffer;
    ///
    /// let buf: HybridBuffer<u8> = HybridBuffer::from_slice(b"hello");
    /// assert_eq!(buf.len(), 5);
    /// assert_eq!(buf.as_slice(), b"hello");
    /// ```
    pub fn from_slice(values: &[T]) -> Self {
        let mut buf = Self::new();
        for &value in values {
            buf.append(value);
        }
        buf
    }

    /// Returns the number of valid elements.
    #[inline(always)]
    pub fn len(&self) -> usize {
        match &self.storage {
            Storage::Inline { len, .. } => *len,
            Storage::Heap(heap) => heap.len(),
        }
    }

    /// Returns `true` if the buffer holds no elements.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the capacity of the active region.
    ///
    /// `N` while inline; the heap allocation's capacity otherwise.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        match &self.storage {
            Storage::Inline { .. } => N,
            Storage::Heap(heap) => heap.capacity(),
        }
    }

    /// Returns the inline capacity `N`.
    #[inline(always)]
    pub const fn inline_capacity(&self) -> usize {
        N
    }

    /// Returns the active storage region.
    #[inline(always)]
    pub fn representation(&self) -> Representation {
        match &self.storage {
            Storage::Inline { .. } => Representation::Inline,
            Storage::Heap(_) => Representation::Heap,
        }
    }

    /// Returns `true` while the elements live inline.
    #[inline(always)]
    pub fn is_inline(&self) -> bool {
        matches!(self.storage, Storage::Inline { .. })
    }

    /// Returns the element width class of this buffer.
    #[inline(always)]
    pub fn element_kind(&self) -> ElementKind {
        T::KIND
    }

    /// Returns the configuration the buffer was built with.
    #[inline(always)]
    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Returns a slice of all valid elements.
    ///
    /// The borrow ties the slice to the buffer, so it cannot outlive a
    /// transition or reallocation.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        match &self.storage {
            Storage::Inline { data, len } => &data[..*len],
            Storage::Heap(heap) => heap.as_slice(),
        }
    }

    /// Returns a mutable slice of all valid elements.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match &mut self.storage {
            Storage::Inline { data, len } => &mut data[..*len],
            Storage::Heap(heap) => heap.as_mut_slice(),
        }
    }

    /// Copies the contents into a freshly allocated `Vec`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hybridbuf::HybridBuffer;
    ///
    /// let buf: HybridBuffer<i64> = HybridBuffer::from_slice(&[3, 1, 2]);
    /// assert_eq!(buf.to_sequence(), vec![3, 1, 2]);
    /// ```
    pub fn to_sequence(&self) -> Vec<T> {
        self.as_slice().to_vec()
    }

    /// Securely zeros the active storage region and empties the buffer.
    ///
    /// Wipes the whole inline array, or the whole heap allocation including
    /// spare capacity left behind by earlier pops. Representation and
    /// capacity are kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use hybridbuf::HybridBuffer;
    ///
    /// let mut buf: HybridBuffer<u8> = HybridBuffer::from_slice(b"secret");
    /// buf.burn();
    /// assert!(buf.is_empty());
    /// assert!(buf.is_inline());
    /// ```
    pub fn burn(&mut self) {
        tracing::debug!(
            representation = ?self.representation(),
            capacity = self.capacity(),
            "burning buffer"
        );
        match &mut self.storage {
            Storage::Inline { data, len } => {
                data.as_mut_slice().zeroize();
                *len = 0;
            }
            // Vec::zeroize wipes len and spare capacity, then clears; the
            // allocation is kept.
            Storage::Heap(heap) => heap.zeroize(),
        }
    }

    /// Moves the inline contents into a new heap allocation of at least
    /// `capacity` slots. No-op in heap mode.
    #[cold]
    #[inline(never)]
    pub(crate) fn spill_to_heap(&mut self, capacity: usize, cause: &'static str) {
        if let Storage::Inline { data, len } = &self.storage {
            let mut heap = Vec::with_capacity(capacity.max(*len));
            heap.extend_from_slice(&data[..*len]);
            tracing::trace!(
                cause,
                len = heap.len(),
                inline_capacity = N,
                heap_capacity = heap.capacity(),
                "inline -> heap"
            );
            self.storage = Storage::Heap(heap);
        }
    }
}

/// Grows a full heap region by the configured factor.
#[cold]
#[inline(never)]
pub(crate) fn grow_heap<T>(heap: &mut Vec<T>, config: &BufferConfig) {
    let old_capacity = heap.capacity();
    let target = config.grown_capacity(old_capacity, heap.len() + 1);
    heap.reserve_exact(target - heap.len());
    tracing::trace!(
        old_capacity,
        new_capacity = heap.capacity(),
        "heap reallocation"
    );
}

impl<T: Element, const N: usize> Default for HybridBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Explicit copy: storage is never shared between the two buffers.
///
/// An inline payload is duplicated bit for bit. A heap payload is copied into
/// a fresh allocation with the same capacity, so the copy is also in heap mode.
impl<T: Element, const N: usize> Clone for HybridBuffer<T, N> {
    fn clone(&self) -> Self {
        let storage = match &self.storage {
            Storage::Inline { data, len } => Storage::Inline {
                data: *data,
                len: *len,
            },
            Storage::Heap(heap) => {
                let mut copy = Vec::with_capacity(heap.capacity());
                copy.extend_from_slice(heap);
                Storage::Heap(copy)
            }
        };
        Self {
            storage,
            config: self.config,
        }
    }
}

impl<T: Element, const N: usize> fmt::Debug for HybridBuffer<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HybridBuffer")
            .field("representation", &self.representation())
            .field("capacity", &self.capacity())
            .field("data", &self.as_slice())
            .finish()
    }
}

/// Compares contents only; representation and capacity are ignored.
impl<T: Element, const N: usize, const M: usize> PartialEq<HybridBuffer<T, M>>
    for HybridBuffer<T, N>
{
    fn eq(&self, other: &HybridBuffer<T, M>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Element + Eq, const N: usize> Eq for HybridBuffer<T, N> {}

impl<T: Element, const N: usize> AsRef<[T]> for HybridBuffer<T, N> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Element, const N: usize> From<&[T]> for HybridBuffer<T, N> {
    fn from(values: &[T]) -> Self {
        Self::from_slice(values)
    }
}

impl<T: Element, const N: usize, const K: usize> From<[T; K]> for HybridBuffer<T, N> {
    fn from(values: [T; K]) -> Self {
        Self::from_slice(&values)
    }
}

impl<T: Element, const N: usize> Zeroize for HybridBuffer<T, N> {
    fn zeroize(&mut self) {
        self.burn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let buf: HybridBuffer<i64> = HybridBuffer::new();
        assert_eq!(buf.capacity(), DEFAULT_INLINE_CAPACITY);
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.representation(), Representation::Inline);
        assert_eq!(buf.element_kind(), ElementKind::Word);
    }

    #[test]
    fn test_custom_inline_capacity() {
        let buf: HybridBuffer<u8, 8> = HybridBuffer::new();
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.inline_capacity(), 8);
        assert_eq!(buf.element_kind(), ElementKind::Byte);
    }

    #[test]
    fn test_with_capacity_boundary() {
        let at_limit: HybridBuffer<u8> = HybridBuffer::with_capacity(64);
        assert!(at_limit.is_inline());

        let past_limit: HybridBuffer<u8> = HybridBuffer::with_capacity(65);
        assert!(!past_limit.is_inline());
        assert!(past_limit.capacity() >= 65);
        assert!(past_limit.is_empty());
    }

    #[test]
    fn test_spill_preserves_contents() {
        let mut buf: HybridBuffer<i64, 4> = HybridBuffer::from_slice(&[1, 2, 3]);
        buf.spill_to_heap(10, "test");
        assert!(!buf.is_inline());
        assert!(buf.capacity() >= 10);
        assert_eq!(buf.as_slice(), &[1, 2, 3]);

        // Second spill is a no-op.
        buf.spill_to_heap(100, "test");
        assert!(buf.capacity() < 100);
    }

    #[test]
    fn test_grow_heap_doubles() {
        let config = BufferConfig::default();
        let mut heap: Vec<i64> = Vec::with_capacity(16);
        heap.extend(0..16);
        grow_heap(&mut heap, &config);
        assert!(heap.capacity() >= 32);
        assert_eq!(heap.len(), 16);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original: HybridBuffer<i64, 4> = HybridBuffer::from_slice(&[1, 2, 3, 4, 5]);
        let copy = original.clone();
        assert!(!copy.is_inline());
        assert_eq!(copy.capacity(), original.capacity());
        assert_ne!(copy.as_slice().as_ptr(), original.as_slice().as_ptr());

        original.as_mut_slice()[0] = 99;
        assert_eq!(copy.as_slice()[0], 1);
    }

    #[test]
    fn test_burn_zeroes_heap_spare_capacity() {
        let mut buf: HybridBuffer<u8, 2> = HybridBuffer::from_slice(&[7, 7, 7, 7]);
        let capacity = buf.capacity();
        buf.burn();
        assert!(buf.is_empty());
        assert!(!buf.is_inline());
        assert_eq!(buf.capacity(), capacity);

        if let Storage::Heap(heap) = &buf.storage {
            // SAFETY: all `capacity` bytes were written by zeroize.
            let spare = unsafe { std::slice::from_raw_parts(heap.as_ptr(), capacity) };
            assert!(spare.iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn test_eq_ignores_representation() {
        let inline: HybridBuffer<u8, 8> = HybridBuffer::from_slice(b"abc");
        let heap: HybridBuffer<u8, 2> = HybridBuffer::from_slice(b"abc");
        assert!(inline.is_inline());
        assert!(!heap.is_inline());
        assert_eq!(inline, heap);
    }

    #[test]
    fn test_debug_output() {
        let buf: HybridBuffer<i64> = HybridBuffer::from([1, 2]);
        let text = format!("{:?}", buf);
        assert!(text.contains("Inline"));
        assert!(text.contains("[1, 2]"));
    }
}
