// src/span.rs
//! Read-only span over a snapshot of a buffer's contents
//!
//! A [`Span`] is built from [`HybridBuffer::to_sequence`] and owns its copy.
//! Slicing a span copies again. Whether spans should become borrowed,
//! zero-copy views tied to the buffer's lifetime is still open; nothing in the
//! buffer core depends on the answer. For zero-copy access today use
//! [`HybridBuffer::as_slice`] or [`HybridBuffer::raw_view`].

use crate::buffer::HybridBuffer;
use crate::element::Element;
use crate::error::{BufferError, violation};

/// Owned, read-only snapshot of a run of elements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Span<T> {
    data: Vec<T>,
}

impl<T: Element> Span<T> {
    /// Wraps an exported sequence.
    pub fn from_sequence(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the span holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the element at `index`, if any.
    #[inline]
    pub fn get(&self, index: usize) -> Option<T> {
        self.data.get(index).copied()
    }

    /// Returns the elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Copies elements `start..end` into a new span.
    ///
    /// # Panics
    ///
    /// Panics with [`BufferError::IndexOutOfRange`] if `start > end` or
    /// `end > len()`.
    #[track_caller]
    pub fn slice(&self, start: usize, end: usize) -> Self {
        if start > end || end > self.data.len() {
            violation(BufferError::IndexOutOfRange {
                index: if start > end { start } else { end },
                len: self.data.len(),
            });
        }
        Self::from_sequence(self.data[start..end].to_vec())
    }
}

impl<T: Element> AsRef<[T]> for Span<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Element, const N: usize> HybridBuffer<T, N> {
    /// Returns a span over a snapshot of the current contents.
    ///
    /// # Examples
    ///
    /// ```
    /// use hybridbuf::HybridBuffer;
    ///
    /// let mut buf: HybridBuffer<i64> = HybridBuffer::from_slice(&[1, 2, 3]);
    /// let span = buf.as_span();
    /// buf.set(0, 100);
    /// assert_eq!(span.get(0), Some(1));
    /// ```
    pub fn as_span(&self) -> Span<T> {
        Span::from_sequence(self.to_sequence())
    }

    /// Returns a span over a snapshot of elements `start..end`.
    ///
    /// # Panics
    ///
    /// Panics with [`BufferError::IndexOutOfRange`] if the range is invalid.
    #[track_caller]
    pub fn slice(&self, start: usize, end: usize) -> Span<T> {
        self.as_span().slice(start, end)
    }
}
