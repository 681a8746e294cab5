// src/raw.rs
//! Zero-copy raw pointer access into the active storage region
//!
//! A pointer into the inline array dies when the buffer moves or spills to the
//! heap. A pointer into the heap region dies on reallocation, move of the
//! allocation, or drop. Neither lifetime can be expressed through a borrow that
//! callers would accept in hot loops, so this layer hands out raw pointers
//! under an explicit contract:
//!
//! - Ask for the region that is actually active. [`HybridBuffer::inline_ptr`]
//!   and [`HybridBuffer::heap_ptr`] trap on the wrong region;
//!   [`HybridBuffer::raw_view`] picks the right one for you.
//! - Do not dereference a pointer or view after a mutation that could
//!   transition or reallocate (`append`, `reserve`), or after moving the
//!   buffer. [`HybridBuffer::check_view`] detects most stale views.
//!
//! Offsetting a [`RawView`] is O(1) pointer arithmetic; no element is copied.

use crate::buffer::core::{HybridBuffer, Storage};
use crate::buffer::Representation;
use crate::element::Element;
use crate::error::{BufferError, Result, violation};
use std::mem;

/// Pointer, length and region tag of a buffer's contents at one point in time.
///
/// A `RawView` does not borrow the buffer. Reading through it is `unsafe` and
/// only valid while the buffer has not been moved, dropped, transitioned or
/// reallocated since the view (or the view it was derived from) was taken.
///
/// # Examples
///
/// ```
/// use hybridbuf::HybridBuffer;
///
/// let buf: HybridBuffer<u8> = HybridBuffer::from_slice(b"hello world");
/// let word = buf.raw_view().subview(6, 5);
///
/// // SAFETY: `buf` is not mutated or moved while `word` is in use.
/// assert_eq!(unsafe { word.as_slice() }, b"world");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawView<T> {
    ptr: *const T,
    len: usize,
    representation: Representation,
}

impl<T: Element> RawView<T> {
    /// Returns the first element's address.
    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.ptr
    }

    /// Returns the number of elements covered by the view.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the view covers no elements.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the storage region the view points into.
    #[inline(always)]
    pub fn representation(&self) -> Representation {
        self.representation
    }

    /// Returns the view starting `offset` elements further in.
    ///
    /// # Panics
    ///
    /// Panics with [`BufferError::IndexOutOfRange`] if `offset > len()`.
    #[inline]
    #[track_caller]
    pub fn offset(&self, offset: usize) -> Self {
        if offset > self.len {
            violation(BufferError::IndexOutOfRange {
                index: offset,
                len: self.len,
            });
        }
        Self {
            ptr: self.ptr.wrapping_add(offset),
            len: self.len - offset,
            representation: self.representation,
        }
    }

    /// Returns the `count` elements starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics with [`BufferError::IndexOutOfRange`] if the range does not fit
    /// inside the view.
    #[inline]
    #[track_caller]
    pub fn subview(&self, offset: usize, count: usize) -> Self {
        let end = offset.saturating_add(count);
        if end > self.len {
            violation(BufferError::IndexOutOfRange {
                index: end,
                len: self.len,
            });
        }
        Self {
            ptr: self.ptr.wrapping_add(offset),
            len: count,
            representation: self.representation,
        }
    }

    /// Reads the element at `index`.
    ///
    /// # Safety
    ///
    /// The view must still be valid and `index < self.len()`.
    #[inline(always)]
    pub unsafe fn read(&self, index: usize) -> T {
        debug_assert!(index < self.len, "read: index {} >= len {}", index, self.len);

        unsafe { self.ptr.add(index).read() }
    }

    /// Reinterprets the view as a slice.
    ///
    /// # Safety
    ///
    /// The view must still be valid, and stay valid (no mutation, move or drop
    /// of the buffer) for the whole lifetime `'a` chosen by the caller.
    #[inline]
    pub unsafe fn as_slice<'a>(&self) -> &'a [T] {
        unsafe { std::slice::from_raw_parts(self.ptr, self.len) }
    }
}

impl<T: Element, const N: usize> HybridBuffer<T, N> {
    /// Returns a raw pointer to the start of the active region.
    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        match &self.storage {
            Storage::Inline { data, .. } => data.as_ptr(),
            Storage::Heap(heap) => heap.as_ptr(),
        }
    }

    /// Returns a mutable raw pointer to the start of the active region.
    ///
    /// Writes are valid for `capacity()` slots; only the first `len()` are
    /// considered elements.
    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        match &mut self.storage {
            Storage::Inline { data, .. } => data.as_mut_ptr(),
            Storage::Heap(heap) => heap.as_mut_ptr(),
        }
    }

    /// Returns a tagged view of the active region.
    ///
    /// # Examples
    ///
    /// ```
    /// use hybridbuf::{HybridBuffer, Representation};
    ///
    /// let buf: HybridBuffer<i64, 4> = HybridBuffer::from_slice(&[1, 2, 3, 4, 5]);
    /// let view = buf.raw_view();
    /// assert_eq!(view.representation(), Representation::Heap);
    /// assert_eq!(view.len(), 5);
    /// assert_eq!(unsafe { view.offset(3).read(0) }, 4);
    /// ```
    #[inline]
    pub fn raw_view(&self) -> RawView<T> {
        RawView {
            ptr: self.as_ptr(),
            len: self.len(),
            representation: self.representation(),
        }
    }

    /// Returns a pointer into the inline array together with the length.
    ///
    /// # Panics
    ///
    /// Panics with [`BufferError::ContractViolation`] if the buffer is in heap mode.
    #[inline]
    #[track_caller]
    pub fn inline_ptr(&self) -> (*const T, usize) {
        match &self.storage {
            Storage::Inline { data, len } => (data.as_ptr(), *len),
            Storage::Heap(_) => violation(BufferError::ContractViolation(
                "inline pointer requested while the buffer is in heap mode".into(),
            )),
        }
    }

    /// Returns a pointer into the heap allocation together with the length.
    ///
    /// # Panics
    ///
    /// Panics with [`BufferError::ContractViolation`] if the buffer is inline.
    #[inline]
    #[track_caller]
    pub fn heap_ptr(&self) -> (*const T, usize) {
        match &self.storage {
            Storage::Heap(heap) => (heap.as_ptr(), heap.len()),
            Storage::Inline { .. } => violation(BufferError::ContractViolation(
                "heap pointer requested while the buffer is inline".into(),
            )),
        }
    }

    /// Checks that `view` still points into this buffer's active region and
    /// covers only valid elements.
    ///
    /// Catches views taken before a transition, reallocation or move, and
    /// views extending past the current length. A reallocation that happens
    /// to return the same address cannot be told apart from no reallocation.
    ///
    /// # Examples
    ///
    /// ```
    /// use hybridbuf::HybridBuffer;
    ///
    /// let mut buf: HybridBuffer<u8, 4> = HybridBuffer::from_slice(&[1, 2, 3, 4]);
    /// let view = buf.raw_view();
    /// assert!(buf.check_view(&view).is_ok());
    ///
    /// buf.append(5); // spills to the heap
    /// assert!(buf.check_view(&view).is_err());
    /// ```
    pub fn check_view(&self, view: &RawView<T>) -> Result<()> {
        let representation = self.representation();
        if view.representation != representation {
            return Err(BufferError::ContractViolation(format!(
                "view taken in {:?} mode, buffer is now in {:?} mode",
                view.representation, representation
            )));
        }

        let width = mem::size_of::<T>();
        let base = self.as_ptr() as usize;
        let addr = view.ptr as usize;
        let in_region = addr >= base && (addr - base) % width == 0;
        if !in_region || (addr - base) / width + view.len > self.len() {
            return Err(BufferError::ContractViolation(format!(
                "stale view: {} elements at {:#x}, buffer holds {} elements at {:#x}",
                view.len,
                addr,
                self.len(),
                base
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_view_matches_indexing<const N: usize>(buf: &HybridBuffer<i64, N>) {
        let view = buf.raw_view();
        for offset in 0..=buf.len() {
            for count in 0..=(buf.len() - offset) {
                let window = view.subview(offset, count);
                let expected: Vec<i64> = (offset..offset + count).map(|i| buf.get(i)).collect();
                assert_eq!(unsafe { window.as_slice() }, expected.as_slice());
            }
        }
    }

    #[test]
    fn test_offset_reads_match_get_inline() {
        let buf: HybridBuffer<i64, 16> = HybridBuffer::from_slice(&[5, 9, -3, 0, 12, 7, 1, 8]);
        assert!(buf.is_inline());
        assert_view_matches_indexing(&buf);
    }

    #[test]
    fn test_offset_reads_match_get_heap() {
        let values: Vec<i64> = (0..24).map(|i| i * i - 40).collect();
        let buf: HybridBuffer<i64, 8> = HybridBuffer::from_slice(&values);
        assert!(!buf.is_inline());
        assert_view_matches_indexing(&buf);
    }

    #[test]
    fn test_offset_shrinks_view() {
        let buf: HybridBuffer<u8> = HybridBuffer::from_slice(b"abcdef");
        let tail = buf.raw_view().offset(4);
        assert_eq!(tail.len(), 2);
        assert_eq!(unsafe { tail.read(1) }, b'f');
        assert!(buf.raw_view().offset(6).is_empty());
    }

    #[test]
    #[should_panic(expected = "Index out of range")]
    fn test_offset_past_end_traps() {
        let buf: HybridBuffer<u8> = HybridBuffer::from_slice(b"ab");
        let _ = buf.raw_view().offset(3);
    }

    #[test]
    #[should_panic(expected = "Index out of range")]
    fn test_subview_past_end_traps() {
        let buf: HybridBuffer<u8> = HybridBuffer::from_slice(b"abc");
        let _ = buf.raw_view().subview(2, 2);
    }

    #[test]
    fn test_region_accessors() {
        let mut buf: HybridBuffer<u8, 2> = HybridBuffer::from_slice(&[1, 2]);
        let (ptr, len) = buf.inline_ptr();
        assert_eq!(ptr, buf.as_ptr());
        assert_eq!(len, 2);

        buf.append(3);
        let (ptr, len) = buf.heap_ptr();
        assert_eq!(ptr, buf.as_ptr());
        assert_eq!(len, 3);
    }

    #[test]
    #[should_panic(expected = "Contract violation")]
    fn test_heap_ptr_on_inline_traps() {
        let buf: HybridBuffer<u8> = HybridBuffer::new();
        let _ = buf.heap_ptr();
    }

    #[test]
    #[should_panic(expected = "Contract violation")]
    fn test_inline_ptr_on_heap_traps() {
        let buf: HybridBuffer<u8> = HybridBuffer::with_capacity(100);
        let _ = buf.inline_ptr();
    }

    #[test]
    fn test_check_view_detects_shrink_and_subviews() {
        let mut buf: HybridBuffer<i64> = HybridBuffer::from_slice(&[1, 2, 3, 4]);
        let inner = buf.raw_view().subview(1, 2);
        assert!(buf.check_view(&inner).is_ok());

        buf.pop();
        assert!(buf.check_view(&inner).is_ok());
        buf.pop();
        assert!(matches!(
            buf.check_view(&inner),
            Err(BufferError::ContractViolation(_))
        ));
    }

    #[test]
    fn test_check_view_rejects_foreign_allocation() {
        let buf: HybridBuffer<i64, 2> = HybridBuffer::from_slice(&[1, 2, 3]);
        let view = buf.raw_view();
        let copy = buf.clone();
        assert!(buf.check_view(&view).is_ok());
        assert!(copy.check_view(&view).is_err());
    }

    #[test]
    fn test_check_view_detects_move_of_inline_storage() {
        let buf: HybridBuffer<u8> = HybridBuffer::from_slice(b"inline");
        let view = buf.raw_view();
        let moved = Box::new(buf);
        assert!(moved.check_view(&view).is_err());
    }

    #[test]
    fn test_mut_ptr_writes_visible() {
        let mut buf: HybridBuffer<u8> = HybridBuffer::from_slice(&[0, 0, 0]);
        unsafe { buf.as_mut_ptr().add(1).write(9) };
        assert_eq!(buf.as_slice(), &[0, 9, 0]);
    }
}
