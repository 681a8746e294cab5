// src/buffer/unsafe_ops.rs
//! Unchecked (unsafe) element operations for maximum performance

use super::core::{HybridBuffer, Storage};
use crate::element::Element;

impl<T: Element, const N: usize> HybridBuffer<T, N> {
    /// Reads the element at `index` without bounds checking.
    ///
    /// # Safety
    ///
    /// Caller MUST guarantee: `index < self.len()`.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, index: usize) -> T {
        debug_assert!(
            index < self.len(),
            "get_unchecked: index {} >= len {}",
            index,
            self.len()
        );

        unsafe { self.as_ptr().add(index).read() }
    }

    /// Overwrites the element at `index` without bounds checking.
    ///
    /// # Safety
    ///
    /// Caller MUST guarantee: `index < self.len()`.
    #[inline(always)]
    pub unsafe fn set_unchecked(&mut self, index: usize, value: T) {
        debug_assert!(
            index < self.len(),
            "set_unchecked: index {} >= len {}",
            index,
            self.len()
        );

        unsafe { self.as_mut_ptr().add(index).write(value) };
    }

    /// Appends an element without checking for spare capacity.
    ///
    /// Never transitions or reallocates.
    ///
    /// # Safety
    ///
    /// Caller MUST guarantee: `self.len() < self.capacity()`.
    #[inline(always)]
    pub unsafe fn append_unchecked(&mut self, value: T) {
        debug_assert!(
            self.len() < self.capacity(),
            "append_unchecked: len {} == capacity {}",
            self.len(),
            self.capacity()
        );

        match &mut self.storage {
            Storage::Inline { data, len } => {
                unsafe { data.as_mut_ptr().add(*len).write(value) };
                *len += 1;
            }
            Storage::Heap(heap) => {
                let len = heap.len();
                unsafe {
                    heap.as_mut_ptr().add(len).write(value);
                    heap.set_len(len + 1);
                }
            }
        }
    }
}
