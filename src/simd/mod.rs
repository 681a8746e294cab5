// src/simd/mod.rs
//! SIMD bulk operations over byte buffers

mod kernels;

pub use kernels::{CHUNK_WIDTH, MAX_SAFE_SUM_LEN, bytes_equal, bytes_sum};

use crate::buffer::HybridBuffer;

impl<const N: usize> HybridBuffer<u8, N> {
    /// Compares contents chunk by chunk with vector XOR reductions.
    ///
    /// Returns `false` straight away when the lengths differ, so a prefix never
    /// equals the longer buffer. Representation and inline capacity do not
    /// matter. Allocates nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use hybridbuf::HybridBuffer;
    ///
    /// let bytes: Vec<u8> = (0..64).collect();
    /// let a: HybridBuffer<u8> = HybridBuffer::from_slice(&bytes);
    /// let mut b: HybridBuffer<u8> = HybridBuffer::from_slice(&bytes);
    /// assert!(a.simd_equals(&b));
    ///
    /// b.set(30, 0xFF);
    /// assert!(!a.simd_equals(&b));
    /// ```
    pub fn simd_equals<const M: usize>(&self, other: &HybridBuffer<u8, M>) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let (left, right) = (self.raw_view(), other.raw_view());
        // SAFETY: both views come from live shared borrows held for the whole call.
        let (left, right) = unsafe { (left.as_slice(), right.as_slice()) };
        bytes_equal(left, right)
    }

    /// Sums all bytes with widening vector adds.
    ///
    /// Exact for up to [`MAX_SAFE_SUM_LEN`] bytes, far beyond any addressable
    /// buffer. Allocates nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use hybridbuf::HybridBuffer;
    ///
    /// let bytes: Vec<u8> = (0..64).collect();
    /// let buf: HybridBuffer<u8> = HybridBuffer::from_slice(&bytes);
    /// assert_eq!(buf.simd_sum(), 2016);
    /// ```
    pub fn simd_sum(&self) -> u64 {
        let view = self.raw_view();
        // SAFETY: the view comes from a live shared borrow held for the whole call.
        bytes_sum(unsafe { view.as_slice() })
    }
}

#[cfg(test)]
mod tests {
    use crate::HybridBuffer;

    #[test]
    fn test_sum_inline_and_heap() {
        let bytes: Vec<u8> = (0..=16).collect();
        let inline: HybridBuffer<u8> = HybridBuffer::from_slice(&bytes);
        let heap: HybridBuffer<u8, 4> = HybridBuffer::from_slice(&bytes);
        assert!(inline.is_inline());
        assert!(!heap.is_inline());
        assert_eq!(inline.simd_sum(), 136);
        assert_eq!(heap.simd_sum(), 136);
    }

    #[test]
    fn test_sum_empty() {
        let buf: HybridBuffer<u8> = HybridBuffer::new();
        assert_eq!(buf.simd_sum(), 0);
    }

    #[test]
    fn test_equals_across_representations() {
        let bytes: Vec<u8> = (0..40).map(|i| i * 3).collect();
        let inline: HybridBuffer<u8> = HybridBuffer::from_slice(&bytes);
        let heap: HybridBuffer<u8, 8> = HybridBuffer::from_slice(&bytes);
        assert!(inline.simd_equals(&heap));
        assert!(heap.simd_equals(&inline));
    }

    #[test]
    fn test_equals_remainder_byte_differs() {
        let bytes: Vec<u8> = (0..35).collect();
        let a: HybridBuffer<u8> = HybridBuffer::from_slice(&bytes);
        let mut b = a.clone();
        b.set(34, 200);
        assert!(!a.simd_equals(&b));
    }

    #[test]
    fn test_equals_ignores_stale_bytes_past_len() {
        let mut a: HybridBuffer<u8> = HybridBuffer::from_slice(&[1, 2, 3, 4]);
        let b: HybridBuffer<u8> = HybridBuffer::from_slice(&[1, 2, 3]);
        a.pop();
        assert!(a.simd_equals(&b));
    }
}
