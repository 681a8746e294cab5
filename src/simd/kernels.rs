// src/simd/kernels.rs
//! Chunked byte kernels: XOR-reduce equality and widening sum
//!
//! Every kernel walks `CHUNK_WIDTH`-byte chunks with vector instructions and
//! leaves the trailing `len % CHUNK_WIDTH` bytes to a scalar loop.
//!
//! Equality XORs the two chunks lane by lane and sums the XOR lanes as
//! *unsigned* values. A lane is zero iff its bytes match, and a sum of
//! non-negative lanes is zero iff every lane is zero. Reading lanes as signed
//! would let `0x01 + 0xFF` cancel out, so only unsigned reductions are used.
//!
//! Sum widens each byte before adding so no lane overflows. The running total
//! is a `u64`: every byte adds at most 255, so lengths up to
//! [`MAX_SAFE_SUM_LEN`] cannot overflow it.

/// Bytes per vector chunk
pub const CHUNK_WIDTH: usize = 16;

/// Longest byte sequence whose sum is guaranteed to fit the `u64` accumulator
/// (`u64::MAX / 255`, about 7.2e16 bytes).
pub const MAX_SAFE_SUM_LEN: u64 = u64::MAX / 255;

/// Returns `true` if both slices have the same length and contents.
///
/// # Examples
///
/// ```
/// use hybridbuf::simd::bytes_equal;
///
/// let a = [7u8; 40];
/// let mut b = a;
/// assert!(bytes_equal(&a, &b));
///
/// b[33] = 0;
/// assert!(!bytes_equal(&a, &b));
/// assert!(!bytes_equal(&a, &a[..39]));
/// ```
pub fn bytes_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let split = a.len() - a.len() % CHUNK_WIDTH;
    let (a_chunks, a_tail) = a.split_at(split);
    let (b_chunks, b_tail) = b.split_at(split);

    chunks_equal(a_chunks, b_chunks) && a_tail.iter().zip(b_tail).all(|(x, y)| x == y)
}

/// Returns the sum of all bytes.
///
/// Exact for any slice up to [`MAX_SAFE_SUM_LEN`] bytes.
///
/// # Examples
///
/// ```
/// use hybridbuf::simd::bytes_sum;
///
/// let bytes: Vec<u8> = (0..=16).collect();
/// assert_eq!(bytes_sum(&bytes), 136);
/// ```
pub fn bytes_sum(bytes: &[u8]) -> u64 {
    let split = bytes.len() - bytes.len() % CHUNK_WIDTH;
    let (chunks, tail) = bytes.split_at(split);

    let mut total = chunks_sum(chunks);
    for &byte in tail {
        total += u64::from(byte);
    }
    total
}

#[cfg(target_arch = "x86_64")]
#[inline]
fn chunks_equal(a: &[u8], b: &[u8]) -> bool {
    debug_assert!(a.len() == b.len() && a.len() % CHUNK_WIDTH == 0);
    // SAFETY: both slices are readable for `a.len()` bytes.
    unsafe { x86::chunks_equal(a.as_ptr(), b.as_ptr(), a.len()) }
}

#[cfg(target_arch = "x86_64")]
#[inline]
fn chunks_sum(bytes: &[u8]) -> u64 {
    debug_assert!(bytes.len() % CHUNK_WIDTH == 0);
    // SAFETY: the slice is readable for `bytes.len()` bytes.
    unsafe { x86::chunks_sum(bytes.as_ptr(), bytes.len()) }
}

#[cfg(target_arch = "aarch64")]
#[inline]
fn chunks_equal(a: &[u8], b: &[u8]) -> bool {
    debug_assert!(a.len() == b.len() && a.len() % CHUNK_WIDTH == 0);
    // SAFETY: both slices are readable for `a.len()` bytes.
    unsafe { neon::chunks_equal(a.as_ptr(), b.as_ptr(), a.len()) }
}

#[cfg(target_arch = "aarch64")]
#[inline]
fn chunks_sum(bytes: &[u8]) -> u64 {
    debug_assert!(bytes.len() % CHUNK_WIDTH == 0);
    // SAFETY: the slice is readable for `bytes.len()` bytes.
    unsafe { neon::chunks_sum(bytes.as_ptr(), bytes.len()) }
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline]
fn chunks_equal(a: &[u8], b: &[u8]) -> bool {
    portable::chunks_equal(a, b)
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline]
fn chunks_sum(bytes: &[u8]) -> u64 {
    portable::chunks_sum(bytes)
}

/// SSE2 kernels. SSE2 is part of the x86_64 baseline, so no runtime detection.
#[cfg(target_arch = "x86_64")]
mod x86 {
    use super::CHUNK_WIDTH;
    use std::arch::x86_64::*;

    /// # Safety
    ///
    /// `a` and `b` must be readable for `len` bytes; `len % CHUNK_WIDTH == 0`.
    #[inline]
    pub(super) unsafe fn chunks_equal(a: *const u8, b: *const u8, len: usize) -> bool {
        let zero = unsafe { _mm_setzero_si128() };
        let mut offset = 0;
        while offset < len {
            let diff = unsafe {
                let va = _mm_loadu_si128(a.add(offset) as *const __m128i);
                let vb = _mm_loadu_si128(b.add(offset) as *const __m128i);
                _mm_xor_si128(va, vb)
            };
            // SAD against zero: unsigned sum of each 8-lane half into a u64.
            let sums = unsafe { _mm_sad_epu8(diff, zero) };
            if unsafe { horizontal_sum(sums) } != 0 {
                return false;
            }
            offset += CHUNK_WIDTH;
        }
        true
    }

    /// # Safety
    ///
    /// `ptr` must be readable for `len` bytes; `len % CHUNK_WIDTH == 0`.
    #[inline]
    pub(super) unsafe fn chunks_sum(ptr: *const u8, len: usize) -> u64 {
        let zero = unsafe { _mm_setzero_si128() };
        let mut acc = zero;
        let mut offset = 0;
        while offset < len {
            unsafe {
                let chunk = _mm_loadu_si128(ptr.add(offset) as *const __m128i);
                // Each half widens to at most 8 * 255 inside a u64 lane.
                acc = _mm_add_epi64(acc, _mm_sad_epu8(chunk, zero));
            }
            offset += CHUNK_WIDTH;
        }
        unsafe { horizontal_sum(acc) }
    }

    #[inline(always)]
    unsafe fn horizontal_sum(v: __m128i) -> u64 {
        unsafe {
            let lo = _mm_cvtsi128_si64(v) as u64;
            let hi = _mm_cvtsi128_si64(_mm_unpackhi_epi64(v, v)) as u64;
            lo + hi
        }
    }
}

/// NEON kernels. NEON is part of the aarch64 baseline.
#[cfg(target_arch = "aarch64")]
mod neon {
    use super::CHUNK_WIDTH;
    use std::arch::aarch64::*;

    /// # Safety
    ///
    /// `a` and `b` must be readable for `len` bytes; `len % CHUNK_WIDTH == 0`.
    #[inline]
    pub(super) unsafe fn chunks_equal(a: *const u8, b: *const u8, len: usize) -> bool {
        let mut offset = 0;
        while offset < len {
            // Widening unsigned add across all 16 lanes; at most 16 * 255.
            let sum = unsafe {
                let diff = veorq_u8(vld1q_u8(a.add(offset)), vld1q_u8(b.add(offset)));
                vaddlvq_u8(diff)
            };
            if sum != 0 {
                return false;
            }
            offset += CHUNK_WIDTH;
        }
        true
    }

    /// # Safety
    ///
    /// `ptr` must be readable for `len` bytes; `len % CHUNK_WIDTH == 0`.
    #[inline]
    pub(super) unsafe fn chunks_sum(ptr: *const u8, len: usize) -> u64 {
        let mut total = 0u64;
        let mut offset = 0;
        while offset < len {
            total += u64::from(unsafe { vaddlvq_u8(vld1q_u8(ptr.add(offset))) });
            offset += CHUNK_WIDTH;
        }
        total
    }
}

/// Lane-array kernels for targets without a vector path.
#[cfg(any(test, not(any(target_arch = "x86_64", target_arch = "aarch64"))))]
mod portable {
    use super::CHUNK_WIDTH;

    #[inline(always)]
    fn lane_sum(lanes: &[u8]) -> u32 {
        lanes.iter().map(|&lane| u32::from(lane)).sum()
    }

    pub(super) fn chunks_equal(a: &[u8], b: &[u8]) -> bool {
        a.chunks_exact(CHUNK_WIDTH)
            .zip(b.chunks_exact(CHUNK_WIDTH))
            .all(|(ca, cb)| {
                let mut diff = [0u8; CHUNK_WIDTH];
                for (lane, (x, y)) in diff.iter_mut().zip(ca.iter().zip(cb)) {
                    *lane = x ^ y;
                }
                lane_sum(&diff) == 0
            })
    }

    pub(super) fn chunks_sum(bytes: &[u8]) -> u64 {
        bytes
            .chunks_exact(CHUNK_WIDTH)
            .map(|chunk| u64::from(lane_sum(chunk)))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i.wrapping_mul(37) ^ (i >> 3)) as u8).collect()
    }

    #[test]
    fn test_sum_matches_scalar_across_lengths() {
        for len in [0, 1, 15, 16, 17, 31, 32, 33, 64, 100, 1000] {
            let bytes = pattern(len);
            let expected: u64 = bytes.iter().map(|&b| u64::from(b)).sum();
            assert_eq!(bytes_sum(&bytes), expected, "len {}", len);
        }
    }

    #[test]
    fn test_sum_all_max_bytes() {
        let bytes = vec![0xFFu8; 4096 + 5];
        assert_eq!(bytes_sum(&bytes), 255 * (4096 + 5));
    }

    #[test]
    fn test_equal_detects_every_position() {
        let a = pattern(53);
        for i in 0..a.len() {
            let mut b = a.clone();
            b[i] ^= 0x80;
            assert!(!bytes_equal(&a, &b), "flip at {}", i);
        }
        assert!(bytes_equal(&a, &a.clone()));
    }

    #[test]
    fn test_equal_not_fooled_by_cancelling_lanes() {
        // XOR lanes 0x01 and 0xFF would cancel under a signed 8-bit sum.
        let a = [0u8; 16];
        let mut b = [0u8; 16];
        b[0] = 0x01;
        b[1] = 0xFF;
        assert!(!bytes_equal(&a, &b));
    }

    #[test]
    fn test_equal_length_mismatch() {
        let a = pattern(32);
        assert!(!bytes_equal(&a, &a[..31]));
        assert!(bytes_equal(&[], &[]));
    }

    #[test]
    fn test_portable_kernels_agree() {
        let a = pattern(64);
        let mut b = a.clone();
        assert_eq!(portable::chunks_sum(&a), chunks_sum(&a));
        assert!(portable::chunks_equal(&a, &b));
        b[40] = b[40].wrapping_add(1);
        assert!(!portable::chunks_equal(&a, &b));
        assert_eq!(portable::chunks_equal(&a, &b), chunks_equal(&a, &b));
    }
}
