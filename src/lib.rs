// src/lib.rs
//! # Hybrid Inline/Heap Buffer Library
//!
//! A small-vector buffer that stores up to `N` scalars inside its own
//! footprint and moves to a growable heap allocation once that is exceeded.
//!
//! Features:
//! - Inline storage for the first `N` elements (default 64), no allocation
//! - One-way inline-to-heap transition; heap capacity only grows (2x by default)
//! - Zero-copy raw views with O(1) pointer-offset slicing
//! - SIMD equality and sum for byte buffers (SSE2 / NEON, portable fallback)
//! - Checked or unchecked indexing chosen at construction
//! - Secure erasure of the active storage using the `zeroize` crate
//!
//! ```
//! use hybridbuf::prelude::*;
//!
//! let mut buf = SmallWordVec::new();
//! for i in 0..64 {
//!     buf.append(i);
//! }
//! assert!(buf.is_inline());
//!
//! buf.append(64);
//! assert_eq!(buf.representation(), Representation::Heap);
//!
//! buf.clear();
//! buf.append(100);
//! assert!(!buf.is_inline());
//! assert_eq!(buf.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::missing_safety_doc)]

pub mod buffer;
pub mod config;
pub mod element;
pub mod error;
pub mod raw;
pub mod simd;
pub mod span;

// Re-export main types
pub use buffer::{DEFAULT_INLINE_CAPACITY, HybridBuffer, Representation, SmallByteVec, SmallWordVec};
pub use config::{BufferConfig, CheckMode};
pub use element::{Element, ElementKind};
pub use error::{BufferError, Result, ResultExt};
pub use raw::RawView;
pub use span::Span;

/// Commonly used imports.
pub mod prelude {
    pub use crate::buffer::{HybridBuffer, Representation, SmallByteVec, SmallWordVec};
    pub use crate::config::{BufferConfig, CheckMode};
    pub use crate::element::{Element, ElementKind};
    pub use crate::error::{BufferError, Result, ResultExt};
    pub use crate::raw::RawView;
    pub use crate::span::Span;
}
