// src/buffer/mod.rs
//! Hybrid inline/heap buffer implementation

pub mod core;
pub(crate) mod ops;
pub(crate) mod unsafe_ops;

pub use self::core::{DEFAULT_INLINE_CAPACITY, HybridBuffer, Representation};

/// Buffer of signed word integers with the default inline capacity.
pub type SmallWordVec = HybridBuffer<i64>;

/// Buffer of bytes with the default inline capacity.
pub type SmallByteVec = HybridBuffer<u8>;
