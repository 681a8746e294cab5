// src/element.rs
//! Element kinds a [`HybridBuffer`](crate::HybridBuffer) can hold.
//!
//! The set is closed: signed word integers and unsigned bytes. Both are plain
//! `Copy` scalars whose all-zero bit pattern is a valid value, which lets the
//! inline array be fully initialised up front and wiped with `zeroize`.

use std::fmt;
use zeroize::DefaultIsZeroes;

mod sealed {
    pub trait Sealed {}
    impl Sealed for i64 {}
    impl Sealed for u8 {}
}

/// Width class of a buffer's elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Signed 64-bit word integer
    Word,
    /// Unsigned 8-bit byte
    Byte,
}

impl ElementKind {
    /// Size of one element in bytes.
    #[inline(always)]
    pub const fn width(self) -> usize {
        match self {
            Self::Word => 8,
            Self::Byte => 1,
        }
    }
}

/// Fixed-width scalar storable in a hybrid buffer.
///
/// This trait is sealed; only `i64` and `u8` implement it.
pub trait Element:
    Copy + Default + PartialEq + fmt::Debug + DefaultIsZeroes + sealed::Sealed + 'static
{
    /// Width class of this scalar
    const KIND: ElementKind;
}

impl Element for i64 {
    const KIND: ElementKind = ElementKind::Word;
}

impl Element for u8 {
    const KIND: ElementKind = ElementKind::Byte;
}
