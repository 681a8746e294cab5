// src/error.rs
//! Error types for hybrid buffer operations
//!
//! Every failure in this crate is a programmer error: popping an empty buffer,
//! indexing past the logical length, or misusing a raw pointer. The primary
//! operations trap (panic at the caller's location) through [`violation`];
//! the `try_*` probes hand the same [`BufferError`] back as a value instead.

use std::fmt;

/// Errors describing a broken buffer contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// An operation that needs at least one element ran on an empty buffer
    EmptyBuffer {
        /// Name of the failing operation (`"pop"`, `"first"`, `"last"`)
        op: &'static str,
    },
    /// Index is not below the logical length
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Logical length at the time of the request
        len: usize,
    },
    /// Raw pointer protocol misuse: wrong storage region or stale view
    ContractViolation(String),
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBuffer { op } => write!(f, "Empty buffer: `{}` needs at least one element", op),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "Index out of range: index {} but length is {}", index, len)
            }
            Self::ContractViolation(msg) => write!(f, "Contract violation: {}", msg),
        }
    }
}

// Also gives `From<BufferError> for anyhow::Error` through anyhow's blanket impl.
impl std::error::Error for BufferError {}

/// Result type alias for the non-panicking buffer probes
pub type Result<T> = std::result::Result<T, BufferError>;

/// Extension trait for converting Results between different error types
pub trait ResultExt<T> {
    /// Convert to anyhow::Result
    #[cfg(feature = "anyhow")]
    fn into_anyhow(self) -> anyhow::Result<T>;

    /// Panics with the error's message, reporting the caller's location.
    fn or_trap(self) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    #[cfg(feature = "anyhow")]
    fn into_anyhow(self) -> anyhow::Result<T> {
        self.map_err(|e| e.into())
    }

    #[track_caller]
    fn or_trap(self) -> T {
        match self {
            Ok(val) => val,
            Err(err) => violation(err),
        }
    }
}

/// Traps on a broken buffer contract.
///
/// Kept out of line so the happy path of every checked accessor stays small.
#[cold]
#[inline(never)]
#[track_caller]
pub(crate) fn violation(err: BufferError) -> ! {
    panic!("{}", err)
}
