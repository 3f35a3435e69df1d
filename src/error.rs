//! Error type for heap operations

use std::fmt;

/// Error type for heap operations
///
/// Every failure is reported synchronously to the caller; no operation
/// mutates the heap before returning an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// Peek or pop was called on an empty heap
    Empty,
    /// The new key passed to decrease_key is greater than the current key
    KeyIncreased,
    /// The handle does not refer to a live node of this heap
    InvalidHandle,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::Empty => write!(f, "the heap is empty"),
            HeapError::KeyIncreased => {
                write!(f, "new key is greater than the current key")
            }
            HeapError::InvalidHandle => {
                write!(f, "handle does not refer to a live node of this heap")
            }
        }
    }
}

impl std::error::Error for HeapError {}
