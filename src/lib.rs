//! Mergeable priority queue
//!
//! This crate provides a Fibonacci heap: a priority queue with efficient
//! `decrease_key` and merge support, the operations that algorithms like
//! Dijkstra's shortest path rely on.
//!
//! # Features
//!
//! - **push / union / decrease_key**: O(1) amortized
//! - **pop**: O(log n) amortized
//! - **peek / len**: O(1)
//! - Handles stay checkable: using a handle whose node was already popped,
//!   or one issued by a different heap, fails with a typed error instead of
//!   being undefined behavior.
//!
//! # Example
//!
//! ```rust
//! use mergeable_heap::{FibonacciHeap, HeapError};
//!
//! let mut heap = FibonacciHeap::new();
//! let handle = heap.push(10);
//! heap.push(3);
//! heap.decrease_key(handle, 1).unwrap();
//! assert_eq!(heap.peek(), Ok(&1));
//! assert_eq!(heap.pop(), Ok(1));
//! assert_eq!(heap.pop(), Ok(3));
//! assert_eq!(heap.pop(), Err(HeapError::Empty));
//! ```

pub mod error;
pub mod fibonacci;

// Re-export the main types for convenience
pub use error::HeapError;
pub use fibonacci::{FibonacciHeap, NodeHandle};
