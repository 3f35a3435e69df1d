//! Fibonacci heap implementation
//!
//! A Fibonacci heap is a mergeable priority queue with:
//! - O(1) amortized push, decrease_key, and union
//! - O(log n) amortized pop
//!
//! The structure is a forest of heap-ordered multi-way trees. Tree roots are
//! linked in a circular doubly linked list (the root ring), as are the
//! children of every node. The heap keeps a pointer to the minimum root,
//! defers all restructuring to pop (which consolidates equal-degree trees),
//! and answers decrease_key by cutting the node out of its tree.
//!
//! Nodes live in a generational arena rather than behind raw pointers: a
//! retired slot's generation is never reissued, so a handle whose node was
//! already popped fails with [`HeapError::InvalidHandle`] instead of
//! touching freed memory.

use std::sync::atomic::{AtomicU64, Ordering};

use slotmap::{new_key_type, SecondaryMap, SlotMap};

use crate::error::HeapError;

new_key_type! {
    struct NodeKey;
}

// Per-instance tags; a handle carries the tag of the heap that issued it.
static NEXT_HEAP_ID: AtomicU64 = AtomicU64::new(0);

/// Handle to an element in a Fibonacci heap
///
/// A handle stays valid until the pop that removes its node. A handle issued
/// by a different heap instance, or kept across a union that drained its
/// heap, is rejected with [`HeapError::InvalidHandle`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NodeHandle {
    heap: u64,
    key: NodeKey,
}

struct Node<K> {
    key: K,
    degree: usize,
    marked: bool,
    parent: Option<NodeKey>,
    child: Option<NodeKey>,
    left: NodeKey,
    right: NodeKey,
}

/// Fibonacci heap
///
/// # Example
///
/// ```rust
/// use mergeable_heap::fibonacci::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let handle = heap.push(5);
/// heap.decrease_key(handle, 1).unwrap();
/// assert_eq!(heap.peek(), Ok(&1));
/// ```
pub struct FibonacciHeap<K: Ord> {
    nodes: SlotMap<NodeKey, Node<K>>,
    min: Option<NodeKey>,
    len: usize,
    id: u64,
}

impl<K: Ord> Default for FibonacciHeap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> FibonacciHeap<K> {
    /// Creates a new empty heap.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            min: None,
            len: 0,
            id: NEXT_HEAP_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Returns the number of elements in the heap.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the heap is empty.
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    /// Removes every element. Outstanding handles become invalid.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.min = None;
        self.len = 0;
    }

    /// Inserts a key, returning a handle for later [`decrease_key`] calls.
    ///
    /// The new node joins the root ring as a one-node tree; no
    /// restructuring happens until a later pop. O(1).
    ///
    /// [`decrease_key`]: FibonacciHeap::decrease_key
    pub fn push(&mut self, key: K) -> NodeHandle {
        let node = self.nodes.insert_with_key(|slot| Node {
            key,
            degree: 0,
            marked: false,
            parent: None,
            child: None,
            left: slot,
            right: slot,
        });

        match self.min {
            Some(min) => {
                self.ring_insert_before(min, node);
                if self.nodes[node].key < self.nodes[min].key {
                    self.min = Some(node);
                }
            }
            None => self.min = Some(node),
        }

        self.len += 1;
        NodeHandle {
            heap: self.id,
            key: node,
        }
    }

    /// Returns the minimum key without removing it. O(1).
    pub fn peek(&self) -> Result<&K, HeapError> {
        self.min
            .map(|min| &self.nodes[min].key)
            .ok_or(HeapError::Empty)
    }

    /// Removes and returns the minimum key.
    ///
    /// Promotes the minimum's children to roots, then consolidates the root
    /// ring until all root degrees are distinct. Amortized O(log n).
    pub fn pop(&mut self) -> Result<K, HeapError> {
        let z = self.min.ok_or(HeapError::Empty)?;

        // Promote the children of z to roots. Their marks are cleared: a
        // root's mark must never be set.
        if let Some(first) = self.nodes[z].child {
            let mut children = Vec::with_capacity(self.nodes[z].degree);
            let mut cur = first;
            loop {
                children.push(cur);
                cur = self.nodes[cur].right;
                if cur == first {
                    break;
                }
            }
            for child in children {
                self.nodes[child].parent = None;
                self.nodes[child].marked = false;
                self.ring_remove(child);
                self.ring_insert_before(z, child);
            }
            self.nodes[z].child = None;
            self.nodes[z].degree = 0;
        }

        let successor = self.nodes[z].right;
        self.ring_remove(z);
        let node = self
            .nodes
            .remove(z)
            .expect("minimum node missing from the arena");

        if successor == z {
            // z was the only root and had no children
            self.min = None;
        } else {
            self.min = Some(successor);
            self.consolidate(successor);
        }

        self.len -= 1;
        Ok(node.key)
    }

    /// Moves every element of `other` into this heap, leaving `other` empty.
    ///
    /// The root rings are spliced together and the minimum is taken from
    /// whichever heap held the smaller key. `other` stays usable afterwards;
    /// handles it issued are invalidated and fail with
    /// [`HeapError::InvalidHandle`].
    pub fn union(&mut self, other: &mut Self) {
        let Some(other_min) = other.min else {
            return;
        };

        // Adopt the donor's node records, re-keying them into this arena.
        let mut remap: SecondaryMap<NodeKey, NodeKey> = SecondaryMap::new();
        let mut moved = Vec::with_capacity(other.len);
        for (old, node) in other.nodes.drain() {
            let new = self.nodes.insert(node);
            remap.insert(old, new);
            moved.push(new);
        }
        for &key in &moved {
            let node = &mut self.nodes[key];
            node.parent = node.parent.map(|p| remap[p]);
            node.child = node.child.map(|c| remap[c]);
            node.left = remap[node.left];
            node.right = remap[node.right];
        }
        let other_min = remap[other_min];

        match self.min {
            Some(min) => {
                // Splice the two root rings: four link rewrites.
                let min_prev = self.nodes[min].left;
                let other_prev = self.nodes[other_min].left;
                self.nodes[min_prev].right = other_min;
                self.nodes[other_min].left = min_prev;
                self.nodes[other_prev].right = min;
                self.nodes[min].left = other_prev;

                if self.nodes[other_min].key < self.nodes[min].key {
                    self.min = Some(other_min);
                }
            }
            None => self.min = Some(other_min),
        }

        self.len += other.len;
        other.len = 0;
        other.min = None;
    }

    /// Lowers the key of the node behind `handle` to `new_key`.
    ///
    /// A `new_key` equal to the current key is accepted and leaves the
    /// structure unchanged. If heap order against the parent is violated,
    /// the node is cut out and promoted to a root, cascading up through
    /// marked ancestors. Amortized O(1).
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::InvalidHandle`] if `handle` does not refer to a
    /// live node of this heap, and [`HeapError::KeyIncreased`] if `new_key`
    /// is greater than the current key. In both cases the heap is left
    /// unmodified.
    pub fn decrease_key(&mut self, handle: NodeHandle, new_key: K) -> Result<(), HeapError> {
        if handle.heap != self.id || !self.nodes.contains_key(handle.key) {
            return Err(HeapError::InvalidHandle);
        }
        let x = handle.key;
        if new_key > self.nodes[x].key {
            return Err(HeapError::KeyIncreased);
        }
        self.nodes[x].key = new_key;

        if let Some(parent) = self.nodes[x].parent {
            if self.nodes[x].key < self.nodes[parent].key {
                self.cut(x, parent);
                self.cascading_cut(parent);
            }
        }

        let min = self.min.expect("non-empty heap must have a minimum");
        if self.nodes[x].key < self.nodes[min].key {
            self.min = Some(x);
        }
        Ok(())
    }

    /// Returns the current key of the node behind `handle`.
    pub fn key(&self, handle: NodeHandle) -> Result<&K, HeapError> {
        if handle.heap != self.id {
            return Err(HeapError::InvalidHandle);
        }
        self.nodes
            .get(handle.key)
            .map(|node| &node.key)
            .ok_or(HeapError::InvalidHandle)
    }

    /// Returns true if `handle` still refers to a live node of this heap.
    pub fn contains(&self, handle: NodeHandle) -> bool {
        handle.heap == self.id && self.nodes.contains_key(handle.key)
    }

    /// Merges equal-degree trees until every root degree is distinct, then
    /// rebuilds the root ring and recomputes the minimum.
    fn consolidate(&mut self, start: NodeKey) {
        let mut table: Vec<Option<NodeKey>> = vec![None; degree_bound(self.nodes.len()) + 1];

        // Collect the current roots once; the ring is rebuilt below.
        let mut roots = Vec::new();
        let mut cur = start;
        loop {
            roots.push(cur);
            cur = self.nodes[cur].right;
            if cur == start {
                break;
            }
        }

        for root in roots {
            let mut x = root;
            loop {
                let degree = self.nodes[x].degree;
                match table[degree].take() {
                    None => {
                        table[degree] = Some(x);
                        break;
                    }
                    Some(mut y) => {
                        if self.nodes[y].key < self.nodes[x].key {
                            std::mem::swap(&mut x, &mut y);
                        }
                        self.link(y, x);
                    }
                }
            }
        }

        self.min = None;
        for root in table.into_iter().flatten() {
            self.nodes[root].left = root;
            self.nodes[root].right = root;
            match self.min {
                Some(min) => {
                    self.ring_insert_before(min, root);
                    if self.nodes[root].key < self.nodes[min].key {
                        self.min = Some(root);
                    }
                }
                None => self.min = Some(root),
            }
        }
    }

    /// Makes `child` a child of `parent`. Both must be roots with
    /// `parent.key <= child.key`.
    fn link(&mut self, child: NodeKey, parent: NodeKey) {
        self.ring_remove(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[child].marked = false;
        match self.nodes[parent].child {
            Some(first) => self.ring_insert_before(first, child),
            None => self.nodes[parent].child = Some(child),
        }
        self.nodes[parent].degree += 1;
    }

    /// Detaches `x` from its parent `y` and promotes it to a root.
    ///
    /// The unlink holds for any degree of `y`: whether `x` was the only
    /// child or one of many, `y`'s remaining children stay a valid ring and
    /// `x` always lands in the root ring.
    fn cut(&mut self, x: NodeKey, y: NodeKey) {
        if self.nodes[y].child == Some(x) {
            let next = self.nodes[x].right;
            self.nodes[y].child = if next == x { None } else { Some(next) };
        }
        self.ring_remove(x);
        self.nodes[y].degree -= 1;

        let min = self.min.expect("a heap with children must have a minimum");
        self.ring_insert_before(min, x);
        self.nodes[x].parent = None;
        self.nodes[x].marked = false;
    }

    /// Walks up from `y`, marking the first unmarked non-root ancestor and
    /// cutting every marked one encountered before it. Roots are never
    /// marked.
    fn cascading_cut(&mut self, y: NodeKey) {
        let mut y = y;
        while let Some(parent) = self.nodes[y].parent {
            if !self.nodes[y].marked {
                self.nodes[y].marked = true;
                break;
            }
            self.cut(y, parent);
            y = parent;
        }
    }

    /// Inserts `x`, a detached singleton, into the ring before `at`.
    fn ring_insert_before(&mut self, at: NodeKey, x: NodeKey) {
        let prev = self.nodes[at].left;
        self.nodes[x].left = prev;
        self.nodes[x].right = at;
        self.nodes[prev].right = x;
        self.nodes[at].left = x;
    }

    /// Unlinks `x` from its ring, leaving it a singleton.
    fn ring_remove(&mut self, x: NodeKey) {
        let left = self.nodes[x].left;
        let right = self.nodes[x].right;
        self.nodes[left].right = right;
        self.nodes[right].left = left;
        self.nodes[x].left = x;
        self.nodes[x].right = x;
    }
}

/// Size for the consolidation degree table: the index of the smallest
/// Fibonacci number exceeding `n`. A tree whose root has degree `d` holds at
/// least the `(d + 2)`-th Fibonacci number of nodes, so no degree can reach
/// this value before a link, and none can exceed it after one.
fn degree_bound(n: usize) -> usize {
    let mut bound = 0;
    let (mut a, mut b) = (1usize, 1usize);
    while b <= n {
        let next = a.saturating_add(b);
        a = b;
        b = next;
        bound += 1;
    }
    bound
}
