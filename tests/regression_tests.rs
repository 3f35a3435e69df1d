//! Node-loss regression tests
//!
//! Cutting a child whose parent keeps other children is the spot where a
//! careless unlink can drop the cut node from every ring: the old root list
//! gets orphaned when the node becomes the new minimum, or the node itself
//! vanishes when it does not. Every value pushed must come back out of the
//! heap exactly once, whatever mix of pops and decreases happens in between.

use mergeable_heap::{FibonacciHeap, HeapError, NodeHandle};

fn drain(heap: &mut FibonacciHeap<i32>) -> Vec<i32> {
    let mut out = Vec::new();
    while let Ok(key) = heap.pop() {
        out.push(key);
    }
    out
}

/// Consolidates five pushes into one tree whose root has two children, then
/// cuts one child below the root's key. Nothing may go missing.
#[test]
fn cut_from_parent_with_two_children_new_min() {
    let mut heap = FibonacciHeap::new();
    heap.push(100);
    let child = heap.push(200);
    heap.push(300);
    heap.push(400);
    heap.push(5);
    assert_eq!(heap.pop(), Ok(5));

    heap.decrease_key(child, 50).unwrap();

    assert_eq!(heap.peek(), Ok(&50));
    assert_eq!(heap.len(), 4);
    assert_eq!(drain(&mut heap), vec![50, 100, 300, 400]);
    assert_eq!(heap.peek(), Err(HeapError::Empty));
}

/// Same shape, but the cut node stays above the old minimum, the variant
/// where a dropped node would go unnoticed until the drain comes up short.
#[test]
fn cut_from_parent_with_two_children_not_new_min() {
    let mut heap = FibonacciHeap::new();
    heap.push(100);
    heap.push(200);
    heap.push(300);
    let leaf = heap.push(400);
    heap.push(5);
    assert_eq!(heap.pop(), Ok(5));

    heap.decrease_key(leaf, 150).unwrap();

    assert_eq!(heap.peek(), Ok(&100));
    assert_eq!(heap.len(), 4);
    assert_eq!(drain(&mut heap), vec![100, 150, 200, 300]);
    assert_eq!(heap.pop(), Err(HeapError::Empty));
}

/// Cuts every child of a wide parent one by one; the ring of remaining
/// children must survive each unlink.
#[test]
fn cutting_all_children_one_by_one() {
    let mut heap = FibonacciHeap::new();
    heap.push(10);
    let handles: Vec<NodeHandle> = (1..8).map(|i| heap.push(10 + i * 10)).collect();
    heap.push(1);
    assert_eq!(heap.pop(), Ok(1));

    // Cut in an order unrelated to the ring order.
    for (offset, &handle) in [3, 0, 5, 1, 6, 2, 4].iter().zip(handles.iter()) {
        if heap.contains(handle) {
            let current = *heap.key(handle).unwrap();
            heap.decrease_key(handle, current - 100 - offset).unwrap();
        }
    }

    assert_eq!(heap.len(), 8);
    let popped = drain(&mut heap);
    assert_eq!(popped.len(), 8);
    assert!(popped.windows(2).all(|w| w[0] <= w[1]));
}

/// Deterministic mixed sequence: the multiset drained at the end must equal
/// the multiset pushed minus the values already popped.
#[test]
fn every_push_is_popped_exactly_once() {
    let mut state: u64 = 0x2545f4914f6cdd1d;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        state
    };

    let mut heap = FibonacciHeap::new();
    let mut live: Vec<(NodeHandle, i32)> = Vec::new();
    let mut popped: Vec<i32> = Vec::new();
    let mut pushed: Vec<i32> = Vec::new();

    for i in 0..400i32 {
        match next() % 5 {
            0 | 1 | 2 => {
                // Keys distinct mod 1000, so decreases can never collide.
                let key = (next() % 10_000) as i32 * 1000 + i % 1000;
                pushed.push(key);
                live.push((heap.push(key), key));
            }
            3 => {
                if let Ok(key) = heap.pop() {
                    popped.push(key);
                    let pos = live.iter().position(|&(_, k)| k == key).unwrap();
                    live.remove(pos);
                }
            }
            _ => {
                if !live.is_empty() {
                    let pos = (next() % live.len() as u64) as usize;
                    let (handle, old) = live[pos];
                    let new = old - (next() % 50 + 1) as i32 * 1000;
                    heap.decrease_key(handle, new).unwrap();
                    live[pos].1 = new;
                    // Bookkeeping: the pushed multiset tracks current keys.
                    let entry = pushed.iter_mut().find(|k| **k == old).unwrap();
                    *entry = new;
                }
            }
        }
    }

    popped.extend(drain(&mut heap));
    popped.sort_unstable();
    pushed.sort_unstable();
    assert_eq!(popped, pushed, "a pushed value was lost or duplicated");
}

/// Long decrease chains force cascading cuts; repeat build-and-drain cycles
/// on one heap and count every element out each time.
#[test]
fn repeated_cascades_preserve_counts() {
    let mut heap = FibonacciHeap::new();
    for round in 0..5i32 {
        let base = round * 10_000;
        let handles: Vec<NodeHandle> = (0..64).map(|i| heap.push(base + 1000 + i)).collect();
        heap.push(base);
        assert_eq!(heap.pop(), Ok(base));

        // Walk the handles back to front, pulling each below the minimum to
        // force cuts deep in the consolidated trees.
        for (i, &handle) in handles.iter().enumerate().rev() {
            let target = base + i as i32 - 64;
            heap.decrease_key(handle, target).unwrap();
            assert_eq!(heap.peek(), Ok(&(base - 64 + i as i32)));
        }

        assert_eq!(heap.len(), 64);
        let popped = drain(&mut heap);
        assert_eq!(popped.len(), 64);
        let expected: Vec<i32> = (0..64).map(|i| base + i - 64).collect();
        assert_eq!(popped, expected);
    }
}
