//! Binary min-heap used by the route-aware search.
//!
//! There is no decrease-key: improved states are re-enqueued and stale
//! duplicates are filtered at dequeue time by the caller's visited-cost
//! check (lazy deletion). Correct as long as edge costs are non-negative,
//! which the cost formula guarantees.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct Entry<T> {
    cost: u32,
    item: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}

impl<T> Eq for Entry<T> {}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by cost (reversed from standard Rust BinaryHeap).
        // Equal costs compare equal, so tie order is unspecified.
        other.cost.cmp(&self.cost)
    }
}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub(crate) struct MinQueue<T> {
    heap: BinaryHeap<Entry<T>>,
}

impl<T> MinQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    pub fn push(&mut self, item: T, cost: u32) {
        self.heap.push(Entry { cost, item });
    }

    /// Pop the cheapest entry, or `None` when empty.
    pub fn pop(&mut self) -> Option<(T, u32)> {
        self.heap.pop().map(|entry| (entry.item, entry.cost))
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
