use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A candidate index with its distance to the current source.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor {
    pub distance_km: f64,
    pub index: usize,
}

impl PartialEq for Neighbor {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Neighbor {}

// Closer first; equal distances fall back to input order.
impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance_km
            .total_cmp(&other.distance_km)
            .then_with(|| self.index.cmp(&other.index))
    }
}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Fixed-capacity max-heap holding the `k` smallest neighbors seen so far.
/// The root is always the worst kept entry, so each offer is O(log k).
#[derive(Debug, Clone)]
pub struct TopK {
    capacity: usize,
    heap: BinaryHeap<Neighbor>,
}

impl TopK {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn offer(&mut self, neighbor: Neighbor) {
        if self.capacity == 0 {
            return;
        }
        if self.heap.len() < self.capacity {
            self.heap.push(neighbor);
            return;
        }
        if let Some(mut worst) = self.heap.peek_mut() {
            // PeekMut re-sifts the root on drop
            if neighbor < *worst {
                *worst = neighbor;
            }
        }
    }

    /// Kept neighbors, nearest first.
    pub fn into_sorted_vec(self) -> Vec<Neighbor> {
        self.heap.into_sorted_vec()
    }
}
