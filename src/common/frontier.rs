use std::cmp::Ordering;

use super::Position;

/// Frontier entry. Stale duplicates of a position are allowed.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FrontierNode {
    pub(crate) position: Position,
    pub(crate) f_cost: f64,
}

impl PartialEq for FrontierNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierNode {}

impl PartialOrd for FrontierNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// BinaryHeap is a max-heap, so both keys are flipped: lowest f first,
// then lowest (row, col).
impl Ord for FrontierNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_cost
            .total_cmp(&self.f_cost)
            .then_with(|| other.position.cmp(&self.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    fn node(f_cost: f64, row: usize, col: usize) -> FrontierNode {
        FrontierNode {
            position: Position::new(row, col),
            f_cost,
        }
    }

    #[test]
    fn test_pop_order_lowest_f_then_lexicographic() {
        let mut heap = BinaryHeap::new();
        heap.push(node(4.0, 0, 0));
        heap.push(node(2.5, 3, 1));
        heap.push(node(2.5, 1, 3));
        heap.push(node(2.5, 1, 2));
        heap.push(node(1.0, 2, 2));

        let order: Vec<_> = std::iter::from_fn(|| heap.pop())
            .map(|n| (n.position.row, n.position.col))
            .collect();
        assert_eq!(order, vec![(2, 2), (1, 2), (1, 3), (3, 1), (0, 0)]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut heap = BinaryHeap::new();
        heap.push(node(3.0, 1, 1));
        heap.push(node(3.0, 1, 1));
        heap.push(node(2.0, 1, 1));
        assert_eq!(heap.len(), 3);
        assert_eq!(heap.pop().map(|n| n.f_cost), Some(2.0));
    }
}
