use std::cmp::Ordering;

/// Parent sentinel for the start node.
pub(crate) const NO_PARENT: usize = usize::MAX;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum NodeState {
    Unseen,
    Open,
    Closed,
}

/// Per-tile bookkeeping for one search call.
#[derive(Clone)]
pub(crate) struct Node {
    pub(crate) g: f64,
    pub(crate) parent: usize,
    pub(crate) state: NodeState,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: f64::INFINITY,
            parent: NO_PARENT,
            state: NodeState::Unseen,
        }
    }
}

/// Open-list entry, ordered for use in `BinaryHeap`.
///
/// The heap pops the smallest `f` first. Among equal `f` the larger `g`
/// wins, then the smaller index, so expansion order is reproducible.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NodeRef {
    pub(crate) idx: usize,
    pub(crate) f: f64,
    pub(crate) g: f64,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on f and idx because BinaryHeap is a max-heap.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| self.g.total_cmp(&other.g))
            .then_with(|| other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NodeRef {}
