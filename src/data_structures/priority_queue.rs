use std::cmp::min;
use std::fmt::Debug;

const HEAP_ARITY: usize = 2usize;
#[inline(always)]
#[must_use]
fn up(i: usize) -> usize {
    crate::heap_primitives::index_parent::<HEAP_ARITY>(i)
}
#[inline(always)]
#[must_use]
fn down_left(i: usize) -> usize {
    crate::heap_primitives::index_first_children::<HEAP_ARITY>(i)
}
#[inline(always)]
#[must_use]
fn down_right(i: usize) -> usize {
    crate::heap_primitives::index_last_children::<HEAP_ARITY>(i)
}

type ArenaIndex = usize;

/// The ranking tuple of a queued item.
///
/// Items are ordered by their rank, and ties are broken by insertion order so
/// equally ranked items come out first-in first-out.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct QueueRank<R: Ord> {
    pub rank: R,
    pub seq: u64,
}

#[derive(Copy, Clone, Debug)]
struct HeapNode<R: Ord> {
    key: QueueRank<R>,
    /// Where the queued item lives in the arena.
    item: ArenaIndex,
}

/// A min-priority queue backed by a binary heap over an item arena.
///
/// Items are stored once in an append-only arena and the heap only shuffles
/// small `(QueueRank, ArenaIndex)` nodes around. The arena lives as long as
/// the queue, which lives as long as a single search.
///
/// Stale entries are not removed. Searches that re-rank an item simply push it
/// again and skip the outdated copy when it's popped.
pub struct PriorityQueue<T, R>
where
    T: Copy + Debug,
    R: Copy + Debug + Ord,
{
    arena: Vec<T>,
    heap: Vec<HeapNode<R>>,
    next_seq: u64,
}

impl<T, R> PriorityQueue<T, R>
where
    T: Copy + Debug,
    R: Copy + Debug + Ord,
{
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }
    #[must_use]
    pub fn with_capacity(s: usize) -> Self {
        Self {
            arena: Vec::with_capacity(s),
            heap: Vec::with_capacity(s),
            next_seq: 0,
        }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.heap.len()
    }
    /// Number of pushes since creation, popped ones included.
    pub fn pushed(&self) -> usize {
        self.arena.len()
    }

    pub fn push(&mut self, item: T, rank: R) {
        let item_index = self.arena.len();
        self.arena.push(item);

        let key = QueueRank {
            rank,
            seq: self.next_seq,
        };
        self.next_seq += 1;

        self.heap.push(HeapNode {
            key,
            item: item_index,
        });
        self.sift_up(self.heap.len() - 1);

        self.verify_heap();
    }

    pub fn peek(&self) -> Option<(T, R)> {
        self.heap
            .first()
            .map(|n| (self.arena[n.item], n.key.rank))
    }

    pub fn pop(&mut self) -> Option<(T, R)> {
        self.verify_heap();

        let last = self.heap.len().checked_sub(1)?;
        self.heap.swap(0, last);
        let top = self.heap.pop()?;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }

        self.verify_heap();
        Some((self.arena[top.item], top.key.rank))
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.heap.clear();
        self.next_seq = 0;
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    pub(crate) fn verify_heap(&self) {
        // All good... (hopefully)
    }

    #[inline(always)]
    #[cfg(feature = "verify")]
    pub(crate) fn verify_heap(&self) {
        // Every node goes after its parent node, if any.
        for i in 1..self.heap.len() {
            let p = up(i);
            assert!(
                self.heap[p].key <= self.heap[i].key,
                "Node[{p}]={:?} !<= child [{i}]={:?}. Out of heap of len={}",
                self.heap[p],
                self.heap[i],
                self.heap.len(),
            );
        }
    }

    // Implementation details

    /// Raises a node
    /// Returns its new index
    #[inline(always)]
    fn sift_up(&mut self, index: usize) -> usize {
        debug_assert!(index < self.heap.len(), "Index out of bounds...");

        let mut pos = index;
        while pos != 0 {
            let parent = up(pos);
            if self.heap[parent].key <= self.heap[pos].key {
                break;
            }
            self.heap.swap(parent, pos);
            pos = parent;
        }
        pos
    }

    /// Lowers a node
    /// Returns its new index
    #[inline(always)]
    fn sift_down(&mut self, mut index: usize) -> usize {
        let len = self.heap.len();
        debug_assert!(index < len, "Index out of bounds...");

        loop {
            let first = down_left(index);
            if first >= len {
                break;
            }
            debug_assert_eq!(first + HEAP_ARITY, down_right(index) + 1);

            // Find the best child
            let child = (first..min(first + HEAP_ARITY, len))
                .min_by(|&a, &b| self.heap[a].key.cmp(&self.heap[b].key))
                .unwrap_or(first);

            if self.heap[index].key <= self.heap[child].key {
                break;
            }

            self.heap.swap(index, child);
            index = child;
        }
        index
    }
}

impl<T, R> Default for PriorityQueue<T, R>
where
    T: Copy + Debug,
    R: Copy + Debug + Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R> Debug for PriorityQueue<T, R>
where
    T: Copy + Debug,
    R: Copy + Debug + Ord,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "PriorityQueue{{({} queued, {} pushed)}}",
            self.len(),
            self.pushed()
        )
    }
}
