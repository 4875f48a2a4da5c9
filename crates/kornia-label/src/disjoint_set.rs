use std::num::NonZeroUsize;

use crate::error::DisjointSetError;

/// Number of slots reserved by [DisjointSet::new].
pub const DEFAULT_CAPACITY: usize = 32;

/// Identifier of a set issued by a [DisjointSet].
///
/// Ids are dense positive integers handed out in insertion order, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SetId(NonZeroUsize);

impl SetId {
    /// Wraps a raw id, returning `None` for zero.
    pub fn new(id: usize) -> Option<Self> {
        NonZeroUsize::new(id).map(Self)
    }

    /// Returns the raw id.
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl From<SetId> for usize {
    fn from(id: SetId) -> Self {
        id.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node {
    parent: usize,
    rank: u8,
}

/// A growable disjoint-set (union-find) data structure with union by rank and path compression.
///
/// Parent and rank live in a single record per id so that growth is all-or-nothing:
/// if the storage cannot be doubled the structure keeps its previous capacity and stays usable.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    // slot 0 is reserved and never belongs to a set
    nodes: Vec<Node>,
}

impl DisjointSet {
    /// Creates an empty disjoint set with [DEFAULT_CAPACITY] slots.
    pub fn new() -> Result<Self, DisjointSetError> {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty disjoint set with room for `capacity` slots, the reserved slot included.
    ///
    /// # Errors
    ///
    /// Returns [DisjointSetError::AllocationFailure] if the storage cannot be reserved.
    pub fn with_capacity(capacity: usize) -> Result<Self, DisjointSetError> {
        let mut nodes = Vec::new();
        nodes.try_reserve_exact(capacity.max(1))?;
        nodes.push(Node { parent: 0, rank: 0 });
        Ok(Self { nodes })
    }

    /// Inserts a new singleton set and returns its id.
    ///
    /// Doubles the storage first when it is full.
    ///
    /// # Errors
    ///
    /// Returns [DisjointSetError::AllocationFailure] if the storage cannot grow. The structure
    /// is left untouched in that case.
    pub fn insert(&mut self) -> Result<SetId, DisjointSetError> {
        if self.nodes.len() == self.nodes.capacity() {
            self.grow()?;
        }

        let id = self.nodes.len();
        self.nodes.push(Node {
            parent: id,
            rank: 0,
        });

        SetId::new(id).ok_or(DisjointSetError::InvalidSetId(id))
    }

    fn grow(&mut self) -> Result<(), DisjointSetError> {
        // the vector is full, so reserving its capacity again doubles it
        self.grow_by(self.nodes.capacity().max(1))
    }

    /// Reserves room for `additional` more slots. On failure the storage is untouched.
    fn grow_by(&mut self, additional: usize) -> Result<(), DisjointSetError> {
        let old_capacity = self.nodes.capacity();

        self.nodes.try_reserve_exact(additional)?;

        log::debug!(
            "disjoint set grew from {} to {} slots",
            old_capacity,
            self.nodes.capacity()
        );

        Ok(())
    }

    /// Returns the representative (root) of the set containing `id`, with path compression.
    ///
    /// Returns `None` if `id` was never issued by this structure.
    pub fn find(&mut self, id: SetId) -> Option<SetId> {
        let mut node = id.get();
        if node >= self.nodes.len() {
            return None;
        }

        // Chase down the root
        let mut root = node;
        while self.nodes[root].parent != root {
            root = self.nodes[root].parent;
        }

        // Go back and collapse the tree
        while self.nodes[node].parent != root {
            let next = self.nodes[node].parent;
            self.nodes[node].parent = root;
            node = next;
        }

        SetId::new(root)
    }

    /// Unites the sets containing `x` and `y`, returning the representative of the resulting set.
    ///
    /// The lower-rank root is attached under the higher-rank one. Merging two ids that already
    /// share a root changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [DisjointSetError::InvalidSetId] if either id was never issued.
    pub fn merge(&mut self, x: SetId, y: SetId) -> Result<SetId, DisjointSetError> {
        let xroot = self
            .find(x)
            .ok_or(DisjointSetError::InvalidSetId(x.get()))?;
        let yroot = self
            .find(y)
            .ok_or(DisjointSetError::InvalidSetId(y.get()))?;

        if xroot == yroot {
            return Ok(xroot);
        }

        let xrank = self.nodes[xroot.get()].rank;
        let yrank = self.nodes[yroot.get()].rank;

        if xrank > yrank {
            self.nodes[yroot.get()].parent = xroot.get();
            Ok(xroot)
        } else {
            self.nodes[xroot.get()].parent = yroot.get();
            if xrank == yrank {
                self.nodes[yroot.get()].rank = yrank.saturating_add(1);
            }
            Ok(yroot)
        }
    }

    /// Returns the number of sets ever inserted.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Returns `true` if no set has been inserted yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of slots available before the next growth, the reserved slot included.
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }
}
