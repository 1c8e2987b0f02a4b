use super::{Error, SubtreeRootCacher};
use crate::eds::{Axis, DataAvailabilityHeader, ErasuredTree, TreeConstructor};
use bytes::Bytes;
use std::{cell::RefCell, rc::Rc};
use tracing::{debug, trace};

/// Caches the inner nodes of every row tree of an extended data square so that the subtree
/// roots used in message inclusion proofs can be looked up after the square is committed.
///
/// A [SquareSubtreeCache] is a [TreeConstructor]: pass it to [crate::eds::compute_roots] and it
/// attaches a fresh [SubtreeRootCacher] to the tree of every [Axis::Row] (column trees are not
/// cached). Each instance is meant to observe the commitment of exactly one square.
///
/// # Warning
///
/// Not safe for concurrent use (each cacher is shared with its tree's visitor through an
/// [Rc]).
pub struct SquareSubtreeCache {
    caches: Vec<Rc<RefCell<SubtreeRootCacher>>>,
    square_size: usize,
    // Number of trees handed out (rows and columns).
    counter: usize,
}

impl SquareSubtreeCache {
    /// Create a cache for a square with `square_size` original shares per row.
    ///
    /// # Panics
    ///
    /// Panics if `square_size` is not a power of two.
    pub fn new(square_size: usize) -> Self {
        assert!(
            square_size.is_power_of_two(),
            "square size must be a power of two: {square_size}"
        );
        Self {
            caches: Vec::new(),
            square_size,
            counter: 0,
        }
    }

    /// Returns the number of original shares per row.
    pub fn square_size(&self) -> usize {
        self.square_size
    }

    /// Returns the depth of every row tree (the length of a path from a row root to a leaf).
    pub fn depth(&self) -> usize {
        (2 * self.square_size).ilog2() as usize
    }

    /// Returns the number of rows cached.
    pub fn len(&self) -> usize {
        self.caches.len()
    }

    /// Returns true if no row has been cached.
    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }

    /// Returns the number of trees (rows and columns) constructed so far.
    pub fn constructed(&self) -> usize {
        self.counter
    }

    /// Walk the tree of `row` from its root in `dah` along `path` and return the subtree root
    /// found there.
    pub fn get_subtree_root(
        &self,
        dah: &DataAvailabilityHeader,
        row: usize,
        path: &[bool],
    ) -> Result<Bytes, Error> {
        if self.caches.len() != dah.row_roots.len() {
            return Err(Error::RowCountMismatch(self.caches.len(), dah.row_roots.len()));
        }
        if row >= self.caches.len() {
            return Err(Error::RowOutOfRange(self.caches.len(), row));
        }
        let result = self.caches[row].borrow().walk(&dah.row_roots[row], path);
        if let Err(err) = &result {
            debug!(row, path = path.len(), ?err, "subtree root lookup failed");
        }
        result
    }
}

impl TreeConstructor for SquareSubtreeCache {
    type Tree = ErasuredTree;

    /// Returns a new tree for the given axis, caching its inner nodes if it is a row.
    ///
    /// # Panics
    ///
    /// Panics if rows are not constructed in order.
    fn construct(&mut self, axis: Axis, index: usize) -> ErasuredTree {
        self.counter += 1;
        match axis {
            Axis::Row => {
                assert_eq!(index, self.caches.len(), "rows must be constructed in order");
                let cacher = Rc::new(RefCell::new(SubtreeRootCacher::new(self.square_size)));
                self.caches.push(cacher.clone());
                trace!(row = index, "caching row tree");
                ErasuredTree::new(
                    self.square_size,
                    index,
                    Some(Box::new(move |hash: &Bytes, children: &[Bytes]| {
                        cacher.borrow_mut().visit(hash, children)
                    })),
                )
            }
            Axis::Col => ErasuredTree::new(self.square_size, index, None),
        }
    }
}
