//! Commit to the rows and columns of an extended data square.
//!
//! An extended data square (EDS) is a `2k x 2k` grid of shares whose top-left `k x k` quadrant
//! holds the original data and whose remaining quadrants hold parity data produced by an
//! erasure code. Each row and each column is committed to by its own [Tree], whose roots are
//! published in a [DataAvailabilityHeader].
//!
//! Trees are obtained from a [TreeConstructor], which is told which [Axis] (and index) a tree
//! is about to commit to. [compute_roots] builds the roots in a fixed order: row `0`, column `0`,
//! row `1`, column `1`, and so on.

use crate::{
    namespace::{NamespaceId, PARITY_SHARES_NAMESPACE},
    nmt::{self, NodeVisitor, Nmt},
};
use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when committing to a square.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("square is empty")]
    EmptySquare,
    #[error("row {0} has {1} shares (expected {2})")]
    InvalidRowLength(usize, usize, usize),
    #[error("tree error: {0}")]
    Tree(#[from] nmt::Error),
}

/// A row or a column of a square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Row,
    Col,
}

/// A tree that commits to the shares of one row or column.
pub trait Tree {
    /// Add the next share of the axis.
    fn push(&mut self, share: &[u8]) -> Result<(), nmt::Error>;

    /// Returns the root of all shares pushed so far.
    fn root(&mut self) -> Bytes;
}

/// Creates the [Tree] used to commit to some row or column.
pub trait TreeConstructor {
    type Tree: Tree;

    /// Returns a new tree for the axis at `index`.
    fn construct(&mut self, axis: Axis, index: usize) -> Self::Tree;
}

/// The roots of every row and column of an extended data square.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataAvailabilityHeader {
    /// Root of every row tree, top to bottom.
    pub row_roots: Vec<Bytes>,
    /// Root of every column tree, left to right.
    pub column_roots: Vec<Bytes>,
}

/// An [Nmt] over one axis of an extended square.
///
/// A share is namespaced by its own prefix only if it lies in the original quadrant (both the
/// axis index and its position along the axis are below `square_size`). Every other share is
/// parity data and is namespaced by [PARITY_SHARES_NAMESPACE].
pub struct ErasuredTree {
    square_size: usize,
    axis_index: usize,
    cell: usize,
    tree: Nmt,
}

impl ErasuredTree {
    /// Create a tree for the row or column at `axis_index` of a square with `square_size`
    /// original shares per axis.
    pub fn new(square_size: usize, axis_index: usize, visitor: Option<NodeVisitor>) -> Self {
        let tree = match visitor {
            Some(visitor) => Nmt::with_visitor(visitor),
            None => Nmt::new(),
        };
        Self {
            square_size,
            axis_index,
            cell: 0,
            tree,
        }
    }
}

impl Tree for ErasuredTree {
    fn push(&mut self, share: &[u8]) -> Result<(), nmt::Error> {
        let id = if self.axis_index < self.square_size && self.cell < self.square_size {
            NamespaceId::from_prefix(share).ok_or(nmt::Error::InvalidLeafSize(share.len()))?
        } else {
            PARITY_SHARES_NAMESPACE
        };
        let mut leaf = Vec::with_capacity(id.as_ref().len() + share.len());
        leaf.extend_from_slice(id.as_ref());
        leaf.extend_from_slice(share);
        self.tree.push(&leaf)?;
        self.cell += 1;
        Ok(())
    }

    fn root(&mut self) -> Bytes {
        self.tree.root()
    }
}

/// A [TreeConstructor] that returns a plain [ErasuredTree] for every axis.
#[derive(Clone, Copy, Debug)]
pub struct DefaultConstructor {
    square_size: usize,
}

impl DefaultConstructor {
    pub fn new(square_size: usize) -> Self {
        Self { square_size }
    }
}

impl TreeConstructor for DefaultConstructor {
    type Tree = ErasuredTree;

    fn construct(&mut self, _: Axis, index: usize) -> ErasuredTree {
        ErasuredTree::new(self.square_size, index, None)
    }
}

/// Compute the row and column roots of an extended square.
///
/// For each index `i`, the tree for row `i` is constructed (and its root computed) before the
/// tree for column `i`. `constructor` is therefore invoked `2 * width` times, alternating between
/// [Axis::Row] and [Axis::Col] and starting with [Axis::Row].
pub fn compute_roots<C: TreeConstructor>(
    square: &[Vec<Bytes>],
    constructor: &mut C,
) -> Result<DataAvailabilityHeader, Error> {
    let width = square.len();
    if width == 0 {
        return Err(Error::EmptySquare);
    }
    for (i, row) in square.iter().enumerate() {
        if row.len() != width {
            return Err(Error::InvalidRowLength(i, row.len(), width));
        }
    }

    let mut dah = DataAvailabilityHeader {
        row_roots: Vec::with_capacity(width),
        column_roots: Vec::with_capacity(width),
    };
    for i in 0..width {
        let mut tree = constructor.construct(Axis::Row, i);
        for share in &square[i] {
            tree.push(share)?;
        }
        dah.row_roots.push(tree.root());

        let mut tree = constructor.construct(Axis::Col, i);
        for row in square {
            tree.push(&row[i])?;
        }
        dah.column_roots.push(tree.root());
    }
    debug!(width, "computed square roots");
    Ok(dah)
}
