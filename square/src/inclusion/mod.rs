//! Look up the subtree roots needed to prove that a message is included in a square.
//!
//! # Overview
//!
//! When a message is aligned so that its shares occupy `[start, start + 2^h)` of a row, with
//! `start` a multiple of `2^h`, exactly one node of the row's tree covers it. Proving inclusion
//! of the message then only requires that node's digest (plus the path from it to the row root).
//!
//! [SquareSubtreeCache] hands out the trees used to commit to a square and, for every row tree,
//! attaches a [SubtreeRootCacher] that records the children of each inner node as the row root
//! is computed. Once the [crate::eds::DataAvailabilityHeader] is available, any subtree root of
//! any row can be found by walking down from the published row root along a binary path (see
//! [subtree_path]).
//!
//! ```text
//!                     row root              depth 0
//!                   /          \
//!               false          true         depth 1
//!              /     \        /     \
//!           false   true   false   true     depth 2
//!           [0,1)  [1,2)   [2,3)  [3,4)
//! ```
//!
//! Only inner nodes are cached (leaf digests are never needed to reach a subtree root).

use bytes::Bytes;
use thiserror::Error;

mod cacher;
pub use cacher::SubtreeRootCacher;
mod square;
pub use square::SquareSubtreeCache;

/// Errors that can occur when looking up a subtree root.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("did not find sub tree root: {}", commonware_utils::hex(.0))]
    SubtreeRootNotFound(Bytes),
    #[error("data availability header has unexpected number of row roots: expected {0} got {1}")]
    RowCountMismatch(usize, usize),
    #[error("row exceeds range of cache: max {0} got {1}")]
    RowOutOfRange(usize, usize),
    #[error("range [{0}, {0}+{1}) is not an aligned subtree of a tree of depth {2}")]
    UnalignedRange(usize, usize, usize),
}

/// Returns the path from the root of a tree with `2^depth` leaves to the node covering exactly
/// the leaves `[start, start + width)`.
///
/// `false` selects the left child and `true` the right child. The path has
/// `depth - log2(width)` entries.
pub fn subtree_path(depth: usize, start: usize, width: usize) -> Result<Vec<bool>, Error> {
    let unaligned = || Error::UnalignedRange(start, width, depth);
    if depth >= usize::BITS as usize || !width.is_power_of_two() || start % width != 0 {
        return Err(unaligned());
    }
    let leaves = 1usize << depth;
    if width > leaves || start > leaves - width {
        return Err(unaligned());
    }

    // The bits of the subtree's index at its height, most significant first
    let height = width.trailing_zeros() as usize;
    let len = depth - height;
    let index = start >> height;
    Ok((0..len).rev().map(|bit| (index >> bit) & 1 == 1).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(2, 0, 4, vec![]; "whole tree")]
    #[test_case(2, 0, 1, vec![false, false]; "first leaf")]
    #[test_case(2, 3, 1, vec![true, true]; "last leaf")]
    #[test_case(2, 2, 2, vec![true]; "right half")]
    #[test_case(3, 4, 2, vec![true, false]; "third pair")]
    #[test_case(4, 12, 4, vec![true, true]; "last quarter")]
    fn test_subtree_path(depth: usize, start: usize, width: usize, expected: Vec<bool>) {
        assert_eq!(subtree_path(depth, start, width).unwrap(), expected);
    }

    #[test_case(2, 1, 2; "unaligned start")]
    #[test_case(2, 0, 3; "width not a power of two")]
    #[test_case(2, 0, 0; "zero width")]
    #[test_case(2, 4, 1; "start out of range")]
    #[test_case(2, 0, 8; "width out of range")]
    fn test_subtree_path_invalid(depth: usize, start: usize, width: usize) {
        assert_eq!(
            subtree_path(depth, start, width),
            Err(Error::UnalignedRange(start, width, depth))
        );
    }
}
