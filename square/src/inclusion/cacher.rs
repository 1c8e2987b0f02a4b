use super::Error;
use bytes::Bytes;
use std::collections::HashMap;

/// Records the inner nodes of a single tree as its root is computed.
///
/// Leaves (and their digests) are not cached, only the two children of every inner node keyed
/// by the node's own digest.
#[derive(Clone, Debug)]
pub struct SubtreeRootCacher {
    cache: HashMap<Bytes, [Bytes; 2]>,
    depth: usize,
}

impl SubtreeRootCacher {
    /// Create a cacher for a row of an extended square with `square_size` original shares per
    /// row (so `2 * square_size` leaves).
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
            cache: HashMap::new(),
            depth: (2 * square_size).ilog2() as usize,
        }
    }

    /// Returns the number of edges between the row root and a leaf.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the number of cached inner nodes.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns true if no inner node has been cached.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Record a node reported by the tree while computing its root.
    ///
    /// # Panics
    ///
    /// Panics if `children` has neither one (a leaf) nor two (an inner node) entries.
    pub fn visit(&mut self, hash: &Bytes, children: &[Bytes]) {
        match children {
            [left, right] => {
                self.cache.insert(hash.clone(), [left.clone(), right.clone()]);
            }
            [_] => {}
            _ => panic!("unexpected visit with {} children", children.len()),
        }
    }

    /// Follow `path` down from `root` and return the digest of the node it ends at.
    ///
    /// `false` selects the first (left) child and `true` the second (right) child. An empty
    /// path returns `root`.
    pub fn walk(&self, root: &Bytes, path: &[bool]) -> Result<Bytes, Error> {
        let mut node = root;
        for &right in path {
            let Some(children) = self.cache.get(node) else {
                return Err(Error::SubtreeRootNotFound(node.clone()));
            };
            node = &children[right as usize];
        }
        Ok(node.clone())
    }
}
