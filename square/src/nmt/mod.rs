//! A namespaced Merkle tree (NMT).
//!
//! Every node digest is prefixed by the minimum and maximum namespace of the leaves it covers,
//! which lets a verifier check that a proof covers every leaf of some namespace.
//!
//! # Digests
//!
//! ```text
//! leaf(ns, data)  = ns || ns || sha256(0x00 || ns || data)
//! node(l, r)      = min(l.min, r.min) || max(l.max, r.max) || sha256(0x01 || l || r)
//! empty           = 0^8 || 0^8 || sha256("")
//! ```
//!
//! Trees with a number of leaves that is not a power of two are split at the largest power of
//! two strictly smaller than the number of leaves (as in RFC 6962).
//!
//! # Visitor
//!
//! A [NodeVisitor] can be attached at construction time. It is invoked synchronously while
//! [Nmt::root] is computed: once per leaf with a single child (the namespaced leaf data) and
//! once per inner node with the digests of its two children.

use crate::namespace::{NamespaceId, NAMESPACE_SIZE};
use bytes::{BufMut, Bytes, BytesMut};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Size (in bytes) of the sha256 digest embedded in every node.
pub const DIGEST_SIZE: usize = 32;

/// Size (in bytes) of a node digest (namespace range followed by a sha256 digest).
pub const HASH_SIZE: usize = 2 * NAMESPACE_SIZE + DIGEST_SIZE;

const LEAF_PREFIX: u8 = 0x00;
const NODE_PREFIX: u8 = 0x01;

/// Callback invoked for every node while computing the root of a tree.
///
/// The first argument is the digest of the node, the second the node's children (one for a
/// leaf, two for an inner node).
pub type NodeVisitor = Box<dyn FnMut(&Bytes, &[Bytes])>;

/// Errors that can occur when interacting with an [Nmt].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("leaf too short: {0} bytes")]
    InvalidLeafSize(usize),
    #[error("leaves must be pushed in namespace order: {1} after {0}")]
    InvalidPushOrder(NamespaceId, NamespaceId),
}

/// Returns the minimum namespace covered by a node digest.
///
/// # Panics
///
/// Panics if `hash` is shorter than the two namespaces it starts with.
pub fn min_namespace(hash: &[u8]) -> NamespaceId {
    namespace_at(hash, 0)
}

/// Returns the maximum namespace covered by a node digest.
///
/// # Panics
///
/// Panics if `hash` is shorter than the two namespaces it starts with.
pub fn max_namespace(hash: &[u8]) -> NamespaceId {
    namespace_at(hash, NAMESPACE_SIZE)
}

fn namespace_at(hash: &[u8], offset: usize) -> NamespaceId {
    assert!(
        hash.len() >= 2 * NAMESPACE_SIZE,
        "node digest too short: {} bytes",
        hash.len()
    );
    let mut id = [0u8; NAMESPACE_SIZE];
    id.copy_from_slice(&hash[offset..offset + NAMESPACE_SIZE]);
    NamespaceId::new(id)
}

/// Compute the digest of a leaf from its namespaced data.
///
/// # Panics
///
/// Panics if `namespaced_data` is shorter than a namespace.
pub fn leaf_digest(namespaced_data: &[u8]) -> Bytes {
    assert!(
        namespaced_data.len() >= NAMESPACE_SIZE,
        "leaf too short: {} bytes",
        namespaced_data.len()
    );
    let ns = &namespaced_data[..NAMESPACE_SIZE];
    let mut hasher = Sha256::new();
    hasher.update([LEAF_PREFIX]);
    hasher.update(namespaced_data);

    let mut out = BytesMut::with_capacity(HASH_SIZE);
    out.put_slice(ns);
    out.put_slice(ns);
    out.put_slice(&hasher.finalize());
    out.freeze()
}

/// Compute the digest of an inner node from the digests of its children.
pub fn node_digest(left: &[u8], right: &[u8]) -> Bytes {
    let min = min_namespace(left).min(min_namespace(right));
    let max = max_namespace(left).max(max_namespace(right));
    let mut hasher = Sha256::new();
    hasher.update([NODE_PREFIX]);
    hasher.update(left);
    hasher.update(right);

    let mut out = BytesMut::with_capacity(HASH_SIZE);
    out.put_slice(min.as_ref());
    out.put_slice(max.as_ref());
    out.put_slice(&hasher.finalize());
    out.freeze()
}

/// Returns the digest of a tree with no leaves.
pub fn empty_root() -> Bytes {
    let mut out = BytesMut::with_capacity(HASH_SIZE);
    out.put_bytes(0, 2 * NAMESPACE_SIZE);
    out.put_slice(&Sha256::digest(b""));
    out.freeze()
}

/// A namespaced Merkle tree built from leaves pushed in namespace order.
pub struct Nmt {
    leaves: Vec<Bytes>,
    leaf_hashes: Vec<Bytes>,
    visitor: Option<NodeVisitor>,
    root: Option<Bytes>,
}

impl Default for Nmt {
    fn default() -> Self {
        Self::new()
    }
}

impl Nmt {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            leaves: Vec::new(),
            leaf_hashes: Vec::new(),
            visitor: None,
            root: None,
        }
    }

    /// Create an empty tree that reports every node to `visitor` when its root is computed.
    pub fn with_visitor(visitor: NodeVisitor) -> Self {
        Self {
            visitor: Some(visitor),
            ..Self::new()
        }
    }

    /// Add a leaf. The first [NAMESPACE_SIZE] bytes of `namespaced_data` are its namespace.
    pub fn push(&mut self, namespaced_data: &[u8]) -> Result<(), Error> {
        let Some(ns) = NamespaceId::from_prefix(namespaced_data) else {
            return Err(Error::InvalidLeafSize(namespaced_data.len()));
        };
        if let Some(last) = self.leaf_hashes.last() {
            let prev = max_namespace(last);
            if ns < prev {
                return Err(Error::InvalidPushOrder(prev, ns));
            }
        }
        self.leaf_hashes.push(leaf_digest(namespaced_data));
        self.leaves.push(Bytes::copy_from_slice(namespaced_data));
        self.root = None;
        Ok(())
    }

    /// Returns the number of leaves in the tree.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Returns true if the tree has no leaves.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Returns the root of the tree, invoking the visitor (if any) for every node.
    ///
    /// The root is memoized until the next [Self::push].
    pub fn root(&mut self) -> Bytes {
        if let Some(root) = &self.root {
            return root.clone();
        }
        let root = if self.leaves.is_empty() {
            empty_root()
        } else {
            self.compute(0, self.leaves.len())
        };
        self.root = Some(root.clone());
        root
    }

    fn compute(&mut self, start: usize, end: usize) -> Bytes {
        if end - start == 1 {
            let hash = self.leaf_hashes[start].clone();
            if let Some(visit) = self.visitor.as_mut() {
                visit(&hash, std::slice::from_ref(&self.leaves[start]));
            }
            return hash;
        }
        let split = start + split_point(end - start);
        let left = self.compute(start, split);
        let right = self.compute(split, end);
        let hash = node_digest(&left, &right);
        if let Some(visit) = self.visitor.as_mut() {
            visit(&hash, &[left, right]);
        }
        hash
    }
}

/// Largest power of two strictly less than `n` (`n > 1`).
fn split_point(n: usize) -> usize {
    debug_assert!(n > 1);
    1 << (usize::BITS - 1 - (n - 1).leading_zeros())
}
