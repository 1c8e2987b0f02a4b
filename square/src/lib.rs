//! Lay out namespaced messages as shares and cache row commitments for inclusion proofs.
//!
//! # Overview
//!
//! A data square is a `k x k` arrangement of fixed-size [shares::NamespacedShare]s that is
//! extended (by some external erasure code) to `2k x 2k` and committed to by one namespaced
//! Merkle tree per row and per column. This crate covers the two ends of that pipeline that
//! matter for inclusion proofs:
//!
//! - [shares::MessageShareSplitter] turns a sequence of namespaced messages into the sorted,
//!   padded share sequence that populates the square. Padding lets callers align each message
//!   to a power-of-two boundary so that a single subtree of a row tree covers it exactly.
//! - [inclusion::SquareSubtreeCache] observes the construction of every row tree (through the
//!   [nmt::NodeVisitor] callback) and records each inner node's children. Given a published row
//!   root and a binary path, it returns the root of the subtree that covers a message without
//!   recomputing the tree.
//!
//! [eds] provides the row/column commitment driver and the [eds::Tree] / [eds::TreeConstructor]
//! seams the cache plugs into.
//!
//! # Example
//!
//! ```rust
//! use bytes::Bytes;
//! use commonware_square::{
//!     eds::compute_roots,
//!     inclusion::{subtree_path, SquareSubtreeCache},
//!     namespace::NamespaceId,
//!     shares::{Config, Message, MessageShareSplitter},
//! };
//!
//! // Lay out a single message that fills two shares
//! let cfg = Config::default();
//! let mut splitter = MessageShareSplitter::new(cfg);
//! let namespace = NamespaceId::new([1, 2, 3, 4, 5, 6, 7, 8]);
//! splitter.write(&Message::new(namespace, vec![7u8; 300]));
//! assert_eq!(splitter.count(), 2);
//! let shares = splitter.export();
//!
//! // Build a 2x2 square (extended to 4x4 with placeholder parity that is not namespace sorted)
//! let square_size = 2;
//! let width = 2 * square_size;
//! let square: Vec<Vec<Bytes>> = (0..width)
//!     .map(|r| {
//!         (0..width)
//!             .map(|c| {
//!                 if r < square_size && c < square_size {
//!                     // Repeat the message shares to fill the original quadrant
//!                     shares[(r * square_size + c) % shares.len()].data.clone()
//!                 } else {
//!                     Bytes::from(vec![(width * width - r * width - c) as u8; cfg.share_size])
//!                 }
//!             })
//!             .collect()
//!     })
//!     .collect();
//!
//! // Commit to the square while caching row inner nodes
//! let mut cache = SquareSubtreeCache::new(square_size);
//! let dah = compute_roots(&square, &mut cache).unwrap();
//!
//! // The message occupies leaves [0, 2) of row 0
//! let depth = cache.depth();
//! let path = subtree_path(depth, 0, 2).unwrap();
//! let root = cache.get_subtree_root(&dah, 0, &path).unwrap();
//! assert_eq!(root.len(), commonware_square::nmt::HASH_SIZE);
//! ```
//!
//! # Status
//!
//! `commonware-square` is **ALPHA** software and is not yet recommended for production use. Developers should
//! expect breaking changes and occasional instability.

pub mod eds;
pub mod inclusion;
pub mod namespace;
pub mod nmt;
pub mod shares;
