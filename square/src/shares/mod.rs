//! Split namespaced messages into fixed-size shares.
//!
//! # Layout
//!
//! Every share is exactly [Config::share_size] bytes and starts with the [NamespaceId] of the
//! message it belongs to. The remaining [Config::payload_capacity] bytes hold the message's
//! length-delimited encoding:
//!
//! ```text
//! +-----------+--------------------------------------------+
//! | namespace |  varint(len) || data ...  (zero padded)    |
//! +-----------+--------------------------------------------+
//!   8 bytes              share_size - 8 bytes
//! ```
//!
//! A message whose encoding does not fit in one share continues in the payload of the next
//! share(s), each again prefixed by the namespace. Only the last share of a message is ever
//! zero padded.
//!
//! # Padding
//!
//! To let a single subtree of a row's Merkle tree cover a message, callers align each message to
//! a power-of-two boundary by inserting padding shares (namespace prefix followed by zeros) with
//! [MessageShareSplitter::write_namespaced_padded_shares]. A zero length header is therefore
//! never interpreted as a message when [parse_messages] reads the shares back.

use crate::namespace::{NamespaceId, NAMESPACE_SIZE, TAIL_PADDING_NAMESPACE};
use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

mod message;
pub use message::Message;
mod parse;
pub use parse::parse_messages;
mod splitter;
pub use splitter::MessageShareSplitter;

/// Default size (in bytes) of a share.
pub const SHARE_SIZE: usize = 256;

/// Default number of payload bytes available in a share after the namespace prefix.
pub const MSG_SHARE_SIZE: usize = SHARE_SIZE - NAMESPACE_SIZE;

/// Errors that can occur when reading messages back from shares.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("invalid share size: expected {0} got {1}")]
    InvalidShareSize(usize, usize),
    #[error("invalid varint length prefix")]
    InvalidVarint,
    #[error("namespace mismatch: expected {0} got {1}")]
    NamespaceMismatch(NamespaceId, NamespaceId),
    #[error("message truncated: expected {0} bytes got {1}")]
    Truncated(usize, usize),
}

/// Configuration for share layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// The size (in bytes) of every share, including the namespace prefix.
    pub share_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            share_size: SHARE_SIZE,
        }
    }
}

impl Config {
    /// Returns the number of message bytes a single share can hold.
    pub fn payload_capacity(&self) -> usize {
        self.share_size - NAMESPACE_SIZE
    }

    /// Returns the number of shares needed to hold `len` bytes of delimited message data.
    pub fn shares_needed(&self, len: usize) -> usize {
        if len == 0 {
            return 1;
        }
        len.div_ceil(self.payload_capacity())
    }

    pub(crate) fn assert_valid(&self) {
        assert!(
            self.share_size > NAMESPACE_SIZE,
            "share size ({}) must exceed namespace size ({})",
            self.share_size,
            NAMESPACE_SIZE
        );
    }
}

/// A share prefixed by the namespace it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespacedShare {
    /// The full share, including the namespace prefix.
    pub data: Bytes,
    /// The namespace of the share (equal to `data[..NAMESPACE_SIZE]`).
    pub id: NamespaceId,
}

impl NamespacedShare {
    /// Build a share from a namespace and (at most [Config::payload_capacity]) payload bytes,
    /// zero padding the remainder.
    fn new(cfg: &Config, id: NamespaceId, payload: &[u8]) -> Self {
        assert!(payload.len() <= cfg.payload_capacity());
        let mut data = BytesMut::with_capacity(cfg.share_size);
        data.put_slice(id.as_ref());
        data.put_slice(payload);
        data.resize(cfg.share_size, 0);
        Self {
            data: data.freeze(),
            id,
        }
    }

    /// Returns the bytes that follow the namespace prefix.
    pub fn payload(&self) -> &[u8] {
        &self.data[NAMESPACE_SIZE..]
    }
}

/// Append `raw` (a delimited message) to `shares`, returning the extended list.
///
/// # Panics
///
/// Panics if `cfg.share_size` does not leave room for a payload after the namespace.
pub fn append_to_shares(
    cfg: &Config,
    mut shares: Vec<NamespacedShare>,
    id: NamespaceId,
    raw: &[u8],
) -> Vec<NamespacedShare> {
    cfg.assert_valid();
    if raw.len() <= cfg.payload_capacity() {
        shares.push(NamespacedShare::new(cfg, id, raw));
    } else {
        shares.extend(split_message(cfg, id, raw));
    }
    shares
}

/// Break `raw` into the minimum number of shares.
///
/// Every share but the last is filled to capacity.
///
/// # Panics
///
/// Panics if `cfg.share_size` does not leave room for a payload after the namespace.
pub fn split_message(cfg: &Config, id: NamespaceId, raw: &[u8]) -> Vec<NamespacedShare> {
    cfg.assert_valid();
    let mut shares = Vec::with_capacity(cfg.shares_needed(raw.len()));
    for chunk in raw.chunks(cfg.payload_capacity()) {
        shares.push(NamespacedShare::new(cfg, id, chunk));
    }
    shares
}

/// Returns `count` shares in namespace `id` with an all-zero payload.
pub fn namespaced_padded_shares(
    cfg: &Config,
    id: NamespaceId,
    count: usize,
) -> Vec<NamespacedShare> {
    cfg.assert_valid();
    let share = NamespacedShare::new(cfg, id, &[]);
    vec![share; count]
}

/// Returns `count` padding shares used to fill the remainder of a square after all messages.
pub fn tail_padding_shares(cfg: &Config, count: usize) -> Vec<NamespacedShare> {
    namespaced_padded_shares(cfg, TAIL_PADDING_NAMESPACE, count)
}
