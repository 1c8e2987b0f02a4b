//! Namespace identifiers used to group, sort, and prove shares.

use commonware_utils::hex;
use std::fmt;

/// Size (in bytes) of a [NamespaceId].
pub const NAMESPACE_SIZE: usize = 8;

/// Namespace reserved for transactions.
pub const TX_NAMESPACE: NamespaceId = NamespaceId([0, 0, 0, 0, 0, 0, 0, 1]);

/// Largest namespace reserved for protocol use. Messages must use a namespace greater than this.
pub const MAX_RESERVED_NAMESPACE: NamespaceId = NamespaceId([0, 0, 0, 0, 0, 0, 0, 0xFF]);

/// Namespace of the shares that fill the remainder of a square after all messages.
pub const TAIL_PADDING_NAMESPACE: NamespaceId =
    NamespaceId([0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE]);

/// Namespace assigned to every share in the parity half of an extended row or column.
pub const PARITY_SHARES_NAMESPACE: NamespaceId = NamespaceId([0xFF; NAMESPACE_SIZE]);

/// A fixed-width namespace identifier, ordered byte-wise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NamespaceId([u8; NAMESPACE_SIZE]);

impl NamespaceId {
    /// Create a new [NamespaceId] from raw bytes.
    pub const fn new(id: [u8; NAMESPACE_SIZE]) -> Self {
        Self(id)
    }

    /// Read a [NamespaceId] from the first [NAMESPACE_SIZE] bytes of `buf`.
    ///
    /// Returns `None` if `buf` is too short.
    pub fn from_prefix(buf: &[u8]) -> Option<Self> {
        let prefix = buf.get(..NAMESPACE_SIZE)?;
        let mut id = [0u8; NAMESPACE_SIZE];
        id.copy_from_slice(prefix);
        Some(Self(id))
    }

    /// Returns true if the namespace is reserved for protocol use.
    pub fn is_reserved(&self) -> bool {
        *self <= MAX_RESERVED_NAMESPACE
    }
}

impl AsRef<[u8]> for NamespaceId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; NAMESPACE_SIZE]> for NamespaceId {
    fn from(id: [u8; NAMESPACE_SIZE]) -> Self {
        Self(id)
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex(&self.0))
    }
}
