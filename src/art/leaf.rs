//! Leaf storage.

use smallvec::SmallVec;

/// Keys this long or shorter need no separate heap allocation beyond the
/// leaf itself. Chosen generously enough to cover the delimited-key shapes
/// exercised in tests (`"user:1001"`-style keys) without over-inflating
/// every leaf.
const INLINE_KEY_LEN: usize = 24;

/// A leaf: the full key plus its value, owned by exactly one child slot.
pub(crate) struct Leaf<V> {
    pub key: SmallVec<[u8; INLINE_KEY_LEN]>,
    pub value: V,
}

impl<V> Leaf<V> {
    pub fn new(key: &[u8], value: V) -> Self {
        Leaf { key: SmallVec::from_slice(key), value }
    }
}
