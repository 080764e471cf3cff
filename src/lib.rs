//! # art-rs
//!
//! An in-memory ordered map keyed by variable-length byte strings,
//! implemented as an Adaptive Radix Tree (ART).
//!
//! Based on "The Adaptive Radix Tree: ARTful Indexing for Main-Memory
//! Databases" (Leis, Kemper, Neumann, ICDE 2013).
//!
//! ## Example
//!
//! ```rust
//! use art_rs::Tree;
//!
//! let mut tree: Tree<u64> = Tree::new();
//! tree.insert(b"hello", 1);
//! tree.insert(b"world", 2);
//!
//! assert_eq!(tree.get(b"hello"), Some(&1));
//! assert_eq!(tree.get(b"world"), Some(&2));
//! assert_eq!(tree.minimum(), Some((&b"hello"[..], &1)));
//! ```
//!
//! ## Counters
//!
//! [`Tree<Value>`] additionally supports atomic-in-spirit (single-threaded)
//! increment/decrement over an opaque 8-byte [`Value`] payload, for
//! building things like reference counts or histograms directly on top of
//! the tree rather than bolting a separate counter map on the side:
//!
//! ```rust
//! use art_rs::{Tree, Value, IncrementDesc};
//!
//! let mut tree: Tree<Value> = Tree::new();
//! let (existed, v) = tree.insert_increment(b"hits", IncrementDesc::WholeU64);
//! assert!(!existed);
//! assert_eq!(v.as_u64(), 1);
//! ```

mod art;

pub use art::value::{IncrementDesc, Value};
pub use art::IntegrityIssue;
pub use art::Iter;
pub use art::Tree;

/// What went wrong constructing or configuring a [`Tree`].
///
/// Ordinary lookups, inserts, and deletes never fail: a missing key is
/// `None`, not an error. `ArtError` exists only for misconfiguration
/// caught before a tree is built.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ArtError {
    /// A key longer than the tree's documented ceiling was rejected by a
    /// caller that opted into the checked entry point
    /// ([`check_key_len`](crate::check_key_len)) instead of the normal,
    /// total `insert`/`search`/`delete`.
    #[error("key length {len} exceeds the maximum of {max}")]
    KeyTooLong { len: usize, max: usize },

    /// [`Config`] held a combination of settings this tree can't honor.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// The largest key length a tree guarantees to handle; also documents why
/// `debug_assert!` (not a runtime check) guards it on the hot path — see
/// [`check_key_len`] for callers that want it enforced unconditionally.
pub const MAX_KEY_LEN: usize = u32::MAX as usize;

/// Validate `key` against [`MAX_KEY_LEN`] without touching a tree. The
/// normal `insert`/`search`/`delete` entry points only `debug_assert!`
/// this in development builds; call this first if a caller's input is
/// untrusted and the check needs to run in release builds too.
pub fn check_key_len(key: &[u8]) -> Result<(), ArtError> {
    if key.len() > MAX_KEY_LEN {
        Err(ArtError::KeyTooLong { len: key.len(), max: MAX_KEY_LEN })
    } else {
        Ok(())
    }
}

/// Tunable behavior for a [`Tree`]. Currently a placeholder for future
/// knobs (e.g. whether to reject keys that are a byte-for-byte prefix of
/// another inserted key); the virtual-terminator scheme already makes
/// prefix keys safe by default, so there is nothing to flip on today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Reserved for a future stricter mode. Currently has no effect:
    /// [`Tree`] already supports one key being a prefix of another via its
    /// virtual-terminator byte, unconditionally.
    pub require_no_key_is_prefix_of_another: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config { require_no_key_is_prefix_of_another: false }
    }
}

impl Config {
    /// Always succeeds today; kept as a named validation point so adding
    /// a real constraint later doesn't change [`Tree::with_config`]'s
    /// signature.
    pub fn validate(&self) -> Result<(), ArtError> {
        Ok(())
    }
}

#[cfg(test)]
mod proptests;
