//! Node layouts for the Adaptive Radix Tree.
//!
//! ART's defining trick is picking the node representation by the actual
//! number of children rather than committing to one fanout for the whole
//! tree:
//!
//! - `N4`: up to 4 children, parallel sorted arrays (cheapest, most common).
//! - `N16`: 5-16 children, same shape as `N4` but wider.
//! - `N48`: 17-48 children, a 256-entry byte-to-slot index plus 48 slots.
//! - `N256`: 49-256 children, direct array indexing.
//!
//! A child slot is either empty, a leaf, or another inner node. Unlike the
//! C original, which tags this in the low bit of a pointer word, the tag
//! here is the `Child` enum discriminant, checked by the compiler rather
//! than by bit masking.

use crate::art::leaf::Leaf;

/// Bytes of compressed path prefix stored inline in a node header.
///
/// Matches the reference C implementation's `MAX_PREFIX_LEN` (both the
/// older `art_tree` and newer `art` headers agree on 10, despite a stale
/// comment elsewhere suggesting 14 was considered for a packed layout).
pub(crate) const MAX_PREFIX_LEN: usize = 10;

/// The four adaptive node layouts, for introspection and debug printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Up to 4 children.
    N4,
    /// 5 to 16 children.
    N16,
    /// 17 to 48 children.
    N48,
    /// 49 to 256 children.
    N256,
}

/// The compressed path prefix shared by every inner node layout.
///
/// `partial_len` is the *logical* length of the compressed prefix and may
/// exceed `MAX_PREFIX_LEN`; when it does, `partial` holds only the first
/// `MAX_PREFIX_LEN` bytes and the remainder is recovered on demand from a
/// descendant leaf (optimistic path compression).
#[derive(Clone)]
pub(crate) struct Header {
    pub partial_len: u32,
    pub partial: [u8; MAX_PREFIX_LEN],
}

impl Header {
    pub fn new() -> Self {
        Header { partial_len: 0, partial: [0; MAX_PREFIX_LEN] }
    }

    /// Number of prefix bytes actually stored inline (`<= MAX_PREFIX_LEN`).
    pub fn stored_len(&self) -> usize {
        (self.partial_len as usize).min(MAX_PREFIX_LEN)
    }

    /// Overwrite the stored window and logical length. `bytes` must already
    /// be truncated to at most `MAX_PREFIX_LEN` entries by the caller.
    pub fn set_partial(&mut self, bytes: &[u8], logical_len: usize) {
        debug_assert!(bytes.len() <= MAX_PREFIX_LEN);
        self.partial = [0; MAX_PREFIX_LEN];
        self.partial[..bytes.len()].copy_from_slice(bytes);
        self.partial_len = logical_len as u32;
    }
}

/// A child slot: either a leaf or a narrower inner node.
pub(crate) enum Child<V> {
    Leaf(Box<Leaf<V>>),
    Inner(Box<Node<V>>),
}

/// An inner node in one of the four adaptive layouts.
pub(crate) enum Node<V> {
    N4 {
        header: Header,
        num_children: u8,
        keys: [u8; 4],
        children: [Option<Child<V>>; 4],
    },
    N16 {
        header: Header,
        num_children: u8,
        keys: [u8; 16],
        children: [Option<Child<V>>; 16],
    },
    N48 {
        header: Header,
        num_children: u8,
        /// `keys[c] == 0` means byte `c` is absent; otherwise `1 +` the
        /// index into `children`.
        keys: [u8; 256],
        children: [Option<Child<V>>; 48],
    },
    N256 {
        header: Header,
        num_children: u16,
        /// Boxed so the enum's stack footprint isn't dominated by the
        /// largest layout.
        children: Box<[Option<Child<V>>; 256]>,
    },
}

impl<V> Node<V> {
    pub fn new_n4() -> Self {
        Node::N4 {
            header: Header::new(),
            num_children: 0,
            keys: [0; 4],
            children: std::array::from_fn(|_| None),
        }
    }

    pub fn header(&self) -> &Header {
        match self {
            Node::N4 { header, .. }
            | Node::N16 { header, .. }
            | Node::N48 { header, .. }
            | Node::N256 { header, .. } => header,
        }
    }

    pub fn header_mut(&mut self) -> &mut Header {
        match self {
            Node::N4 { header, .. }
            | Node::N16 { header, .. }
            | Node::N48 { header, .. }
            | Node::N256 { header, .. } => header,
        }
    }

    pub fn num_children(&self) -> usize {
        match self {
            Node::N4 { num_children, .. } => *num_children as usize,
            Node::N16 { num_children, .. } => *num_children as usize,
            Node::N48 { num_children, .. } => *num_children as usize,
            Node::N256 { num_children, .. } => *num_children as usize,
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            Node::N4 { .. } => NodeType::N4,
            Node::N16 { .. } => NodeType::N16,
            Node::N48 { .. } => NodeType::N48,
            Node::N256 { .. } => NodeType::N256,
        }
    }

    /// §4.3 `find_child`: read-only lookup, used by search.
    ///
    /// A slot whose `keys[i] == c` entry is still set but whose `children[i]`
    /// has already been taken (the transient state `delete_recursive` leaves
    /// behind after removing a leaf, before the parent's `remove_child` has
    /// run) yields `None` here rather than unwrapping — callers use this to
    /// detect exactly that "child just vanished" transition.
    pub fn find_child(&self, c: u8) -> Option<&Child<V>> {
        match self {
            Node::N4 { keys, children, num_children } => {
                (0..*num_children as usize).find(|&i| keys[i] == c).and_then(|i| children[i].as_ref())
            }
            Node::N16 { keys, children, num_children } => {
                (0..*num_children as usize).find(|&i| keys[i] == c).and_then(|i| children[i].as_ref())
            }
            Node::N48 { keys, children, .. } => {
                let idx = keys[c as usize];
                if idx != 0 {
                    children[(idx - 1) as usize].as_ref()
                } else {
                    None
                }
            }
            Node::N256 { children, .. } => children[c as usize].as_ref(),
        }
    }

    /// Mutable counterpart of [`Node::find_child`], returning the slot
    /// itself (not just the child) so callers can recurse into it or
    /// overwrite it in place without a parent pointer.
    pub fn find_child_mut(&mut self, c: u8) -> Option<&mut Option<Child<V>>> {
        match self {
            Node::N4 { keys, children, num_children } => (0..*num_children as usize)
                .find(|&i| keys[i] == c)
                .map(move |i| &mut children[i]),
            Node::N16 { keys, children, num_children } => (0..*num_children as usize)
                .find(|&i| keys[i] == c)
                .map(move |i| &mut children[i]),
            Node::N48 { keys, children, .. } => {
                let idx = keys[c as usize];
                if idx != 0 {
                    Some(&mut children[(idx - 1) as usize])
                } else {
                    None
                }
            }
            Node::N256 { children, .. } => {
                if children[c as usize].is_some() {
                    Some(&mut children[c as usize])
                } else {
                    None
                }
            }
        }
    }

    /// Children in strictly ascending key-byte order, regardless of layout.
    /// N4/N16 are already stored sorted; N48/N256 are recovered by scanning
    /// the byte space 0..256 (§4.8).
    pub fn iter_children(&self) -> Box<dyn Iterator<Item = (u8, &Child<V>)> + '_> {
        match self {
            Node::N4 { keys, children, num_children } => {
                let n = *num_children as usize;
                Box::new((0..n).map(move |i| (keys[i], children[i].as_ref().unwrap())))
            }
            Node::N16 { keys, children, num_children } => {
                let n = *num_children as usize;
                Box::new((0..n).map(move |i| (keys[i], children[i].as_ref().unwrap())))
            }
            Node::N48 { keys, children, .. } => Box::new((0..256usize).filter_map(move |c| {
                let idx = keys[c];
                if idx != 0 {
                    Some((c as u8, children[(idx - 1) as usize].as_ref().unwrap()))
                } else {
                    None
                }
            })),
            Node::N256 { children, .. } => {
                Box::new((0..256usize).filter_map(move |c| children[c].as_ref().map(|ch| (c as u8, ch))))
            }
        }
    }

    /// §4.6 node growth: insert a keyed child, growing to the next wider
    /// layout first if the current one is full.
    pub fn add_child(&mut self, c: u8, child: Child<V>) {
        match self {
            Node::N4 { num_children, .. } if *num_children as usize >= 4 => {
                self.grow_to_n16();
                self.add_child(c, child);
            }
            Node::N4 { keys, children, num_children, .. } => {
                let n = *num_children as usize;
                let mut pos = n;
                for i in 0..n {
                    if c < keys[i] {
                        pos = i;
                        break;
                    }
                }
                for i in (pos..n).rev() {
                    keys[i + 1] = keys[i];
                    children[i + 1] = children[i].take();
                }
                keys[pos] = c;
                children[pos] = Some(child);
                *num_children += 1;
            }

            Node::N16 { num_children, .. } if *num_children as usize >= 16 => {
                self.grow_to_n48();
                self.add_child(c, child);
            }
            Node::N16 { keys, children, num_children, .. } => {
                let n = *num_children as usize;
                let mut pos = n;
                for i in 0..n {
                    if c < keys[i] {
                        pos = i;
                        break;
                    }
                }
                for i in (pos..n).rev() {
                    keys[i + 1] = keys[i];
                    children[i + 1] = children[i].take();
                }
                keys[pos] = c;
                children[pos] = Some(child);
                *num_children += 1;
            }

            Node::N48 { num_children, .. } if *num_children as usize >= 48 => {
                self.grow_to_n256();
                self.add_child(c, child);
            }
            Node::N48 { keys, children, num_children, .. } => {
                let pos = children
                    .iter()
                    .position(|slot| slot.is_none())
                    .expect("N48 with num_children < 48 must have a free slot");
                children[pos] = Some(child);
                keys[c as usize] = (pos + 1) as u8;
                *num_children += 1;
            }

            Node::N256 { children, num_children, .. } => {
                if children[c as usize].is_none() {
                    *num_children += 1;
                }
                children[c as usize] = Some(child);
            }
        }
    }

    fn grow_to_n16(&mut self) {
        if let Node::N4 { header, keys, children, num_children } = self {
            let mut new_keys = [0u8; 16];
            new_keys[..4].copy_from_slice(keys);
            let mut new_children: [Option<Child<V>>; 16] = std::array::from_fn(|_| None);
            for (i, slot) in children.iter_mut().enumerate() {
                new_children[i] = slot.take();
            }
            let header = header.clone();
            let num_children = *num_children;
            tracing::trace!(num_children, "grow N4 -> N16");
            *self = Node::N16 { header, num_children, keys: new_keys, children: new_children };
        }
    }

    fn grow_to_n48(&mut self) {
        if let Node::N16 { header, keys, children, num_children } = self {
            let mut new_keys = [0u8; 256];
            let mut new_children: [Option<Child<V>>; 48] = std::array::from_fn(|_| None);
            for i in 0..*num_children as usize {
                new_children[i] = children[i].take();
                new_keys[keys[i] as usize] = (i + 1) as u8;
            }
            let header = header.clone();
            let num_children = *num_children;
            tracing::trace!(num_children, "grow N16 -> N48");
            *self = Node::N48 { header, num_children, keys: new_keys, children: new_children };
        }
    }

    fn grow_to_n256(&mut self) {
        if let Node::N48 { header, keys, children, num_children } = self {
            let mut new_children: Box<[Option<Child<V>>; 256]> = Box::new(std::array::from_fn(|_| None));
            for (byte, &idx) in keys.iter().enumerate() {
                if idx != 0 {
                    new_children[byte] = children[(idx - 1) as usize].take();
                }
            }
            let header = header.clone();
            let num_children = *num_children as u16;
            tracing::trace!(num_children, "grow N48 -> N256");
            *self = Node::N256 { header, num_children, children: new_children };
        }
    }

    /// §4.7 node shrink: remove the child keyed by `c`, narrowing the
    /// layout if the new count crosses a shrink threshold. Collapsing a
    /// single-child N4 into its sole child is the caller's job (it needs
    /// the parent's slot, which this method doesn't have access to).
    pub fn remove_child(&mut self, c: u8) {
        let shrink_needed = match self {
            Node::N4 { keys, children, num_children, .. } => {
                let n = *num_children as usize;
                if let Some(pos) = (0..n).find(|&i| keys[i] == c) {
                    for i in pos..n - 1 {
                        keys[i] = keys[i + 1];
                        children[i] = children[i + 1].take();
                    }
                    children[n - 1] = None;
                    *num_children -= 1;
                }
                false
            }
            Node::N16 { keys, children, num_children, .. } => {
                let n = *num_children as usize;
                let mut shrink = false;
                if let Some(pos) = (0..n).find(|&i| keys[i] == c) {
                    for i in pos..n - 1 {
                        keys[i] = keys[i + 1];
                        children[i] = children[i + 1].take();
                    }
                    children[n - 1] = None;
                    *num_children -= 1;
                    shrink = *num_children == 3;
                }
                shrink
            }
            Node::N48 { keys, children, num_children, .. } => {
                let pos = keys[c as usize];
                let mut shrink = false;
                if pos != 0 {
                    children[(pos - 1) as usize] = None;
                    keys[c as usize] = 0;
                    *num_children -= 1;
                    shrink = *num_children == 12;
                }
                shrink
            }
            Node::N256 { children, num_children, .. } => {
                let mut shrink = false;
                if children[c as usize].take().is_some() {
                    *num_children -= 1;
                    shrink = *num_children == 37;
                }
                shrink
            }
        };
        if shrink_needed {
            match self {
                Node::N16 { .. } => self.shrink_to_n4(),
                Node::N48 { .. } => self.shrink_to_n16(),
                Node::N256 { .. } => self.shrink_to_n48(),
                _ => {}
            }
        }
    }

    fn shrink_to_n4(&mut self) {
        if let Node::N16 { header, keys, children, num_children } = self {
            let n = *num_children as usize;
            let mut new_keys = [0u8; 4];
            new_keys[..n].copy_from_slice(&keys[..n]);
            let mut new_children: [Option<Child<V>>; 4] = std::array::from_fn(|_| None);
            for i in 0..n {
                new_children[i] = children[i].take();
            }
            let header = header.clone();
            tracing::trace!(num_children = n, "shrink N16 -> N4");
            *self = Node::N4 { header, num_children: n as u8, keys: new_keys, children: new_children };
        }
    }

    fn shrink_to_n16(&mut self) {
        if let Node::N48 { header, keys, children, num_children } = self {
            let mut new_keys = [0u8; 16];
            let mut new_children: [Option<Child<V>>; 16] = std::array::from_fn(|_| None);
            let mut idx = 0;
            for (byte, &pos) in keys.iter().enumerate() {
                if pos != 0 {
                    new_keys[idx] = byte as u8;
                    new_children[idx] = children[(pos - 1) as usize].take();
                    idx += 1;
                }
            }
            let header = header.clone();
            let num_children = *num_children;
            tracing::trace!(num_children, "shrink N48 -> N16");
            *self = Node::N16 { header, num_children, keys: new_keys, children: new_children };
        }
    }

    fn shrink_to_n48(&mut self) {
        if let Node::N256 { header, children, num_children } = self {
            let mut new_keys = [0u8; 256];
            let mut new_children: [Option<Child<V>>; 48] = std::array::from_fn(|_| None);
            let mut idx = 0;
            for byte in 0..256 {
                if children[byte].is_some() {
                    new_children[idx] = children[byte].take();
                    new_keys[byte] = (idx + 1) as u8;
                    idx += 1;
                }
            }
            let header = header.clone();
            let num_children = *num_children as u8;
            tracing::trace!(num_children, "shrink N256 -> N48");
            *self = Node::N48 { header, num_children, keys: new_keys, children: new_children };
        }
    }
}

