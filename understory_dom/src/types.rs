// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document tree: node identifiers and node kinds.

/// Identifier for a node in a [`Document`](crate::Document).
///
/// This is a small, copyable handle that stays stable across tree mutations but
/// becomes invalid when the node is removed.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On creation, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Use [`Document::is_alive`](crate::Document::is_alive) to check whether a `NodeId`
/// still refers to a live node. Stale ids never alias a different live node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Returns the generation of this identifier.
    pub const fn generation(self) -> u32 {
        self.1
    }
}

/// The kind of a node in the tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NodeKind {
    /// The document node. Every document has exactly one, and it is the root
    /// of the connected tree.
    Document,
    /// An element with a lower-cased tag name.
    Element {
        /// Tag name, lower-cased.
        tag: String,
    },
    /// A text node.
    Text(String),
    /// A comment node.
    Comment(String),
}

impl NodeKind {
    /// Returns the tag name if this is an element.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Element { tag } => Some(tag),
            _ => None,
        }
    }

    /// Returns true for text and comment nodes.
    pub fn is_character_data(&self) -> bool {
        matches!(self, Self::Text(_) | Self::Comment(_))
    }
}
