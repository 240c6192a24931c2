// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Arena-based node storage. Nodes are owned by a single `Arena`, keyed by
//! a monotonically assigned `NodeId`; the tree structure above them is
//! just `Vec<NodeId>` child lists, so moving a subtree is a pointer-sized
//! operation rather than a DOM reparent. This replaces the teacher's
//! `Arc<DocumentNode>` live tree (`node_tree::doc_node::DocumentNode`),
//! which is wired directly to a `web_sys::Node` and so cannot exist
//! without a DOM; an arena keeps the document model usable outside a
//! browser (e.g. server-side, or under plain `#[test]`).

use std::collections::BTreeMap;
use std::fmt;

use crate::error::Error;
use crate::text_model::TextModel;

/// Prefix that makes an id's syntactic kind recognizable at a glance —
/// the arena-index equivalent of the teacher's DOM element ids.
const ID_PREFIX: &str = "blk-";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) fn from_raw(n: u64) -> Self {
        NodeId(n)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ID_PREFIX}{}", self.0)
    }
}

impl std::str::FromStr for NodeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let suffix = s.strip_prefix(ID_PREFIX).ok_or_else(|| Error::UnknownNodeId { id: s.to_string() })?;
        suffix
            .parse::<u64>()
            .map(NodeId)
            .map_err(|_| Error::UnknownNodeId { id: s.to_string() })
    }
}

/// Is `s` syntactically a block id, regardless of whether it currently
/// resolves to a live node?
pub fn is_block_id(s: &str) -> bool {
    s.strip_prefix(ID_PREFIX)
        .map(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false)
}

/// An attribute value. Plain scalars and nested structures serialize
/// straight through `serde_json`; `Text` carries a nested Text Model for
/// attributes that are themselves rich text (e.g. a caption).
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    List(Vec<AttrValue>),
    Map(BTreeMap<String, AttrValue>),
    Text(TextModel),
}

impl AttrValue {
    pub fn as_text(&self) -> Option<&TextModel> {
        match self {
            AttrValue::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Str(s.to_string())
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

pub type Attributes = BTreeMap<String, AttrValue>;

/// A single node in the document tree: the title, or a block (or
/// sub-block) in the body. Analogous to the teacher's `BlockDataElement`
/// payload, minus the DOM handle — `Arena` owns the tree structure
/// instead.
#[derive(Clone, Debug)]
pub struct BlockDataElement {
    pub id: NodeId,
    pub block_type: String,
    pub attributes: Attributes,
    pub children: Vec<NodeId>,
    /// Present only for text-like blocks (spec: blocks whose content is a
    /// run of rich text rather than a list of child blocks).
    pub text_content: Option<TextModel>,
}

impl BlockDataElement {
    pub fn is_text_like(&self) -> bool {
        self.text_content.is_some()
    }

    pub fn text_content(&self) -> Result<&TextModel, Error> {
        self.text_content.as_ref().ok_or_else(|| Error::NotATextAttribute {
            id: self.id.to_string(),
            attr: "textContent".to_string(),
        })
    }
}

/// Owns every node in a document. Nodes are never reused after removal —
/// ids only grow — so a stale `NodeId` captured before a delete reliably
/// reports `UnknownNodeId` rather than silently resolving to an unrelated
/// node that reused the slot.
#[derive(Clone, Debug, Default)]
pub struct Arena {
    nodes: BTreeMap<NodeId, BlockDataElement>,
    next_id: u64,
}

impl Arena {
    pub fn new() -> Self {
        Arena::default()
    }

    pub fn alloc(&mut self, block_type: impl Into<String>, attributes: Attributes, text_content: Option<TextModel>) -> NodeId {
        let id = NodeId::from_raw(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            BlockDataElement {
                id,
                block_type: block_type.into(),
                attributes,
                children: Vec::new(),
                text_content,
            },
        );
        id
    }

    pub fn get(&self, id: NodeId) -> Result<&BlockDataElement, Error> {
        self.nodes.get(&id).ok_or_else(|| Error::UnknownNodeId { id: id.to_string() })
    }

    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut BlockDataElement, Error> {
        self.nodes.get_mut(&id).ok_or_else(|| Error::UnknownNodeId { id: id.to_string() })
    }

    pub fn remove(&mut self, id: NodeId) -> Result<BlockDataElement, Error> {
        self.nodes.remove(&id).ok_or_else(|| Error::UnknownNodeId { id: id.to_string() })
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn block_id_round_trips_through_display_and_parse() {
        let mut arena = Arena::new();
        let id = arena.alloc("paragraph", Attributes::new(), Some(TextModel::new()));
        let shown = id.to_string();
        assert!(is_block_id(&shown));
        let parsed: NodeId = shown.parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn removed_node_id_is_not_resurrected() {
        let mut arena = Arena::new();
        let id = arena.alloc("paragraph", Attributes::new(), None);
        arena.remove(id).unwrap();
        let other = arena.alloc("paragraph", Attributes::new(), None);
        assert_ne!(id, other);
        assert!(matches!(arena.get(id), Err(Error::UnknownNodeId { .. })));
    }

    #[test]
    fn non_block_id_strings_are_rejected() {
        assert!(!is_block_id("not-an-id"));
        assert!(!is_block_id("blk-"));
        assert!(is_block_id("blk-42"));
    }
}
