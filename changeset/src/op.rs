// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The low-level operations a `Changeset` records (§4.2 table).

use delta::delta::Delta;
use doc_model::node::Attributes;
use doc_model::{CursorState, NodeId, TextModel};

/// A not-yet-allocated block, as supplied to `insertChildrenAt`/`After`.
/// Ids are minted by the arena at apply time (§3 Lifecycles: "ids are
/// minted by an id generator"), so a `NewBlock` never carries one.
pub struct NewBlock {
    pub block_type: String,
    pub attributes: Attributes,
    pub text_content: Option<TextModel>,
    pub children: Vec<NewBlock>,
}

impl NewBlock {
    pub fn new(block_type: impl Into<String>) -> Self {
        NewBlock {
            block_type: block_type.into(),
            attributes: Attributes::new(),
            text_content: None,
            children: Vec::new(),
        }
    }

    pub fn with_text(mut self, text_content: TextModel) -> Self {
        self.text_content = Some(text_content);
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_children(mut self, children: Vec<NewBlock>) -> Self {
        self.children = children;
        self
    }
}

pub enum Op {
    InsertChildrenAt {
        parent: Option<NodeId>,
        index: usize,
        nodes: Vec<NewBlock>,
    },
    InsertChildrenAfter {
        parent: Option<NodeId>,
        prev_sibling: Option<NodeId>,
        nodes: Vec<NewBlock>,
    },
    RemoveChild {
        parent: Option<NodeId>,
        node: NodeId,
    },
    RemoveNode {
        node: NodeId,
    },
    /// Replaces the Text Model at `attr_name` by composing it with the
    /// edit `fn` produces from the current model (§4.2: `textEdit`).
    TextEdit {
        node: NodeId,
        attr_name: String,
        edit: Box<dyn FnOnce(&doc_model::TextModel) -> Delta>,
    },
    UpdateAttributes {
        node: NodeId,
        attrs: Attributes,
    },
    SetCursorState {
        cursor: CursorState,
    },
}

impl std::fmt::Debug for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Op::InsertChildrenAt { parent, index, nodes } => f
                .debug_struct("InsertChildrenAt")
                .field("parent", parent)
                .field("index", index)
                .field("count", &nodes.len())
                .finish(),
            Op::InsertChildrenAfter { parent, prev_sibling, nodes } => f
                .debug_struct("InsertChildrenAfter")
                .field("parent", parent)
                .field("prev_sibling", prev_sibling)
                .field("count", &nodes.len())
                .finish(),
            Op::RemoveChild { parent, node } => f.debug_struct("RemoveChild").field("parent", parent).field("node", node).finish(),
            Op::RemoveNode { node } => f.debug_struct("RemoveNode").field("node", node).finish(),
            Op::TextEdit { node, attr_name, .. } => f.debug_struct("TextEdit").field("node", node).field("attr_name", attr_name).finish(),
            Op::UpdateAttributes { node, attrs } => f.debug_struct("UpdateAttributes").field("node", node).field("attrs", &attrs.len()).finish(),
            Op::SetCursorState { cursor } => f.debug_struct("SetCursorState").field("cursor", cursor).finish(),
        }
    }
}
