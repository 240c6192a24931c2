// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! §6 "Block runtime contract" and its optional paste extension. This is
//! the DOM-facing half of a block's behaviour; the arena-level half
//! (`name`/`editable`/`is_text_like`/`on_block_created`) lives in
//! `changeset::registry::BlockDefinition` so that crate never has to
//! depend on `web-sys`. Grounded on `node_tree::format_trait::FormatTait`,
//! generalized from "apply a format to a DOM subtree" to "mount/focus/
//! diff a block's DOM region".

use crate::error::Error;
use changeset::Changeset;
use doc_model::{CursorState, NodeId};
use dom::dom_element::DomElement;
use web_sys::{Node, Selection};

/// What a mounted block instance must implement. One instance lives per
/// mounted block element, created by a `BlockViewFactory` on render and
/// dropped on `blockWillUnmount`.
pub trait Block {
    /// DOM lifecycle: the element has just been inserted into the editable region.
    fn block_did_mount(&mut self, element: &DomElement);

    /// DOM lifecycle: the element is about to be removed.
    fn block_will_unmount(&mut self);

    /// Model → selection: place the browser `Range` for this block at `cursor`.
    fn block_focused(
        &self,
        element: &DomElement,
        cursor: &CursorState,
        selection: &Selection,
    ) -> Result<(), Error> {
        default_block_focused(element, cursor, selection)
    }

    /// Selection → model: emit the `textEdit` op(s) this block's DOM change implies.
    fn block_content_changed(
        &self,
        changeset: &mut Changeset,
        node: NodeId,
        offset: usize,
        element: &DomElement,
    ) -> Result<(), Error>;

    /// Selection → model offset mapping. Default: walk the block's own DOM,
    /// summing `textContent` lengths of preceding leaves (§4.4 step 3).
    fn find_text_offset_in_block(&self, element: &DomElement, focused: &Node, offset_in_node: usize) -> usize {
        default_find_text_offset_in_block(element, focused, offset_in_node)
    }

    /// Model → selection offset mapping for non-default blocks.
    fn get_cursor_dom_by_offset(&self, element: &DomElement, offset: usize) -> Option<(Node, usize)> {
        default_cursor_dom_by_offset(element, offset)
    }
}

/// Optional capability (§6 "Block definition contract"): a block type may
/// claim pasted markup instead of falling through to the default leaf/div
/// handlers (§4.4 Paste).
pub trait PasteCapable {
    /// Claimant probe: does this block type want to handle `element` itself?
    fn handle_paste_element(&self, element: &web_sys::Element) -> bool {
        let _ = element;
        false
    }

    /// Convert a claimed element into node content the paste pipeline can insert.
    fn on_paste(&self, element: &web_sys::Element) -> Option<doc_model::node::BlockDataElement> {
        let _ = element;
        None
    }
}

/// Walks `element`'s DOM subtree in document order, summing the
/// `textContent` length of every node preceding `focused`, then adds
/// `offset_in_node` if `focused` is itself a text node (non-text leaves
/// contribute 0, per §4.4 step 3).
pub fn default_find_text_offset_in_block(element: &DomElement, focused: &Node, offset_in_node: usize) -> usize {
    let mut total = 0usize;
    let mut found = false;
    walk_leaves(element.node(), &mut |n| {
        if found {
            return;
        }
        if n == focused {
            found = true;
            if n.node_type() == Node::TEXT_NODE {
                total += offset_in_node;
            }
        } else if n.node_type() == Node::TEXT_NODE {
            total += n.text_content().unwrap_or_default().chars().count();
        }
    });
    total
}

/// Inverse of the above: finds the DOM (node, offset) that corresponds to
/// a given character offset into the block's flattened text.
pub fn default_cursor_dom_by_offset(element: &DomElement, offset: usize) -> Option<(Node, usize)> {
    let mut remaining = offset;
    let mut result: Option<(Node, usize)> = None;
    walk_leaves(element.node(), &mut |n| {
        if result.is_some() {
            return;
        }
        if n.node_type() == Node::TEXT_NODE {
            let len = n.text_content().unwrap_or_default().chars().count();
            if remaining <= len {
                result = Some((n.clone(), remaining));
            } else {
                remaining -= len;
            }
        }
    });
    result
}

fn default_block_focused(element: &DomElement, cursor: &CursorState, selection: &Selection) -> Result<(), Error> {
    let offset = match cursor {
        CursorState::Collapsed { offset, .. } => *offset,
        CursorState::Open { start_offset, .. } => *start_offset,
    };
    if let Some((node, off)) = default_cursor_dom_by_offset(element, offset) {
        match web_sys::Range::new() {
            Ok(range) => {
                let _ = range.set_start(&node, off as u32);
                let _ = range.collapse_with_to_start(true);
                selection.remove_all_ranges().ok();
                selection.add_range(&range).ok();
            }
            Err(_) => log::error!("block_focused: could not construct a Range"),
        }
    }
    Ok(())
}

fn walk_leaves(node: &Node, f: &mut impl FnMut(&Node)) {
    let children = node.child_nodes();
    let len = children.length();
    if len == 0 {
        f(node);
        return;
    }
    for i in 0..len {
        if let Some(child) = children.item(i) {
            walk_leaves(&child, f);
        }
    }
}
