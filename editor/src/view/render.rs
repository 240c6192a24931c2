// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The DOM projector (§4.4 "Rendering model"): walks the document tree
//! and produces a DOM subtree, back-referencing each node's element via
//! `domMap`. Grounded on `op_transform::doc_root::DocumentRoot::open`
//! (build one block, append it, mount it), generalized from "always
//! exactly one empty paragraph" to "every block currently in `body()`".

use doc_model::NodeId;
use dom::dom_element::DomElement;

use super::{Editor, Mounted};
use crate::error::Error;

const PARAGRAPH_TAG: &str = "P";
const TITLE_TAG: &str = "H1";

/// Clears and fully re-renders the editable region from the model. Used
/// on `open()` and as the §7 `InvariantViolation` recovery path ("the
/// editor refreshes by re-rendering from the model").
pub fn render_full(editor: &mut Editor) -> Result<(), Error> {
    for (_, mounted) in editor.dom_map_mut().drain() {
        editor.root_element().remove_child(mounted.element.node());
    }

    let title_id = editor.controller.state().document().title_id();
    mount_block(editor, title_id, TITLE_TAG, None)?;

    let body: Vec<NodeId> = editor.controller.state().document().body().to_vec();
    for id in body {
        mount_block(editor, id, PARAGRAPH_TAG, None)?;
    }
    Ok(())
}

/// Mounts one block's DOM element at `before` (end of the root if
/// `None`), creates its `Block` runtime instance, and records it in the
/// `domMap`.
pub fn mount_block(editor: &mut Editor, id: NodeId, tag: &str, before: Option<&DomElement>) -> Result<(), Error> {
    let block = editor.controller.state().get_block_element_by_id(id).ok_or(Error::InvariantViolation { id })?;
    let element = DomElement::new(tag);
    element.set_attribute("data-type", &block.block_type);
    element.set_attribute("data-id", &id.to_string());
    if let Ok(text) = block.text_content() {
        element.node().set_text_content(Some(&text.plain_text()));
    }
    set_data_content(editor, &element, id);

    match before {
        Some(sibling) => editor.root_element().insert_child_before(element.node(), sibling.node()),
        None => editor.root_element().append_child(element.node()),
    }

    let mut runtime = editor.view_registry.create_block(&block.block_type, id);
    runtime.block_did_mount(&element);
    editor.dom_map_mut().insert(id, Mounted { element, block: runtime });
    Ok(())
}

/// `data-content` carries the node's wire JSON so a native browser copy of
/// this element, pasted back into a block-editor instance, round-trips
/// through `serialize::new_block_from_json` instead of degrading to plain
/// text (§4.4 Paste, §8 scenario 6).
fn set_data_content(editor: &Editor, element: &DomElement, id: NodeId) {
    if let Ok(json) = editor.controller.state().document().to_json(id) {
        if let Ok(text) = serde_json::to_string(&json) {
            element.set_attribute("data-content", &text);
        }
    }
}

pub fn unmount_block(editor: &mut Editor, id: NodeId) {
    if let Some(mut mounted) = editor.dom_map_mut().remove(&id) {
        mounted.block.block_will_unmount();
        editor.root_element().remove_child(mounted.element.node());
    }
}

/// Re-renders a single block's text from the model — the `forceUpdate`
/// path and the post-apply reconciliation step (§4.2 step 4, §5
/// ordering: "DOM reconciliation" after `changesetApplied`).
pub fn sync_block_text(editor: &mut Editor, id: NodeId) -> Result<(), Error> {
    let text = editor
        .controller
        .state()
        .get_block_element_by_id(id)
        .and_then(|b| b.text_content().ok())
        .map(|t| t.plain_text());
    if let (Some(text), Some(mounted)) = (text, editor.dom_map().get(&id)) {
        mounted.element.node().set_text_content(Some(&text));
        set_data_content(editor, &mounted.element, id);
    }
    Ok(())
}

/// Reconciles the whole `domMap` against the current body order and
/// content — called after a structural Changeset. Grounded on
/// `node_tree::dom_doc_tree_morph`'s insert/unlink primitives,
/// generalized to a whole-list diff since this core rebuilds via arena
/// snapshot rather than patching DOM pointers node-by-node.
pub fn reconcile(editor: &mut Editor) -> Result<(), Error> {
    let body: Vec<NodeId> = editor.controller.state().document().body().to_vec();
    let title_id = editor.controller.state().document().title_id();

    let mounted_ids: std::collections::HashSet<NodeId> = editor.dom_map().keys().copied().filter(|&id| id != title_id).collect();
    let body_set: std::collections::HashSet<NodeId> = body.iter().copied().collect();

    for id in mounted_ids.difference(&body_set).copied().collect::<Vec<_>>() {
        unmount_block(editor, id);
    }

    for id in &body {
        if !editor.dom_map().contains_key(id) {
            mount_block(editor, *id, PARAGRAPH_TAG, None)?;
        } else {
            sync_block_text(editor, *id)?;
        }
    }
    sync_block_text(editor, title_id)?;

    reorder_dom(editor, &body)
}

fn reorder_dom(editor: &mut Editor, body: &[NodeId]) -> Result<(), Error> {
    for id in body {
        let mounted = editor.dom_map().get(id).ok_or(Error::InvariantViolation { id: *id })?;
        editor.root_element().append_child(mounted.element.node());
    }
    Ok(())
}
