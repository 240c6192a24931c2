// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Selection ↔ model mapping (§4.4 "Selection → model" / "Model →
//! selection"). Grounded on `node_tree::cursor::Cursor::set_cursor_to_doc_node_edge`
//! (walk up from a DOM position to the enclosing block), generalized
//! from DOM-node identity to `NodeId` lookups via `domMap`.

use changeset::CursorChangeReason;
use doc_model::{CursorState, NodeId};
use web_sys::{Node, Selection};

use super::Editor;
use crate::error::Error;

/// `selectionchange` handler (§4.4 step 1-4): reads the live browser
/// selection and pushes a `CursorState` into the controller tagged
/// `BrowserSelection`.
pub fn handle_selection_change(editor: &mut Editor, selection: &Selection) -> Result<(), Error> {
    if selection.range_count() == 0 {
        return Ok(());
    }
    let range = match selection.get_range_at(0) {
        Ok(r) => r,
        Err(_) => return Ok(()),
    };

    let start_leaf = range.start_container().map_err(|_| Error::NotOpenForEdit)?;
    let end_leaf = range.end_container().map_err(|_| Error::NotOpenForEdit)?;

    let (start_id, _) = match enclosing_block(editor, &start_leaf) {
        Some(v) => v,
        None => return Ok(()),
    };
    let (end_id, _) = match enclosing_block(editor, &end_leaf) {
        Some(v) => v,
        None => return Ok(()),
    };

    let start_offset = offset_in_block(editor, start_id, &start_leaf, range.start_offset().unwrap_or(0) as usize);
    let end_offset = offset_in_block(editor, end_id, &end_leaf, range.end_offset().unwrap_or(0) as usize);

    let cursor = if range.collapsed() {
        CursorState::collapsed(start_id, start_offset)
    } else {
        CursorState::open(start_id, start_offset, end_id, end_offset)
    };
    editor.controller.set_cursor_state(cursor, CursorChangeReason::BrowserSelection);
    Ok(())
}

/// Walks up from `node` to find the enclosing mounted block, per §4.4
/// step 2 ("if none, attempt to select the parent block; otherwise clear
/// cursor").
fn enclosing_block(editor: &Editor, node: &Node) -> Option<(NodeId, Node)> {
    let mut current = Some(node.clone());
    while let Some(n) = current {
        for (&id, mounted) in editor.dom_map() {
            if mounted.element.node() == &n {
                return Some((id, n));
            }
        }
        current = n.parent_node();
    }
    None
}

fn offset_in_block(editor: &Editor, id: NodeId, focused: &Node, offset_in_node: usize) -> usize {
    match editor.dom_map().get(&id) {
        Some(mounted) => mounted.block.find_text_offset_in_block(&mounted.element, focused, offset_in_node),
        None => 0,
    }
}

/// `cursorStateChanged` subscriber (§4.4 "Model → selection"): places the
/// browser `Range` for the new cursor, when its block(s) are known in
/// `domMap`. A no-op (render retries next frame) if the id is unknown.
pub fn apply_cursor_to_selection(editor: &Editor, cursor: &CursorState, selection: &Selection) -> Result<(), Error> {
    match cursor {
        CursorState::Collapsed { id, .. } => focus_block(editor, *id, cursor, selection),
        CursorState::Open { start_id, end_id, .. } => {
            focus_block(editor, *start_id, cursor, selection)?;
            if start_id != end_id {
                focus_block(editor, *end_id, cursor, selection)?;
            }
            Ok(())
        }
    }
}

fn focus_block(editor: &Editor, id: NodeId, cursor: &CursorState, selection: &Selection) -> Result<(), Error> {
    match editor.dom_map().get(&id) {
        Some(mounted) => mounted.block.block_focused(&mounted.element, cursor, selection),
        None => Ok(()),
    }
}
