// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! `input` handling (§4.4 "Input diffing"): diffs the DOM against the
//! Text Model via `Delta::diff`, biased by the cursor offset, and
//! applies the result as a `textEdit`. Grounded on
//! `op_transform::doc_root::DocumentRoot::apply_delta` (apply ops against
//! the current cursor position), generalized from "apply an externally
//! supplied Delta" to "derive the Delta from what the DOM already says".

use changeset::{ApplyOptions, Changeset};
use doc_model::{CursorState, NodeId};

use super::{render, Editor};
use crate::error::Error;

/// `input` event handler: no-ops while composing (§4.4 Composition).
pub fn handle_input(editor: &mut Editor) -> Result<(), Error> {
    if editor.is_composing() {
        return Ok(());
    }

    match editor.controller.state().cursor() {
        Some(CursorState::Collapsed { id, offset }) => diff_one_block(editor, id, Some(offset)),
        _ => diff_all_mapped_blocks(editor),
    }
}

/// Collapsed-cursor fast path (§4.4: "locate the DOM of that block and
/// diff its current textContent against the Text Model").
fn diff_one_block(editor: &mut Editor, id: NodeId, cursor_offset: Option<usize>) -> Result<(), Error> {
    let dom_text = match editor.dom_map().get(&id) {
        Some(mounted) => mounted.element.node().text_content().unwrap_or_default(),
        None => return Ok(()),
    };
    let block = editor.controller.state().get_block_element_by_id(id).ok_or(Error::InvariantViolation { id })?;
    let current = block.text_content()?.clone();
    if current.plain_text() == dom_text {
        return Ok(());
    }

    let target = doc_model::TextModel::from_str(dom_text);
    let edit = current.diff(&target, cursor_offset);
    let new_len = target.len();

    let cs = Changeset::new()
        .text_edit(id, "textContent", move |_model| edit)
        .set_cursor_state(CursorState::collapsed(id, cursor_offset.unwrap_or(new_len).min(new_len)));
    cs.apply(editor.controller.state_mut(), ApplyOptions::default())?;
    render::sync_block_text(editor, id)?;
    Ok(())
}

/// Open-or-absent-cursor path (§4.4: "walk every known mapped DOM element
/// and diff each; apply all resulting edits atomically in one
/// Changeset"). Covers multi-range IME/browser-correction edits.
fn diff_all_mapped_blocks(editor: &mut Editor) -> Result<(), Error> {
    let ids: Vec<NodeId> = editor.dom_map().keys().copied().collect();
    let mut cs = Changeset::new();
    let mut any = false;

    for id in ids {
        let dom_text = match editor.dom_map().get(&id) {
            Some(mounted) => mounted.element.node().text_content().unwrap_or_default(),
            None => continue,
        };
        let block = match editor.controller.state().get_block_element_by_id(id) {
            Some(b) if b.is_text_like() => b,
            _ => continue,
        };
        let current = block.text_content().expect("checked is_text_like above").clone();
        if current.plain_text() == dom_text {
            continue;
        }
        any = true;
        let target = doc_model::TextModel::from_str(dom_text);
        cs = cs.text_edit(id, "textContent", move |_model| current.diff(&target, None));
    }

    if !any {
        return Ok(());
    }
    cs.apply(editor.controller.state_mut(), ApplyOptions { refresh_cursor: true, force_update: false })?;
    render::reconcile(editor)
}
