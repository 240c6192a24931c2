// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Keystroke routing (§4.4 "Keystrokes"): `Tab` swallow, `Enter` split,
//! `Backspace`/`Delete` merge, and the open-range delete routine. These
//! are literal algorithms from the spec, not something the teacher's
//! DOM-coupled `core_formats::util::node_morph` (`split_text_at_cursor`,
//! `try_3_way_merge_text`) implements directly — but that module is the
//! structural precedent: split a text node in two, merge two text nodes
//! into one, generalized here from DOM text nodes to `TextModel::slice`/
//! `concat` over block ids.

use changeset::{ApplyOptions, Changeset, Error as ChangesetError, NewBlock, State};
use doc_model::{CursorState, NodeId};

use super::{render, Editor};
use crate::error::Error;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Key {
    Tab,
    Enter,
    Backspace,
    Delete,
    Other,
}

/// `keydown` dispatcher. Returns `true` if the default browser action
/// should be suppressed (the editor has handled it).
pub fn handle_keydown(editor: &mut Editor, key: Key) -> Result<bool, Error> {
    match key {
        Key::Tab => Ok(true), // swallowed, reserved for future indent (§4.4)
        Key::Enter => {
            handle_enter(editor)?;
            Ok(true)
        }
        Key::Backspace => {
            handle_backspace(editor)?;
            Ok(true)
        }
        Key::Delete => {
            handle_delete(editor)?;
            Ok(true)
        }
        Key::Other => Ok(false), // arrow keys etc: selection listener handles the cursor
    }
}

fn handle_enter(editor: &mut Editor) -> Result<(), Error> {
    let cursor = match editor.controller.state().cursor() {
        Some(c) => c,
        None => return Ok(()),
    };

    if !cursor.is_collapsed() {
        let cs = build_open_range_delete(editor.controller.state(), &cursor)?;
        cs.apply(editor.controller.state_mut(), ApplyOptions { refresh_cursor: true, force_update: false })?;
        render::reconcile(editor)?;
        return handle_enter(editor); // re-enter now that the selection is collapsed
    }

    let CursorState::Collapsed { id, offset } = cursor else { unreachable!() };
    let block = editor.controller.state().get_block_element_by_id(id).ok_or(Error::InvariantViolation { id })?;
    if !block.is_text_like() {
        return Ok(());
    }

    let text = block.text_content()?.clone();
    let head = text.slice(0, Some(offset));
    let tail = text.slice(offset, None);
    let new_type = if editor.preserve_type_on_split.contains(block.block_type.as_str()) {
        block.block_type.clone()
    } else {
        blocks_text::format_const::NAME_PARAGRAPH.to_string()
    };

    let new_block = NewBlock::new(new_type).with_text(tail);
    let head_len = head.len();
    let cs = Changeset::new()
        .text_edit(id, "textContent", move |model| {
            let mut edit = delta::delta::Delta::default();
            edit.retain(head_len);
            edit.delete(model.len() - head_len);
            edit
        })
        .insert_children_after(None, Some(id), vec![new_block]);
    cs.apply(editor.controller.state_mut(), ApplyOptions::default())?;

    let new_id = *editor
        .controller
        .state()
        .document()
        .body()
        .iter()
        .skip_while(|&&b| b != id)
        .nth(1)
        .ok_or(Error::InvariantViolation { id })?;
    let cs2 = Changeset::new().set_cursor_state(CursorState::collapsed(new_id, 0));
    cs2.apply(editor.controller.state_mut(), ApplyOptions::default())?;
    render::reconcile(editor)
}

fn handle_backspace(editor: &mut Editor) -> Result<(), Error> {
    let cursor = match editor.controller.state().cursor() {
        Some(c) => c,
        None => return Ok(()),
    };
    if !cursor.is_collapsed() {
        return delete_open_range(editor, &cursor);
    }
    let CursorState::Collapsed { id, offset } = cursor else { unreachable!() };
    if offset > 0 {
        return Ok(()); // default browser backspace-within-text is fine; input diffing reconciles it
    }
    merge_with_previous(editor, id)
}

fn handle_delete(editor: &mut Editor) -> Result<(), Error> {
    let cursor = match editor.controller.state().cursor() {
        Some(c) => c,
        None => return Ok(()),
    };
    if !cursor.is_collapsed() {
        return delete_open_range(editor, &cursor);
    }
    let CursorState::Collapsed { id, offset } = cursor else { unreachable!() };
    let len = editor.controller.state().get_block_element_by_id(id).and_then(|b| b.text_content().ok()).map(|t| t.len()).unwrap_or(0);
    if offset < len {
        return Ok(());
    }
    merge_with_next(editor, id)
}

/// Backspace at offset 0 of a non-first text block (§4.4): concatenate
/// with the previous block, cursor collapses at the previous block's old
/// length. A non-editable previous block is removed whole instead.
fn merge_with_previous(editor: &mut Editor, id: NodeId) -> Result<(), Error> {
    let body = editor.controller.state().document().body().to_vec();
    let Some(pos) = body.iter().position(|&b| b == id) else { return Ok(()) };
    if pos == 0 {
        return Ok(()); // no-op: first body block (§8 Boundary behaviors)
    }
    let prev_id = body[pos - 1];
    let prev = editor.controller.state().get_block_element_by_id(prev_id).ok_or(Error::InvariantViolation { id: prev_id })?;

    if !prev.is_text_like() {
        let cs = Changeset::new().remove_node(prev_id).set_cursor_state(CursorState::collapsed(id, 0));
        cs.apply(editor.controller.state_mut(), ApplyOptions::default())?;
        return render::reconcile(editor);
    }

    let prev_len = prev.text_content()?.len();
    let cur_text = editor.controller.state().get_block_element_by_id(id).ok_or(Error::InvariantViolation { id })?.text_content()?.clone();

    let cs = Changeset::new()
        .text_edit(prev_id, "textContent", move |model| {
            let mut edit = delta::delta::Delta::default();
            edit.retain(model.len());
            for op in cur_text.as_delta().get_ops_ref() {
                edit.push(op.clone());
            }
            edit
        })
        .remove_node(id)
        .set_cursor_state(CursorState::collapsed(prev_id, prev_len));
    cs.apply(editor.controller.state_mut(), ApplyOptions { refresh_cursor: true, force_update: false })?;
    render::reconcile(editor)
}

/// `Delete` is symmetric at end-of-block (§4.4).
fn merge_with_next(editor: &mut Editor, id: NodeId) -> Result<(), Error> {
    let body = editor.controller.state().document().body().to_vec();
    let Some(pos) = body.iter().position(|&b| b == id) else { return Ok(()) };
    let Some(&next_id) = body.get(pos + 1) else { return Ok(()) }; // last block: no-op
    let next = editor.controller.state().get_block_element_by_id(next_id).ok_or(Error::InvariantViolation { id: next_id })?;

    if !next.is_text_like() {
        let cs = Changeset::new().remove_node(next_id);
        cs.apply(editor.controller.state_mut(), ApplyOptions { refresh_cursor: true, force_update: false })?;
        return render::reconcile(editor);
    }

    let cur_len = editor.controller.state().get_block_element_by_id(id).ok_or(Error::InvariantViolation { id })?.text_content()?.len();
    let next_text = next.text_content()?.clone();

    let cs = Changeset::new()
        .text_edit(id, "textContent", move |model| {
            let mut edit = delta::delta::Delta::default();
            edit.retain(model.len());
            for op in next_text.as_delta().get_ops_ref() {
                edit.push(op.clone());
            }
            edit
        })
        .remove_node(next_id)
        .set_cursor_state(CursorState::collapsed(id, cur_len));
    cs.apply(editor.controller.state_mut(), ApplyOptions { refresh_cursor: true, force_update: false })?;
    render::reconcile(editor)
}

fn delete_open_range(editor: &mut Editor, cursor: &CursorState) -> Result<(), Error> {
    let cs = build_open_range_delete(editor.controller.state(), cursor)?;
    cs.apply(editor.controller.state_mut(), ApplyOptions { refresh_cursor: true, force_update: false })?;
    render::reconcile(editor)
}

/// §4.4 "Open-range delete": walk block elements in document order from
/// `startId` to `endId` inclusive. Every block strictly between is
/// removed. Each boundary block is then handled independently: a
/// text-like start keeps `[0, startOffset)`, a text-like end keeps
/// `[endOffset, len)`, and a non-text boundary block is removed whole —
/// one endpoint's text-like-ness never depends on the other's. The two
/// surviving slices (if both text-like) are merged onto the start
/// block's id; if only one end is text-like, its slice survives alone.
/// Final cursor per the spec's rule.
pub fn build_open_range_delete(state: &State, cursor: &CursorState) -> Result<Changeset, ChangesetError> {
    let CursorState::Open { start_id, start_offset, end_id, end_offset } = normalize(state, cursor) else {
        return Ok(Changeset::new());
    };

    let body = state.document().body().to_vec();
    let start_pos = body.iter().position(|&b| b == start_id);
    let end_pos = body.iter().position(|&b| b == end_id);

    let start_block = state.get_block_element_by_id(start_id);
    let end_block = state.get_block_element_by_id(end_id);

    let mut cs = Changeset::new();

    match (start_pos, end_pos, start_block, end_block) {
        (Some(sp), Some(ep), Some(sb), Some(eb)) => {
            for &mid in body.iter().take(ep).skip(sp + 1) {
                cs = cs.remove_node(mid);
            }

            if start_id == end_id {
                if sb.is_text_like() {
                    let current = sb.text_content()?.clone();
                    let head = current.slice(0, Some(start_offset));
                    let tail = current.slice(end_offset, None);
                    let merged = head.concat(&tail);
                    cs = cs.text_edit(start_id, "textContent", move |model| replace_all_edit(model.len(), &merged));
                    cs = cs.set_cursor_state(CursorState::collapsed(start_id, start_offset));
                } else {
                    cs = cs.remove_node(start_id);
                }
                return Ok(cs);
            }

            // Each boundary block is handled independently (§4.4): a
            // text-like endpoint keeps its surviving slice, a non-text
            // endpoint is removed whole, regardless of the other end.
            match (sb.is_text_like(), eb.is_text_like()) {
                (true, true) => {
                    let head = sb.text_content()?.slice(0, Some(start_offset));
                    let end_tail = eb.text_content()?.slice(end_offset, None);
                    let merged = head.concat(&end_tail);
                    cs = cs.text_edit(start_id, "textContent", move |model| replace_all_edit(model.len(), &merged)).remove_node(end_id);
                    cs = cs.set_cursor_state(CursorState::collapsed(start_id, start_offset));
                }
                (true, false) => {
                    let head = sb.text_content()?.slice(0, Some(start_offset));
                    cs = cs.text_edit(start_id, "textContent", move |model| replace_all_edit(model.len(), &head)).remove_node(end_id);
                    cs = cs.set_cursor_state(CursorState::collapsed(start_id, start_offset));
                }
                (false, true) => {
                    let tail = eb.text_content()?.slice(end_offset, None);
                    cs = cs.remove_node(start_id).text_edit(end_id, "textContent", move |model| replace_all_edit(model.len(), &tail));
                    cs = cs.set_cursor_state(CursorState::collapsed(end_id, 0));
                }
                (false, false) => {
                    cs = cs.remove_node(start_id).remove_node(end_id);
                }
            }
        }
        _ => {
            // Non-text boundary blocks are removed whole (§4.4).
            for &mid in body.iter().take(end_pos.map(|e| e + 1).unwrap_or(body.len())).skip(start_pos.unwrap_or(0)) {
                cs = cs.remove_node(mid);
            }
        }
    }
    Ok(cs)
}

/// `current_len` consumed via `delete`, then `merged`'s insert ops
/// appended — satisfies the `TextModel::compose` contract that an edit's
/// retain+delete length equal the model it is composed onto. Shared with
/// `Controller::paste_elements_at_cursor`, which replaces a block's whole
/// text the same way when merging a pasted run into it.
pub(crate) fn replace_all_edit(current_len: usize, merged: &doc_model::TextModel) -> delta::delta::Delta {
    let mut edit = delta::delta::Delta::default();
    if current_len > 0 {
        edit.delete(current_len);
    }
    for op in merged.as_delta().get_ops_ref() {
        edit.push(op.clone());
    }
    edit
}

fn normalize(state: &State, cursor: &CursorState) -> CursorState {
    match *cursor {
        CursorState::Collapsed { id, offset } => CursorState::Collapsed { id, offset },
        CursorState::Open { start_id, start_offset, end_id, end_offset } => {
            let body = state.document().body();
            let sp = body.iter().position(|&b| b == start_id);
            let ep = body.iter().position(|&b| b == end_id);
            match (sp, ep) {
                (Some(sp), Some(ep)) if sp > ep => CursorState::Open {
                    start_id: end_id,
                    start_offset: end_offset,
                    end_id: start_id,
                    end_offset: start_offset,
                },
                _ => CursorState::Open { start_id, start_offset, end_id, end_offset },
            }
        }
    }
}
