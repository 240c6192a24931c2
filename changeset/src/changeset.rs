// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! `Changeset` (§4.2): a transactional builder of `Op`s against a
//! specific `State`, applied atomically. Grounded on the shape of
//! `op_transform::doc_root::DocumentRoot::apply_delta` (dispatch each op
//! in sequence, update the cursor, bump version) generalized from "one
//! Delta's worth of DOM ops" to the full §4.2 op table.

use std::collections::HashSet;

use doc_model::node::Attributes;
use doc_model::{AttrValue, CursorState, NodeId};

use crate::error::Error;
use crate::op::{NewBlock, Op};
use crate::state::{ChangesetApplied, CursorChangeReason, State};

#[derive(Clone, Copy, Debug, Default)]
pub struct ApplyOptions {
    /// Re-normalize the current cursor (clamp offsets) even if this
    /// Changeset didn't explicitly set one (§4.2 step 4).
    pub refresh_cursor: bool,
    pub force_update: bool,
}

pub struct Changeset {
    ops: Vec<Op>,
    set_cursor: Option<CursorState>,
    force_update: bool,
}

impl Changeset {
    pub fn new() -> Self {
        Changeset { ops: Vec::new(), set_cursor: None, force_update: false }
    }

    pub fn insert_children_at(mut self, parent: Option<NodeId>, index: usize, nodes: Vec<NewBlock>) -> Self {
        self.ops.push(Op::InsertChildrenAt { parent, index, nodes });
        self
    }

    pub fn insert_children_after(mut self, parent: Option<NodeId>, prev_sibling: Option<NodeId>, nodes: Vec<NewBlock>) -> Self {
        self.ops.push(Op::InsertChildrenAfter { parent, prev_sibling, nodes });
        self
    }

    pub fn remove_child(mut self, parent: Option<NodeId>, node: NodeId) -> Self {
        self.ops.push(Op::RemoveChild { parent, node });
        self
    }

    pub fn remove_node(mut self, node: NodeId) -> Self {
        self.ops.push(Op::RemoveNode { node });
        self
    }

    pub fn text_edit(mut self, node: NodeId, attr_name: impl Into<String>, edit: impl FnOnce(&doc_model::TextModel) -> delta::delta::Delta + 'static) -> Self {
        self.ops.push(Op::TextEdit { node, attr_name: attr_name.into(), edit: Box::new(edit) });
        self
    }

    pub fn update_attributes(mut self, node: NodeId, attrs: Attributes) -> Self {
        self.ops.push(Op::UpdateAttributes { node, attrs });
        self
    }

    pub fn set_cursor_state(mut self, cursor: CursorState) -> Self {
        self.ops.push(Op::SetCursorState { cursor });
        self.set_cursor = Some(cursor);
        self
    }

    pub fn force_update(mut self) -> Self {
        self.force_update = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Applies every recorded op in order, then emits `changesetApplied`
    /// and bumps the version (§4.2 steps 1-7).
    pub fn apply(self, state: &mut State, opts: ApplyOptions) -> Result<Option<CursorState>, Error> {
        state.begin_apply()?;
        let result = self.apply_locked(state, opts);
        state.end_apply();
        result
    }

    fn apply_locked(self, state: &mut State, opts: ApplyOptions) -> Result<Option<CursorState>, Error> {
        let before_cursor = state.cursor();
        let mut removed: HashSet<NodeId> = HashSet::new();

        for op in self.ops {
            match op {
                Op::InsertChildrenAt { parent, index, nodes } => {
                    let ids: Vec<NodeId> = allocate_all(state, nodes);
                    state.document_mut().insert_children_at(parent, index, ids.clone())?;
                    emit_created_recursively(state, &ids);
                }
                Op::InsertChildrenAfter { parent, prev_sibling, nodes } => {
                    let index = match prev_sibling {
                        None => 0,
                        Some(sibling) => {
                            let siblings = sibling_list(state, parent)?;
                            siblings.iter().position(|&id| id == sibling).map(|i| i + 1).unwrap_or(siblings.len())
                        }
                    };
                    let ids: Vec<NodeId> = allocate_all(state, nodes);
                    state.document_mut().insert_children_at(parent, index, ids.clone())?;
                    emit_created_recursively(state, &ids);
                }
                Op::RemoveChild { parent, node } => {
                    state.block_will_delete.emit(crate::state::BlockWillDelete { id: node });
                    state.document_mut().remove_child(parent, node)?;
                    collect_subtree_ids(state, node, &mut removed);
                    state.document_mut().delete_subtree(node)?;
                }
                Op::RemoveNode { node } => {
                    state.block_will_delete.emit(crate::state::BlockWillDelete { id: node });
                    state.document_mut().remove_node(node)?;
                    collect_subtree_ids(state, node, &mut removed);
                    state.document_mut().delete_subtree(node)?;
                }
                Op::TextEdit { node, attr_name, edit } => {
                    apply_text_edit(state, node, &attr_name, edit)?;
                }
                Op::UpdateAttributes { node, attrs } => {
                    let block = state.document_mut().block_mut(node)?;
                    for (k, v) in attrs {
                        if matches!(v, AttrValue::Null) {
                            block.attributes.remove(&k);
                        } else {
                            block.attributes.insert(k, v);
                        }
                    }
                }
                Op::SetCursorState { .. } => {
                    // cursor is applied after the loop, see below.
                }
            }
        }

        let after_cursor = match self.set_cursor {
            Some(cursor) => {
                state.set_cursor_state(cursor, CursorChangeReason::Changeset);
                state.cursor()
            }
            None => {
                let mut current = before_cursor;
                if let Some(c) = current {
                    if cursor_touches_removed(&c, &removed) {
                        log::warn!("changeset removed the current cursor's block without setting a new cursor; clearing");
                        current = None;
                    }
                }
                if opts.refresh_cursor || self.force_update || opts.force_update {
                    if let Some(c) = current {
                        state.set_cursor_state(c, CursorChangeReason::Changeset);
                    } else {
                        state.clear_cursor();
                    }
                } else if current.is_none() && before_cursor.is_some() {
                    state.clear_cursor();
                }
                current
            }
        };

        let version = state.bump_version();
        state.changeset_applied.emit(ChangesetApplied { before_cursor, after_cursor, version });
        Ok(after_cursor)
    }
}

impl Default for Changeset {
    fn default() -> Self {
        Changeset::new()
    }
}

fn allocate_all(state: &mut State, nodes: Vec<NewBlock>) -> Vec<NodeId> {
    nodes.into_iter().map(|n| allocate_one(state, n)).collect()
}

fn allocate_one(state: &mut State, node: NewBlock) -> NodeId {
    let id = state.document_mut().allocate_block(node.block_type, node.attributes, node.text_content);
    let child_ids = allocate_all(state, node.children);
    if !child_ids.is_empty() {
        state.document_mut().block_mut(id).expect("just allocated").children = child_ids;
    }
    id
}

fn sibling_list(state: &State, parent: Option<NodeId>) -> Result<Vec<NodeId>, Error> {
    Ok(match parent {
        None => state.document().body().to_vec(),
        Some(id) => state.document().block(id)?.children.clone(),
    })
}

/// Emits `newBlockCreated` for `ids` and their descendants, in pre-order —
/// the Streams design note (§9) requires deterministic emission order.
fn emit_created_recursively(state: &mut State, ids: &[NodeId]) {
    let mut all = Vec::new();
    for &id in ids {
        subtree_ids_ordered(state, id, &mut all);
    }
    for id in all {
        state.new_block_created.emit(crate::state::NewBlockCreated { id });
    }
}

fn subtree_ids_ordered(state: &State, id: NodeId, out: &mut Vec<NodeId>) {
    out.push(id);
    if let Ok(block) = state.document().block(id) {
        for &child in &block.children {
            subtree_ids_ordered(state, child, out);
        }
    }
}

fn collect_subtree_ids(state: &State, id: NodeId, out: &mut HashSet<NodeId>) {
    out.insert(id);
    if let Ok(block) = state.document().block(id) {
        for &child in &block.children {
            collect_subtree_ids(state, child, out);
        }
    }
}

fn cursor_touches_removed(cursor: &CursorState, removed: &HashSet<NodeId>) -> bool {
    match cursor {
        CursorState::Collapsed { id, .. } => removed.contains(id),
        CursorState::Open { start_id, end_id, .. } => removed.contains(start_id) || removed.contains(end_id),
    }
}

fn apply_text_edit(
    state: &mut State,
    node: NodeId,
    attr_name: &str,
    edit: Box<dyn FnOnce(&doc_model::TextModel) -> delta::delta::Delta>,
) -> Result<(), Error> {
    let block = state.document_mut().block_mut(node)?;
    if attr_name == "textContent" {
        let current = block.text_content()?.clone();
        let delta = edit(&current);
        let updated = current.compose(&delta)?;
        block.text_content = Some(updated);
        Ok(())
    } else {
        let current = match block.attributes.get(attr_name) {
            Some(AttrValue::Text(t)) => t.clone(),
            _ => return Err(Error::Model(doc_model::Error::NotATextAttribute { id: node.to_string(), attr: attr_name.to_string() })),
        };
        let delta = edit(&current);
        let updated = current.compose(&delta)?;
        block.attributes.insert(attr_name.to_string(), AttrValue::Text(updated));
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use doc_model::{BlockyDocument, TextModel};

    fn paragraph(text: &str) -> NewBlock {
        NewBlock::new("paragraph").with_text(TextModel::from_str(text))
    }

    #[test]
    fn insert_then_text_edit_bumps_version_and_sets_cursor() {
        let mut state = State::new(BlockyDocument::new(), 0);
        let p = paragraph("");
        let cs = Changeset::new().insert_children_at(None, 0, vec![p]);
        let after = cs.apply(&mut state, ApplyOptions::default()).unwrap();
        assert_eq!(state.version(), 1);
        assert!(after.is_none());

        let id = state.document().body()[0];
        let cs2 = Changeset::new()
            .text_edit(id, "textContent", |_model| {
                let mut d = delta::delta::Delta::default();
                d.insert("Hi");
                d
            })
            .set_cursor_state(CursorState::collapsed(id, 2));
        let after2 = cs2.apply(&mut state, ApplyOptions::default()).unwrap();
        assert_eq!(state.version(), 2);
        assert_eq!(after2, Some(CursorState::collapsed(id, 2)));
        assert_eq!(state.document().block(id).unwrap().text_content().unwrap().plain_text(), "Hi");
    }

    #[test]
    fn removing_the_cursors_block_without_a_new_cursor_clears_it() {
        let mut state = State::new(BlockyDocument::new(), 0);
        let p = paragraph("bye");
        Changeset::new().insert_children_at(None, 0, vec![p]).apply(&mut state, ApplyOptions::default()).unwrap();
        let id = state.document().body()[0];
        state.set_cursor_state(CursorState::collapsed(id, 1), CursorChangeReason::UserInput);

        let cs = Changeset::new().remove_node(id);
        let after = cs.apply(&mut state, ApplyOptions::default()).unwrap();
        assert!(after.is_none());
    }
}
