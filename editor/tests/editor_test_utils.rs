// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Shared fixtures for the end-to-end scenario tests (§8 Testable
//! Properties). Mirrors `op_transform_test_utils.rs`'s role in the
//! teacher's own test suite: one small helper module, `#[path]`-included
//! by each scenario test file rather than published as a crate.

#![allow(dead_code)]

use changeset::{ApplyOptions, Changeset, CursorChangeReason};
use delta::delta::Delta;
use doc_model::{CursorState, NodeId};
use editor::{Controller, ControllerOptions, Editor};

/// A freshly opened editor with its one starter paragraph block, mounted
/// into an off-document DOM subtree (§4.5: `Controller::new` always
/// leaves the body non-empty).
pub fn setup_editor() -> (Editor, NodeId) {
    let controller = Controller::new(ControllerOptions::default()).expect("controller construction");
    let mut editor = Editor::new(controller);
    editor.open().expect("editor open");
    let id = editor.controller.state().document().body()[0];
    (editor, id)
}

/// Replaces a text-like block's content wholesale. The block starts
/// empty, so a bare `insert` composes onto it with no `retain`/`delete`
/// needed.
pub fn set_text(editor: &mut Editor, id: NodeId, text: &str) {
    let owned = text.to_string();
    let cs = Changeset::new().text_edit(id, "textContent", move |_model| {
        let mut delta = Delta::default();
        delta.insert(owned.clone());
        delta
    });
    cs.apply(editor.controller.state_mut(), ApplyOptions::default()).expect("set_text");
}

pub fn set_cursor(editor: &mut Editor, id: NodeId, offset: usize) {
    editor.controller.set_cursor_state(CursorState::collapsed(id, offset), CursorChangeReason::Changeset);
}

pub fn plain_text_of(editor: &Editor, id: NodeId) -> String {
    editor.controller.state().get_block_element_by_id(id).and_then(|b| b.text_content().ok()).map(|t| t.plain_text()).unwrap_or_default()
}
