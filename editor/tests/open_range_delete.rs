// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! §8 Testable Properties, end-to-end scenario 4: "Open-range delete."

#[path = "editor_test_utils.rs"]
mod editor_test_utils;

use changeset::{ApplyOptions, Changeset, CursorChangeReason};
use doc_model::CursorState;
use editor::view::keydown::{handle_keydown, Key};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn backspace_over_open_range_merges_boundary_blocks() {
    let (mut editor, b1) = editor_test_utils::setup_editor();
    editor_test_utils::set_text(&mut editor, b1, "foo");

    let new_block = changeset::NewBlock::new(blocks_text::format_const::NAME_PARAGRAPH).with_text(doc_model::TextModel::from_str("bar"));
    let new_block2 = changeset::NewBlock::new(blocks_text::format_const::NAME_PARAGRAPH).with_text(doc_model::TextModel::from_str("baz"));
    let cs = Changeset::new().insert_children_after(None, Some(b1), vec![new_block, new_block2]);
    cs.apply(editor.controller.state_mut(), ApplyOptions::default()).expect("seed blocks");

    let body = editor.controller.state().document().body().to_vec();
    assert_eq!(body.len(), 3);
    let (b2, b3) = (body[1], body[2]);

    editor.controller.set_cursor_state(
        CursorState::Open {
            start_id: b1,
            start_offset: 1,
            end_id: b3,
            end_offset: 2,
        },
        CursorChangeReason::Changeset,
    );

    handle_keydown(&mut editor, Key::Backspace).expect("backspace handled");

    let body_after = editor.controller.state().document().body().to_vec();
    assert_eq!(body_after, vec![b1]);
    assert_eq!(editor_test_utils::plain_text_of(&editor, b1), "fz");
    assert_eq!(editor.controller.state().cursor(), Some(CursorState::collapsed(b1, 1)));
}
