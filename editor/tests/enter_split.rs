// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! §8 Testable Properties, end-to-end scenario 3: "Enter splits."

#[path = "editor_test_utils.rs"]
mod editor_test_utils;

use doc_model::CursorState;
use editor::view::keydown::{handle_keydown, Key};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn enter_splits_block_at_cursor_offset() {
    let (mut editor, b1) = editor_test_utils::setup_editor();
    editor_test_utils::set_text(&mut editor, b1, "hello world");
    editor_test_utils::set_cursor(&mut editor, b1, 5);

    let handled = handle_keydown(&mut editor, Key::Enter).expect("enter handled");
    assert!(handled);

    let body = editor.controller.state().document().body().to_vec();
    assert_eq!(body.len(), 2);
    let [b1_after, b2] = [body[0], body[1]];
    assert_eq!(b1_after, b1);

    assert_eq!(editor_test_utils::plain_text_of(&editor, b1_after), "hello");
    assert_eq!(editor_test_utils::plain_text_of(&editor, b2), " world");

    assert_eq!(editor.controller.state().cursor(), Some(CursorState::collapsed(b2, 0)));
}

#[wasm_bindgen_test]
fn enter_at_offset_zero_leaves_original_block_empty() {
    let (mut editor, b1) = editor_test_utils::setup_editor();
    editor_test_utils::set_text(&mut editor, b1, "hello");
    editor_test_utils::set_cursor(&mut editor, b1, 0);

    handle_keydown(&mut editor, Key::Enter).expect("enter handled");

    let body = editor.controller.state().document().body().to_vec();
    assert_eq!(body.len(), 2);
    assert_eq!(editor_test_utils::plain_text_of(&editor, body[0]), "");
    assert_eq!(editor_test_utils::plain_text_of(&editor, body[1]), "hello");
    assert_eq!(editor.controller.state().cursor(), Some(CursorState::collapsed(body[1], 0)));
}
