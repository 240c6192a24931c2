// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! §8 Testable Properties, end-to-end scenario 6: "Paste from self." Also
//! covers the "Round-trips" property: a paste-from-self copy yields a
//! document whose body equals the original, modulo freshly minted ids.

#[path = "editor_test_utils.rs"]
mod editor_test_utils;

use changeset::NewBlock;
use doc_model::{CursorState, TextModel};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

/// §4.4 Paste: the first pasted element merges into the current block
/// when both are text-like. A single-element self-paste at the end of
/// the current text has no second element left over to mint a fresh id
/// for, so this pastes two self-copies: the first merges into `b1`, the
/// second survives as its own sibling and must still get a fresh id.
#[wasm_bindgen_test]
fn pasted_self_content_merges_first_element_and_clones_the_rest_with_a_fresh_id() {
    let (mut editor, b1) = editor_test_utils::setup_editor();
    editor_test_utils::set_text(&mut editor, b1, "hello");

    let json = editor.controller.state().document().to_json(b1).expect("serialize b1");
    let raw = serde_json::to_string(&json).unwrap();

    let first = editor::serialize::parse(&raw).expect("parse self-paste payload");
    let second = editor::serialize::parse(&raw).expect("parse self-paste payload");
    assert_eq!(first.block_type, blocks_text::format_const::NAME_PARAGRAPH);
    assert_eq!(first.text_content.as_ref().unwrap().plain_text(), "hello");

    editor_test_utils::set_cursor(&mut editor, b1, 5);
    editor.controller.paste_elements_at_cursor(vec![first, second]).expect("paste");

    let body = editor.controller.state().document().body().to_vec();
    assert_eq!(body.len(), 2, "the first pasted element merges into b1 instead of becoming a sibling");
    assert_eq!(body[0], b1);
    assert_eq!(editor_test_utils::plain_text_of(&editor, b1), "hellohello");

    let pasted_id = body[1];
    assert_ne!(pasted_id, b1, "a self-pasted node must get a fresh id, not the original's");
    assert_eq!(editor_test_utils::plain_text_of(&editor, pasted_id), "hello");
    assert_eq!(editor.controller.state().cursor(), Some(CursorState::collapsed(b1, 10)));
}

/// §4.4 Paste: pasting a text-like element at a non-zero, non-end cursor
/// offset merges `head + pasted text` into the current block and keeps
/// the tail as a new trailing block, with the cursor landing inside the
/// merged run rather than at a new block's start.
#[wasm_bindgen_test]
fn pasted_text_like_element_merges_at_a_mid_text_cursor_offset() {
    let (mut editor, b1) = editor_test_utils::setup_editor();
    editor_test_utils::set_text(&mut editor, b1, "hello world");
    editor_test_utils::set_cursor(&mut editor, b1, 5);

    let pasted = NewBlock::new(blocks_text::format_const::NAME_PARAGRAPH).with_text(TextModel::from_str("XX"));
    editor.controller.paste_elements_at_cursor(vec![pasted]).expect("paste");

    let body = editor.controller.state().document().body().to_vec();
    assert_eq!(body.len(), 2, "the tail survives as a new trailing block");
    assert_eq!(body[0], b1);
    assert_eq!(editor_test_utils::plain_text_of(&editor, b1), "helloXX");

    let tail_id = body[1];
    assert_eq!(editor_test_utils::plain_text_of(&editor, tail_id), " world");
    assert_eq!(editor.controller.state().cursor(), Some(CursorState::collapsed(b1, 7)));
}

#[wasm_bindgen_test]
fn pasted_self_content_with_unregistered_type_is_dropped() {
    let raw = r#"{"t":"not-a-real-block-type","attributes":{}}"#;
    let parsed = editor::serialize::parse(raw);
    // Parsing itself succeeds (it's well-formed JSON); the registration
    // check happens in the paste pipeline's div handler, not here.
    assert!(parsed.is_ok());
    assert_eq!(parsed.unwrap().block_type, "not-a-real-block-type");
}
