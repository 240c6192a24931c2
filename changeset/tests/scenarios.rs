// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Model-level slices of the §8 end-to-end scenarios that don't need a
//! DOM (the full paste/keydown scenarios are exercised in `editor`'s
//! integration tests, against real DOM nodes).

use changeset::{ApplyOptions, Changeset, NewBlock, State};
use doc_model::{BlockyDocument, CursorState, TextModel};

#[test]
fn scenario_1_insert_heading_after_title() {
    let mut state = State::new(BlockyDocument::new(), 0);
    let heading = NewBlock::new("Heading1").with_text(TextModel::new());

    let after = Changeset::new()
        .insert_children_at(None, 0, vec![heading])
        .apply(&mut state, ApplyOptions::default())
        .unwrap();

    let body = state.document().body();
    assert_eq!(body.len(), 1);
    assert_eq!(state.document().block(body[0]).unwrap().block_type, "Heading1");
    assert!(after.is_none());

    let id = body[0];
    Changeset::new()
        .set_cursor_state(CursorState::collapsed(id, 0))
        .apply(&mut state, ApplyOptions::default())
        .unwrap();
    assert_eq!(state.cursor(), Some(CursorState::collapsed(id, 0)));
}

#[test]
fn scenario_2_typing_into_an_empty_block() {
    let mut state = State::new(BlockyDocument::new(), 0);
    let block = NewBlock::new("paragraph").with_text(TextModel::new());
    Changeset::new().insert_children_at(None, 0, vec![block]).apply(&mut state, ApplyOptions::default()).unwrap();
    let id = state.document().body()[0];
    Changeset::new().set_cursor_state(CursorState::collapsed(id, 0)).apply(&mut state, ApplyOptions::default()).unwrap();

    let after = Changeset::new()
        .text_edit(id, "textContent", |_model| {
            let mut d = delta::delta::Delta::default();
            d.insert("Hi");
            d
        })
        .set_cursor_state(CursorState::collapsed(id, 2))
        .apply(&mut state, ApplyOptions::default())
        .unwrap();

    let text = state.document().block(id).unwrap().text_content().unwrap();
    assert_eq!(text.plain_text(), "Hi");
    assert_eq!(after, Some(CursorState::collapsed(id, 2)));
}

#[test]
fn version_increments_once_per_apply() {
    let mut state = State::new(BlockyDocument::new(), 0);
    assert_eq!(state.version(), 0);
    Changeset::new().apply(&mut state, ApplyOptions::default()).unwrap();
    assert_eq!(state.version(), 1);
    Changeset::new().apply(&mut state, ApplyOptions::default()).unwrap();
    assert_eq!(state.version(), 2);
}
