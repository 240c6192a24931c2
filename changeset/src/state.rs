// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! `State` (§4.3): owns the document, version counter, cursor, and the
//! change-event streams. The "blockId → BlockDataElement index" spec.md
//! names is the arena itself (`BlockyDocument::arena`) — the arena
//! already guarantees the §3 invariant that every live id maps to
//! exactly one live node, so there is no separate index to keep in sync.

use delta::delta::Delta;
use doc_model::cursor::{split_cursor_state_by_blocks, BlockRange};
use doc_model::node::Attributes;
use doc_model::{BlockDataElement, BlockyDocument, CursorState, NodeId, TextModel};

use crate::error::Error;
use crate::stream::Stream;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorChangeReason {
    Changeset,
    UserInput,
    BrowserSelection,
    UiEvent,
}

pub struct NewBlockCreated {
    pub id: NodeId,
}

pub struct BlockWillDelete {
    pub id: NodeId,
}

pub struct CursorStateChanged {
    pub cursor: CursorState,
    pub reason: CursorChangeReason,
}

pub struct ChangesetApplied {
    pub before_cursor: Option<CursorState>,
    pub after_cursor: Option<CursorState>,
    pub version: u64,
}

pub struct State {
    document: BlockyDocument,
    cursor: Option<CursorState>,
    version: u64,
    /// Held while a `Changeset::apply` is in progress — a nested `apply`
    /// on this State is rejected (§4.2 step 1, §7 `ReentrantApply`).
    applying: bool,

    pub new_block_created: Stream<NewBlockCreated>,
    pub block_will_delete: Stream<BlockWillDelete>,
    pub cursor_state_changed: Stream<CursorStateChanged>,
    pub changeset_applied: Stream<ChangesetApplied>,
}

impl State {
    pub fn new(document: BlockyDocument, init_version: u64) -> Self {
        State {
            document,
            cursor: None,
            version: init_version,
            applying: false,
            new_block_created: Stream::new(),
            block_will_delete: Stream::new(),
            cursor_state_changed: Stream::new(),
            changeset_applied: Stream::new(),
        }
    }

    pub fn document(&self) -> &BlockyDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut BlockyDocument {
        &mut self.document
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn cursor(&self) -> Option<CursorState> {
        self.cursor
    }

    pub fn is_applying(&self) -> bool {
        self.applying
    }

    pub(crate) fn begin_apply(&mut self) -> Result<(), Error> {
        if self.applying {
            return Err(Error::ReentrantApply);
        }
        self.applying = true;
        Ok(())
    }

    pub(crate) fn end_apply(&mut self) {
        self.applying = false;
    }

    pub(crate) fn bump_version(&mut self) -> u64 {
        self.version += 1;
        self.version
    }

    pub fn get_block_element_by_id(&self, id: NodeId) -> Option<&BlockDataElement> {
        self.document.block(id).ok()
    }

    pub fn is_text_like(&self, id: NodeId) -> bool {
        self.document.block(id).map(|b| b.is_text_like()).unwrap_or(false)
    }

    /// `createTextElement` (§4.3): mints a fresh, detached text-like
    /// block directly into the arena — not inserted anywhere in the
    /// tree, for a caller to hand to `insertChildrenAt`/`After` (or
    /// discard) as it sees fit. `initial_delta` must already be in
    /// resolved document form (inserts only), matching `TextModel::
    /// from_delta`'s contract; `None` starts the element empty.
    pub fn create_text_element(&mut self, block_type: impl Into<String>, initial_delta: Option<Delta>, attrs: Option<Attributes>) -> Result<BlockDataElement, Error> {
        let text_content = match initial_delta {
            Some(d) => TextModel::from_delta(d)?,
            None => TextModel::new(),
        };
        let id = self.document.allocate_block(block_type, attrs.unwrap_or_default(), Some(text_content));
        Ok(self.document.block(id)?.clone())
    }

    pub fn split_cursor_state_by_blocks(&self, cursor: &CursorState) -> Result<Vec<BlockRange>, Error> {
        Ok(split_cursor_state_by_blocks(&self.document, cursor)?)
    }

    /// Low-level cursor set (§4.3 `__setCursorState`): clamps offsets
    /// into range (§7 `OutOfRangeCursor` — "clamped silently") and emits
    /// `cursorStateChanged`.
    pub fn set_cursor_state(&mut self, cursor: CursorState, reason: CursorChangeReason) {
        let clamped = self.clamp_cursor(cursor);
        self.cursor = Some(clamped);
        self.cursor_state_changed.emit(CursorStateChanged { cursor: clamped, reason });
    }

    pub(crate) fn clear_cursor(&mut self) {
        self.cursor = None;
    }

    pub(crate) fn clamp_cursor(&self, cursor: CursorState) -> CursorState {
        let clamp_one = |id: NodeId, offset: usize| -> (NodeId, usize) {
            let len = self.document.block(id).and_then(|b| b.text_content()).map(|t| t.len()).unwrap_or(0);
            (id, offset.min(len))
        };
        match cursor {
            CursorState::Collapsed { id, offset } => {
                let (id, offset) = clamp_one(id, offset);
                CursorState::Collapsed { id, offset }
            }
            CursorState::Open { start_id, start_offset, end_id, end_offset } => {
                let (start_id, start_offset) = clamp_one(start_id, start_offset);
                let (end_id, end_offset) = clamp_one(end_id, end_offset);
                CursorState::open(start_id, start_offset, end_id, end_offset)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use doc_model::node::Attributes;
    use doc_model::TextModel;

    #[test]
    fn reentrant_apply_is_rejected() {
        let mut state = State::new(BlockyDocument::new(), 0);
        state.begin_apply().unwrap();
        assert!(matches!(state.begin_apply(), Err(Error::ReentrantApply)));
        state.end_apply();
        assert!(state.begin_apply().is_ok());
    }

    #[test]
    fn set_cursor_state_clamps_out_of_range_offset() {
        let mut doc = BlockyDocument::new();
        let p = doc.allocate_block("paragraph", Attributes::new(), Some(TextModel::from_str("hi")));
        doc.insert_children_at(None, 0, vec![p]).unwrap();
        let mut state = State::new(doc, 0);

        state.set_cursor_state(CursorState::collapsed(p, 99), CursorChangeReason::UserInput);
        assert_eq!(state.cursor(), Some(CursorState::collapsed(p, 2)));
    }

    #[test]
    fn create_text_element_mints_a_detached_block_with_fresh_id() {
        let mut state = State::new(BlockyDocument::new(), 0);

        let mut initial = delta::delta::Delta::default();
        initial.insert("hi");
        let element = state.create_text_element("paragraph", Some(initial), None).unwrap();

        assert!(element.is_text_like());
        assert_eq!(element.text_content().unwrap().plain_text(), "hi");
        // Not inserted anywhere — the body is still empty.
        assert!(state.document().body().is_empty());
        assert!(state.document().block(element.id).is_ok());
    }

    #[test]
    fn create_text_element_rejects_an_unresolved_delta() {
        let mut state = State::new(BlockyDocument::new(), 0);
        let mut unresolved = delta::delta::Delta::default();
        unresolved.retain(3);
        assert!(state.create_text_element("paragraph", Some(unresolved), None).is_err());
    }
}
