// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The Title block: the single always-present text-like block at
//! `BlockyDocument::title_id()`. Grounded on
//! `core_formats::paragraph::Pblock`, the teacher's simplest `FormatTait`
//! implementation (a block format with no attributes and no children
//! beyond its own text run) — Title is the same shape, just never
//! addressed through the body list.

use changeset::registry::BlockDefinition;
use doc_model::document::TITLE_BLOCK_TYPE;
use doc_model::{BlockyDocument, NodeId};

pub struct TitleBlock;

impl TitleBlock {
    pub fn new() -> Self {
        TitleBlock
    }
}

impl Default for TitleBlock {
    fn default() -> Self {
        TitleBlock::new()
    }
}

impl BlockDefinition for TitleBlock {
    fn name(&self) -> &'static str {
        TITLE_BLOCK_TYPE
    }

    fn is_text_like(&self) -> bool {
        true
    }

    fn on_block_created(&self, _doc: &mut BlockyDocument, id: NodeId) {
        log::debug!("title block {id} created");
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn title_is_text_like_and_editable() {
        let title = TitleBlock::new();
        assert!(title.is_text_like());
        assert!(title.editable());
        assert_eq!(title.name(), TITLE_BLOCK_TYPE);
    }
}
