// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The Text (paragraph) block: the one concrete text-like body block
//! this core ships (§1 keeps Title/Text in-core; Heading/List/Image/Link
//! are named out-of-scope external collaborators). Grounded on
//! `core_formats::text_formatter::TextFormat` and `t_formats`'s
//! attribute-name catalog, generalized from "apply formatting by
//! wrapping DOM elements" to "apply formatting by composing a retain
//! edit into the Text Model" (the DOM projection of that Text Model is
//! `editor`'s concern, not this crate's).

pub mod format_const;

use std::sync::Arc;

use changeset::registry::{global_mut, BlockDefinition};
use doc_model::{BlockyDocument, NodeId, TextModel};

pub struct TextBlock;

impl TextBlock {
    pub fn new() -> Self {
        TextBlock
    }
}

impl Default for TextBlock {
    fn default() -> Self {
        TextBlock::new()
    }
}

impl BlockDefinition for TextBlock {
    fn name(&self) -> &'static str {
        format_const::NAME_PARAGRAPH
    }

    fn is_text_like(&self) -> bool {
        true
    }

    fn on_block_created(&self, doc: &mut BlockyDocument, id: NodeId) {
        log::debug!("paragraph block {id} created");
        let _ = doc;
    }
}

/// Registers the Text block definition and the class-name → attribute
/// mappings the paste pipeline's leaf handler consults (§4.4, "style
/// attributes from class mapping via the Span Registry") — grounded on
/// `core_formats::t_formats`'s attribute ↔ HTML-tag table, here run in
/// the opposite direction (class name in pasted markup → attribute).
pub fn register() -> Result<(), changeset::Error> {
    use doc_model::AttrValue;
    let mut registries = global_mut()?;
    registries.blocks.register(Arc::new(TextBlock::new()));
    registries.spans.register("ql-bold", format_const::FORMAT_BOLD, AttrValue::Bool(true));
    registries.spans.register("ql-italic", format_const::FORMAT_ITALIC, AttrValue::Bool(true));
    registries.spans.register("ql-underline", format_const::FORMAT_UNDERLINE, AttrValue::Bool(true));
    registries.spans.register("ql-strike", format_const::FORMAT_STRIKE, AttrValue::Bool(true));
    Ok(())
}

/// Starting content for a freshly created Text block (§3 Lifecycles:
/// nodes are created with a fresh id and an empty Text Model).
pub fn empty_text_model() -> TextModel {
    TextModel::new()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn text_block_is_text_like() {
        let block = TextBlock::new();
        assert!(block.is_text_like());
        assert_eq!(block.name(), "Text");
    }

    #[test]
    fn register_adds_block_and_span_mappings() {
        register().unwrap();
        let registries = changeset::registry::global().unwrap();
        assert!(registries.blocks.is_registered("Text"));
        assert!(registries.spans.lookup("ql-bold").is_some());
    }
}
