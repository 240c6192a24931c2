// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Paste pipeline (§4.4 "Paste"): prevent default, read the clipboard,
//! prefer `text/html` parsed via `DOMParser`, and convert the body into a
//! sequence of `NewBlock`s using the *div handler* (self-paste
//! `data-content` detection, else a claiming block's `on_paste`) and the
//! *leaf handler* (default Text aggregation of runs of inline nodes,
//! spans attributed via the Span Registry). Falls back to `text/plain`
//! verbatim insertion when no HTML is present or it fails to parse.

use changeset::NewBlock;
use doc_model::TextModel;
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, DataTransfer, DomParser, Element, Node, SupportedType, Text};

use super::{render, Editor};
use crate::error::Error;
use crate::registry::ViewRegistry;

const BLOCK_LEVEL_TAGS: &[&str] = &["DIV", "P", "H1", "H2", "H3", "H4", "H5", "H6", "UL", "OL", "LI", "BLOCKQUOTE"];

/// `paste` event handler: the DOM entry point, with access to the
/// `ViewRegistry` claimant probe the Controller-level `pasteHTMLAtCursor`
/// cannot perform on its own (§6 Block definition contract).
pub fn handle_paste(editor: &mut Editor, event: &ClipboardEvent) -> Result<(), Error> {
    event.prevent_default();
    let data = match event.clipboard_data() {
        Some(d) => d,
        None => return Ok(()),
    };

    if let Ok(html) = data.get_data("text/html") {
        if !html.trim().is_empty() {
            match html_to_blocks(&html, Some(&editor.view_registry)) {
                Ok(blocks) if !blocks.is_empty() => return insert_and_render(editor, blocks),
                Ok(_) => return Ok(()), // parsed but produced nothing pasteable
                Err(_) => {} // falls through to plain text
            }
        }
    }
    paste_plain_fallback(editor, &data)
}

fn paste_plain_fallback(editor: &mut Editor, data: &DataTransfer) -> Result<(), Error> {
    if let Ok(text) = data.get_data("text/plain") {
        if !text.is_empty() {
            return paste_plain_text(editor, &text);
        }
    }
    Ok(())
}

/// `text/plain` fallback (§4.4 "insert the string verbatim at the cursor
/// with no attributes").
fn paste_plain_text(editor: &mut Editor, text: &str) -> Result<(), Error> {
    let block = NewBlock::new(blocks_text::format_const::NAME_PARAGRAPH).with_text(TextModel::from_str(text));
    insert_and_render(editor, vec![block])
}

fn insert_and_render(editor: &mut Editor, blocks: Vec<NewBlock>) -> Result<(), Error> {
    editor.controller.paste_elements_at_cursor(blocks).map_err(|e| Error::PasteFailed { reason: e.to_string() })?;
    render::reconcile(editor)
}

/// Parses `html`'s `<body>` into a `NewBlock` sequence. `view_registry`
/// is `None` for the Controller-level `pasteHTMLAtCursor` entry point,
/// which has no DOM-facing claimant set to consult (§9 design note on
/// the arena-level/DOM-facing registry split).
pub fn html_to_blocks(html: &str, view_registry: Option<&ViewRegistry>) -> Result<Vec<NewBlock>, Error> {
    let parser = DomParser::new().map_err(|_| clipboard_parse_error())?;
    let document = parser.parse_from_string(html, SupportedType::TextHtml).map_err(|_| clipboard_parse_error())?;
    let body = document.body().ok_or_else(clipboard_parse_error)?;
    Ok(convert_children(body.unchecked_ref::<Node>(), view_registry))
}

fn clipboard_parse_error() -> Error {
    Error::ClipboardParseError {
        reason: "could not parse pasted HTML as a document body".to_string(),
    }
}

/// Walks `parent`'s children, grouping consecutive non-block-level nodes
/// into one leaf-handled Text block and converting each block-level
/// element via the div handler.
fn convert_children(parent: &Node, view_registry: Option<&ViewRegistry>) -> Vec<NewBlock> {
    let mut blocks = Vec::new();
    let mut pending_leaf: Vec<Node> = Vec::new();
    let children = parent.child_nodes();

    for i in 0..children.length() {
        let Some(child) = children.item(i) else { continue };
        match child.dyn_ref::<Element>() {
            Some(el) if is_block_level(el) => {
                flush_leaf(&mut pending_leaf, &mut blocks);
                if let Some(block) = convert_div(el, view_registry) {
                    blocks.push(block);
                }
            }
            _ => pending_leaf.push(child),
        }
    }
    flush_leaf(&mut pending_leaf, &mut blocks);
    blocks
}

fn is_block_level(el: &Element) -> bool {
    el.has_attribute("data-type") || BLOCK_LEVEL_TAGS.contains(&el.tag_name().as_str())
}

/// *div handler* (§4.4 Paste): a self-paste `data-content` payload is
/// deserialized and cloned with a freshly minted id (the arena mints one
/// at apply time, since `NewBlock` never carries one — §6); an
/// unregistered block type named by that payload is dropped with a
/// warning (§7 UnknownBlockType); otherwise a registered claimant's
/// `on_paste` is consulted; failing that, the element's inline content is
/// aggregated as a leaf Text block rather than dropped outright.
fn convert_div(el: &Element, view_registry: Option<&ViewRegistry>) -> Option<NewBlock> {
    if let Some(content) = el.get_attribute("data-content") {
        return match crate::serialize::parse(&content) {
            Ok(block) if is_registered_block_type(&block.block_type) => Some(block),
            Ok(block) => {
                log::warn!("paste: dropping unregistered block type '{}'", block.block_type);
                None
            }
            Err(e) => {
                log::warn!("paste: data-content failed to parse ({e}), falling back to leaf aggregation");
                leaf_block_from_nodes(&[el.clone().into()])
            }
        };
    }

    if let Some(registry) = view_registry {
        for (_, handler) in registry.paste_handlers() {
            if handler.handle_paste_element(el) {
                return handler.on_paste(el).map(block_data_element_to_new_block);
            }
        }
    }

    leaf_block_from_nodes(&[el.clone().into()])
}

fn is_registered_block_type(name: &str) -> bool {
    changeset::registry::global().map(|r| r.blocks.get(name).is_ok()).unwrap_or(false)
}

fn block_data_element_to_new_block(claimed: doc_model::node::BlockDataElement) -> NewBlock {
    let mut block = NewBlock::new(claimed.block_type).with_attributes(claimed.attributes);
    if let Some(text) = claimed.text_content {
        block = block.with_text(text);
    }
    block
}

fn flush_leaf(pending: &mut Vec<Node>, blocks: &mut Vec<NewBlock>) {
    if pending.is_empty() {
        return;
    }
    if let Some(block) = leaf_block_from_nodes(pending) {
        blocks.push(block);
    }
    pending.clear();
}

/// *leaf handler* (§4.4 Paste): aggregates `nodes`' flattened text into
/// one Delta, attributing each run via `collect_attrs`. `None` if the
/// aggregate is blank (whitespace-only runs between block elements are
/// common in pasted HTML and shouldn't become empty paragraphs).
fn leaf_block_from_nodes(nodes: &[Node]) -> Option<NewBlock> {
    let mut delta = delta::delta::Delta::default();
    for n in nodes {
        append_inline(n, &delta::attributes::Attributes::default(), &mut delta);
    }
    let text = TextModel::from_delta(delta).unwrap_or_else(|_| TextModel::new());
    if text.plain_text().trim().is_empty() {
        return None;
    }
    Some(NewBlock::new(blocks_text::format_const::NAME_PARAGRAPH).with_text(text))
}

fn append_inline(node: &Node, attrs: &delta::attributes::Attributes, delta: &mut delta::delta::Delta) {
    if let Some(text) = node.dyn_ref::<Text>() {
        let s = text.data();
        if s.is_empty() {
            return;
        }
        if attrs.is_empty() {
            delta.insert(s);
        } else {
            delta.insert_attr(s, attrs.clone());
        }
        return;
    }
    let Some(el) = node.dyn_ref::<Element>() else { return };
    let merged = collect_attrs(el, attrs);
    let children = el.child_nodes();
    for i in 0..children.length() {
        if let Some(child) = children.item(i) {
            append_inline(&child, &merged, delta);
        }
    }
}

/// href from `data-href` or `<a href>`; style attributes from `class`
/// via the Span Registry (§4.4 Paste leaf handler).
fn collect_attrs(el: &Element, base: &delta::attributes::Attributes) -> delta::attributes::Attributes {
    use delta::types::attr_val::AttrVal;

    let mut attrs = base.clone();
    if let Some(href) = el.get_attribute("data-href").or_else(|| el.get_attribute("href")) {
        attrs.insert("href".to_string(), AttrVal::String(href));
    }

    if let Ok(registry) = changeset::registry::global() {
        let classes = el.class_list();
        for i in 0..classes.length() {
            if let Some(class) = classes.item(i) {
                if let Some((name, value)) = registry.spans.lookup(&class) {
                    attrs.insert(name.to_string(), to_delta_attr(value));
                }
            }
        }
    }
    attrs
}

fn to_delta_attr(value: &doc_model::AttrValue) -> delta::types::attr_val::AttrVal {
    use delta::types::attr_val::AttrVal;
    match value {
        doc_model::AttrValue::Null => AttrVal::Null,
        doc_model::AttrValue::Bool(b) => AttrVal::Bool(*b),
        doc_model::AttrValue::Str(s) => AttrVal::String(s.clone()),
        other => {
            log::warn!("span registry attribute value {other:?} has no Delta attribute representation, dropping to null");
            AttrVal::Null
        }
    }
}
