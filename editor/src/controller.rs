// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! `Controller` (§4.5/§6): the stable public façade over `State`.
//! Grounded on `op_transform::doc_root::DocumentRoot`'s public-operation
//! impl blocks, generalized from "one Delta op at a time against a DOM
//! cursor" to "one `Changeset` at a time against a `NodeId`-addressed
//! cursor".

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use delta::delta::Delta;
use doc_model::node::Attributes;
use doc_model::{AttrValue, BlockyDocument, CursorState, NodeId, TextModel};

use changeset::registry::BlockDefinition;
use changeset::stream::Stream;
use changeset::{ApplyOptions, Changeset, CursorChangeReason, NewBlock, State};

use crate::error::Error;

/// Partial padding override (§6 Configuration `padding`).
#[derive(Clone, Copy, Debug, Default)]
pub struct Padding {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
}

/// A remote participant's cursor, broadcast via `cursorChanged` and
/// rendered by `collaborative_cursor_factory` (§4.5, §6).
#[derive(Clone, Copy, Debug)]
pub struct RemoteCursor {
    pub participant: u64,
    pub cursor: CursorState,
}

pub type SpannerFactory = Arc<dyn Fn(NodeId) -> () + Send + Sync>;
pub type ToolbarFactory = Arc<dyn Fn() -> () + Send + Sync>;
pub type UrlLauncher = Arc<dyn Fn(&str) + Send + Sync>;
pub type OnError = Arc<dyn Fn(&Error) + Send + Sync>;
pub type CollaborativeCursorFactory = Arc<dyn Fn(&RemoteCursor) + Send + Sync>;

/// §6 Configuration: every named `ControllerOptions` field, with the
/// stated defaults.
pub struct ControllerOptions {
    pub title: String,
    pub document: Option<BlockyDocument>,
    pub init_version: u64,
    pub plugins: Vec<Arc<dyn BlockDefinition + Send + Sync>>,
    pub padding: Padding,
    pub spanner_factory: Option<SpannerFactory>,
    pub toolbar_factory: Option<ToolbarFactory>,
    pub empty_placeholder: String,
    pub spellcheck: bool,
    pub title_editable: bool,
    pub url_launcher: Option<UrlLauncher>,
    pub on_error: Option<OnError>,
    pub collaborative_cursor_factory: Option<CollaborativeCursorFactory>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        ControllerOptions {
            title: String::new(),
            document: None,
            init_version: 0,
            plugins: Vec::new(),
            padding: Padding::default(),
            spanner_factory: None,
            toolbar_factory: None,
            empty_placeholder: "Empty content".to_string(),
            spellcheck: true,
            title_editable: true,
            url_launcher: None,
            on_error: None,
            collaborative_cursor_factory: None,
        }
    }
}

pub struct CursorChanged {
    pub cursor: Option<CursorState>,
    pub reason: CursorChangeReason,
}

/// Owns the `State`, the plugin set registered at construction, a
/// `nextTick` queue coalesced into a single flush, and the
/// `cursorChanged` observable used for collaborative-cursor broadcast
/// (§4.5). DOM ownership (the container, the `domMap`, event listeners)
/// belongs to `crate::view::Editor`, which holds a `Controller`.
pub struct Controller {
    state: State,
    options: ControllerOptions,
    next_tick: Vec<Box<dyn FnOnce(&mut Controller)>>,
    pub cursor_changed: Stream<CursorChanged>,
}

impl Controller {
    pub fn new(mut options: ControllerOptions) -> Result<Self> {
        for plugin in &options.plugins {
            changeset::registry::global_mut()?.blocks.register(plugin.clone());
        }

        let document = match options.document.take() {
            Some(doc) => doc,
            None => {
                let mut doc = BlockyDocument::new();
                if !options.title.is_empty() {
                    doc.block_mut(doc.title_id())?.text_content = Some(TextModel::from_str(options.title.clone()));
                }
                doc
            }
        };

        let mut state = State::new(document, options.init_version);
        if state.document().body().is_empty() {
            let p = NewBlock::new(blocks_text::format_const::NAME_PARAGRAPH).with_text(TextModel::new());
            let cursor_changeset = Changeset::new().insert_children_at(None, 0, vec![p]);
            let after = cursor_changeset.apply(&mut state, ApplyOptions::default())?;
            if after.is_none() {
                if let Some(&id) = state.document().body().first() {
                    state.set_cursor_state(CursorState::collapsed(id, 0), CursorChangeReason::Changeset);
                }
            }
        }

        Ok(Controller {
            state,
            options,
            next_tick: Vec::new(),
            cursor_changed: Stream::new(),
        })
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    /// Enqueues a callback to run at the next `flush_next_tick` (§5: "the
    /// only asynchrony is `enqueueNextTick`, which coalesces callbacks
    /// into a single animation frame"). The view layer calls
    /// `flush_next_tick` once per animation frame.
    pub fn enqueue_next_tick(&mut self, f: impl FnOnce(&mut Controller) + 'static) {
        self.next_tick.push(Box::new(f));
    }

    pub fn flush_next_tick(&mut self) {
        let pending = std::mem::take(&mut self.next_tick);
        for f in pending {
            f(self);
        }
    }

    fn apply(&mut self, changeset: Changeset, opts: ApplyOptions) -> Result<Option<CursorState>> {
        let after = changeset.apply(&mut self.state, opts)?;
        Ok(after)
    }

    /// `insertBlockAfterId` (§4.5): insert a freshly created block after
    /// `after_id` (or at the start of the body if `None`).
    pub fn insert_block_after_id(&mut self, after_id: Option<NodeId>, block_type: impl Into<String>, attrs: Attributes) -> Result<NodeId> {
        let block_type = block_type.into();
        let new_block = NewBlock::new(block_type).with_attributes(attrs).with_text(TextModel::new());
        let cs = Changeset::new().insert_children_after(None, after_id, vec![new_block]);
        self.apply(cs, ApplyOptions::default())?;
        let index = match after_id {
            None => 0,
            Some(prev) => self.state.document().body().iter().position(|&id| id == prev).map(|i| i + 1).unwrap_or(0),
        };
        let id = *self.state.document().body().get(index).ok_or(Error::NotOpenForEdit)?;
        let cs2 = Changeset::new().set_cursor_state(CursorState::collapsed(id, 0));
        self.apply(cs2, ApplyOptions::default())?;
        Ok(id)
    }

    /// `deleteBlock` (§4.5).
    pub fn delete_block(&mut self, id: NodeId) -> Result<()> {
        let cs = Changeset::new().remove_node(id);
        self.apply(cs, ApplyOptions { refresh_cursor: true, force_update: false })?;
        Ok(())
    }

    /// `formatTextOnCursor`/`formatTextOnSelectedText` (§4.5, §4.1 toggle semantics).
    pub fn format_text_on_selection(&mut self, attr_name: &str, value: AttrValue) -> Result<()> {
        let cursor = match self.state.cursor() {
            Some(c) => c,
            None => return Ok(()),
        };
        let ranges = self.state.split_cursor_state_by_blocks(&cursor)?;
        let mut cs = Changeset::new();
        let on = to_delta_attr(value);
        for range in ranges {
            let (start, end, attr_name, on) = (range.start, range.end, attr_name.to_string(), on.clone());
            cs = cs.text_edit(range.block, "textContent", move |model| {
                doc_model::delta_ext::toggle_format_edit(model.as_delta(), start, end, &attr_name, on)
            });
        }
        self.apply(cs.set_cursor_state(cursor), ApplyOptions::default())?;
        Ok(())
    }

    pub fn format_text_on_cursor(&mut self, attr_name: &str, value: AttrValue) -> Result<()> {
        self.format_text_on_selection(attr_name, value)
    }

    pub fn format_text_on_selected_text(&mut self, attr_name: &str, value: AttrValue) -> Result<()> {
        self.format_text_on_selection(attr_name, value)
    }

    /// `applyDeltaAtCursor` (§4.5): composes `delta` into the cursor's
    /// block at the cursor offset, as a retain+insert edit.
    pub fn apply_delta_at_cursor(&mut self, delta: Delta) -> Result<()> {
        let cursor = match self.state.cursor() {
            Some(CursorState::Collapsed { id, offset }) => (id, offset),
            _ => return Ok(()),
        };
        let (id, offset) = cursor;
        let change_len = doc_model::delta_ext::change_length(&delta);
        let cs = Changeset::new()
            .text_edit(id, "textContent", move |_model| {
                let mut edit = Delta::default();
                edit.retain(offset);
                for op in delta.get_ops_ref() {
                    edit.push(op.clone());
                }
                edit
            })
            .set_cursor_state(CursorState::collapsed(id, (offset as i64 + change_len).max(0) as usize));
        self.apply(cs, ApplyOptions::default())?;
        Ok(())
    }

    /// `deleteContentInsideInSelection` (§4.5, §4.4 open-range delete).
    pub fn delete_content_in_selection(&mut self) -> Result<()> {
        let cursor = match self.state.cursor() {
            Some(c) => c,
            None => return Ok(()),
        };
        if cursor.is_collapsed() {
            return Ok(());
        }
        let cs = crate::view::keydown::build_open_range_delete(&self.state, &cursor)?;
        self.apply(cs, ApplyOptions { refresh_cursor: true, force_update: false })?;
        Ok(())
    }

    /// `pasteHTMLAtCursor` (§4.5, §4.4 Paste): parses `html` with no block
    /// registered as a DOM-facing paste claimant (the `ViewRegistry`
    /// claimant probe is the view layer's richer entry point, `crate::
    /// view::paste::handle_paste`) — self-paste `data-content` detection
    /// and the default leaf-text aggregation still apply.
    pub fn paste_html_at_cursor(&mut self, html: &str) -> Result<()> {
        let blocks = crate::view::paste::html_to_blocks(html, None).map_err(|e| anyhow::anyhow!(e.to_string()))?;
        self.paste_elements_at_cursor(blocks)
    }

    /// `pasteElementsAtCursor` (§4.5): the shared insertion routine behind
    /// both Controller-surface paste entry points and the DOM `paste`
    /// event handler. §4.4's paste rule: the first pasted element merges
    /// into the current block when both are text-like (`head + first
    /// pasted text`, cursor preserved inside the merged run), with the
    /// remaining pasted elements inserted after it and a non-empty `tail`
    /// appended as a new trailing block of the current block's type.
    /// When the first pasted element is not text-like, SPEC_FULL.md's
    /// Open Question 2 decision applies instead: the current block is
    /// split exactly as `Enter` splits it (`head` stays, `tail` becomes a
    /// new trailing block after the last pasted element) with no merge.
    pub fn paste_elements_at_cursor(&mut self, mut blocks: Vec<NewBlock>) -> Result<()> {
        if blocks.is_empty() {
            return Ok(());
        }
        if matches!(self.state.cursor(), Some(c) if !c.is_collapsed()) {
            self.delete_content_in_selection()?;
        }
        let (id, offset) = match self.state.cursor() {
            Some(CursorState::Collapsed { id, offset }) => (id, offset),
            _ => return Ok(()),
        };
        let current = self.state.get_block_element_by_id(id).ok_or(Error::InvariantViolation { id })?;

        if !current.is_text_like() {
            let body_before = self.state.document().body().to_vec();
            let pos = body_before.iter().position(|&b| b == id).ok_or(Error::InvariantViolation { id })?;
            let cs = Changeset::new().insert_children_after(None, Some(id), blocks);
            self.apply(cs, ApplyOptions::default())?;
            let body_after = self.state.document().body().to_vec();
            if let Some(&first) = body_after.get(pos + 1) {
                let cs2 = Changeset::new().set_cursor_state(CursorState::collapsed(first, 0));
                self.apply(cs2, ApplyOptions::default())?;
            }
            return Ok(());
        }

        let text = current.text_content()?.clone();
        let head = text.slice(0, Some(offset));
        let tail = text.slice(offset, None);

        if blocks[0].text_content.is_some() {
            let first = blocks.remove(0);
            let first_text = first.text_content.unwrap();
            let cursor_offset = offset + first_text.len();
            let merged = head.concat(&first_text);

            if !tail.is_empty() {
                blocks.push(NewBlock::new(current.block_type.clone()).with_text(tail));
            }
            let remaining = blocks;

            let cs = Changeset::new().text_edit(id, "textContent", move |model| crate::view::keydown::replace_all_edit(model.len(), &merged));
            let cs = if remaining.is_empty() {
                cs
            } else {
                cs.insert_children_after(None, Some(id), remaining)
            };
            self.apply(cs, ApplyOptions::default())?;

            let cs2 = Changeset::new().set_cursor_state(CursorState::collapsed(id, cursor_offset));
            self.apply(cs2, ApplyOptions::default())?;
            return Ok(());
        }

        let trailing_present = !tail.is_empty();
        if trailing_present {
            blocks.push(NewBlock::new(current.block_type.clone()).with_text(tail));
        }
        let inserted_count = blocks.len();

        let cs = Changeset::new()
            .text_edit(id, "textContent", move |model| crate::view::keydown::replace_all_edit(model.len(), &head))
            .insert_children_after(None, Some(id), blocks);
        self.apply(cs, ApplyOptions::default())?;

        // The trailing block (if any) lands last among the freshly
        // inserted siblings; otherwise the first surviving block after
        // `id` is the first one pasted in (§9 Open Question 2 decision).
        let body = self.state.document().body().to_vec();
        let pos = body.iter().position(|&b| b == id).ok_or(Error::InvariantViolation { id })?;
        let offset_from_id = if trailing_present { inserted_count } else { 1 };
        let target = *body.get(pos + offset_from_id).ok_or(Error::InvariantViolation { id })?;
        let cs2 = Changeset::new().set_cursor_state(CursorState::collapsed(target, 0));
        self.apply(cs2, ApplyOptions::default())?;
        Ok(())
    }

    /// `setCursorState` (§4.5/§4.3): the public entry point a view/input
    /// handler uses to set the cursor outside of a structural Changeset.
    pub fn set_cursor_state(&mut self, cursor: CursorState, reason: CursorChangeReason) {
        self.state.set_cursor_state(cursor, reason);
        self.cursor_changed.emit(CursorChanged { cursor: Some(cursor), reason });
    }

    pub fn get_block_element_at_cursor(&self) -> Option<&doc_model::BlockDataElement> {
        let id = self.state.cursor()?.anchor_block();
        self.state.get_block_element_by_id(id)
    }

    /// `insertFollowerWidget` (§4.5): attaches an out-of-band widget id to
    /// a block's attributes; out-of-scope UI concerns (the widget itself)
    /// are an external collaborator, this only records the association.
    pub fn insert_follower_widget(&mut self, block: NodeId, widget_key: &str, widget_id: &str) -> Result<()> {
        let mut attrs = Attributes::new();
        attrs.insert(widget_key.to_string(), AttrValue::Str(widget_id.to_string()));
        let cs = Changeset::new().update_attributes(block, attrs);
        self.apply(cs, ApplyOptions::default())?;
        Ok(())
    }

    /// `applyCursorChangedEvent` (§4.5): applies a remote participant's
    /// cursor for rendering via `collaborative_cursor_factory`, without
    /// touching the local cursor.
    pub fn apply_cursor_changed_event(&self, remote: RemoteCursor) {
        if let Some(factory) = &self.options.collaborative_cursor_factory {
            factory(&remote);
        }
    }

    pub fn plugins_text_like(&self) -> HashSet<String> {
        self.options.plugins.iter().filter(|p| p.is_text_like()).map(|p| p.name().to_string()).collect()
    }
}

fn to_delta_attr(value: AttrValue) -> delta::types::attr_val::AttrVal {
    use delta::types::attr_val::AttrVal;
    match value {
        AttrValue::Null => AttrVal::Null,
        AttrValue::Bool(b) => AttrVal::Bool(b),
        AttrValue::Str(s) => AttrVal::String(s),
        other => {
            log::warn!("format attribute value {other:?} has no Delta attribute representation, dropping to null");
            AttrVal::Null
        }
    }
}
