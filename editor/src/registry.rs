// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The DOM-facing half of block registration (§9 "dynamic dispatch over
//! blocks"): `changeset::registry::BlockRegistry` already covers the
//! arena-level capability set (`name`/`editable`/`is_text_like`/
//! `on_block_created`). This module adds the two capabilities that *do*
//! need `web-sys` and so cannot live in `changeset`: constructing a
//! `Block` runtime instance to mount, and an optional `PasteCapable`
//! claimant. Neither `blocks_title` nor `blocks_text` needs a paste
//! claimant (§1 scope), so this registry starts empty and is only
//! exercised by the default text-walk `Block` implementation.

use std::collections::HashMap;
use std::sync::Arc;

use crate::block_trait::{Block, PasteCapable};
use changeset::registry::BlockDefinition;
use changeset::Changeset;
use doc_model::NodeId;
use dom::dom_element::DomElement;

/// The default `Block` runtime: every text-like block this core ships
/// (Title, Text) uses the spec's default DOM-walk mapping unchanged, so
/// one implementation covers both (§4.4: "the block's default
/// implementation").
#[derive(Default)]
pub struct DefaultTextBlock {
    id: Option<NodeId>,
}

impl DefaultTextBlock {
    pub fn new(id: NodeId) -> Self {
        DefaultTextBlock { id: Some(id) }
    }
}

impl Block for DefaultTextBlock {
    fn block_did_mount(&mut self, _element: &DomElement) {
        if let Some(id) = self.id {
            log::debug!("block {id} mounted");
        }
    }

    fn block_will_unmount(&mut self) {
        if let Some(id) = self.id {
            log::debug!("block {id} unmounted");
        }
    }

    fn block_content_changed(
        &self,
        changeset: &mut Changeset,
        node: NodeId,
        offset: usize,
        element: &DomElement,
    ) -> Result<(), crate::error::Error> {
        let dom_text = element.node().text_content().unwrap_or_default();
        let cs = std::mem::take(changeset);
        *changeset = cs.text_edit(node, "textContent", move |model| {
            let target = doc_model::TextModel::from_str(dom_text.clone());
            model.diff(&target, Some(offset))
        });
        Ok(())
    }
}

/// Factory for mounting a `Block` instance for a given block type.
pub trait BlockViewFactory: Send + Sync {
    fn create(&self, id: NodeId) -> Box<dyn Block>;
}

pub struct DefaultTextBlockFactory;

impl BlockViewFactory for DefaultTextBlockFactory {
    fn create(&self, id: NodeId) -> Box<dyn Block> {
        Box::new(DefaultTextBlock::new(id))
    }
}

/// `name → Block runtime factory` and `name → paste claimant`, the
/// view-layer counterpart of `changeset::registry::BlockRegistry`.
pub struct ViewRegistry {
    factories: HashMap<String, Arc<dyn BlockViewFactory>>,
    paste_handlers: HashMap<String, Arc<dyn PasteCapable + Send + Sync>>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        let mut factories: HashMap<String, Arc<dyn BlockViewFactory>> = HashMap::new();
        factories.insert(blocks_title::TitleBlock.name().to_string(), Arc::new(DefaultTextBlockFactory));
        factories.insert(blocks_text::format_const::NAME_PARAGRAPH.to_string(), Arc::new(DefaultTextBlockFactory));
        ViewRegistry {
            factories,
            paste_handlers: HashMap::new(),
        }
    }

    pub fn register_factory(&mut self, name: impl Into<String>, factory: Arc<dyn BlockViewFactory>) {
        self.factories.insert(name.into(), factory);
    }

    pub fn register_paste_handler(&mut self, name: impl Into<String>, handler: Arc<dyn PasteCapable + Send + Sync>) {
        self.paste_handlers.insert(name.into(), handler);
    }

    pub fn create_block(&self, block_type: &str, id: NodeId) -> Box<dyn Block> {
        match self.factories.get(block_type) {
            Some(factory) => factory.create(id),
            None => {
                log::warn!("no view factory registered for block type {block_type}, falling back to default text block");
                Box::new(DefaultTextBlock::new(id))
            }
        }
    }

    pub fn paste_handler(&self, block_type: &str) -> Option<&Arc<dyn PasteCapable + Send + Sync>> {
        self.paste_handlers.get(block_type)
    }

    pub fn paste_handlers(&self) -> impl Iterator<Item = (&String, &Arc<dyn PasteCapable + Send + Sync>)> {
        self.paste_handlers.iter()
    }
}

impl Default for ViewRegistry {
    fn default() -> Self {
        ViewRegistry::new()
    }
}
