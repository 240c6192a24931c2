// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! `Editor` (§4.4): the DOM projector and event dispatcher. Owns the
//! container element, the `domMap`, the mounted `Block` runtime
//! instances, the IME composition flag, and the set of text block types
//! whose identity survives an `Enter` split. Grounded on
//! `op_transform::doc_root::DocumentRoot`'s "container + root element"
//! split, generalized from a single always-present `<p><br></p>` DOM
//! skeleton to a reconciler that walks an arbitrary `BlockyDocument`.

pub mod input;
pub mod keydown;
pub mod paste;
pub mod render;
pub mod selection;

use std::collections::{HashMap, HashSet};

use doc_model::NodeId;
use dom::dom_element::DomElement;

use crate::block_trait::Block;
use crate::controller::Controller;
use crate::error::Error;
use crate::registry::ViewRegistry;

static CONTAINER_CLASS: &str = "ql-container";
static EDITOR_CLASS: &str = "ql-editor";
static DIV: &str = "DIV";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EditorMode {
    Edit,
    Read,
    Closed,
}

/// One mounted block: its DOM element and its runtime instance.
pub struct Mounted {
    pub element: DomElement,
    pub block: Box<dyn Block>,
}

pub struct Editor {
    pub controller: Controller,
    pub view_registry: ViewRegistry,
    mode: EditorMode,
    container: DomElement,
    root: DomElement,
    /// §4.4 "a `domMap: id → HTMLElement`", paralleling the block index.
    dom_map: HashMap<NodeId, Mounted>,
    /// IME composition flag (§4.4 Composition, §5 "mutex between the
    /// browser and the input diff path").
    composing: bool,
    /// §9 supplemented feature: block types whose identity is preserved
    /// across an `Enter` split (e.g. bulleted lists, once that plugin
    /// exists).
    pub preserve_type_on_split: HashSet<&'static str>,
}

impl Editor {
    pub fn new(controller: Controller) -> Self {
        let container = DomElement::new(DIV);
        container.set_class(CONTAINER_CLASS);
        let root = DomElement::new(DIV);
        root.set_class(EDITOR_CLASS);
        if controller.options().spellcheck {
            root.set_attribute("spellcheck", "true");
        } else {
            root.set_attribute("spellcheck", "false");
        }
        container.append_child(root.node());

        Editor {
            controller,
            view_registry: ViewRegistry::new(),
            mode: EditorMode::Read,
            container,
            root,
            dom_map: HashMap::new(),
            composing: false,
            preserve_type_on_split: HashSet::new(),
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn container_element(&self) -> &DomElement {
        &self.container
    }

    pub fn root_element(&self) -> &DomElement {
        &self.root
    }

    pub fn dom_map(&self) -> &HashMap<NodeId, Mounted> {
        &self.dom_map
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    pub fn composition_start(&mut self) {
        self.composing = true;
    }

    /// `compositionend` clears the flag and immediately runs the input
    /// diff once (§4.4 Composition).
    pub fn composition_end(&mut self) -> Result<(), Error> {
        self.composing = false;
        input::handle_input(self)
    }

    /// Subscribes the editor's renderer and selection syncing to the
    /// controller's state streams; call once after construction. Mirrors
    /// `DocumentRoot::append_to_body`/`open` wiring the initial DOM.
    pub fn open(&mut self) -> Result<(), Error> {
        if self.mode != EditorMode::Closed {
            self.close();
        }
        self.edit_mode(EditorMode::Edit);
        render::render_full(self)?;
        Ok(())
    }

    pub fn close(&mut self) {
        for (_, mounted) in self.dom_map.drain() {
            self.root.remove_child(mounted.element.node());
        }
        self.edit_mode(EditorMode::Closed);
    }

    fn edit_mode(&mut self, mode: EditorMode) {
        match mode {
            EditorMode::Edit => self.root.set_attribute("contenteditable", "true"),
            EditorMode::Read | EditorMode::Closed => self.root.remove_attribute("contenteditable"),
        }
        self.mode = mode;
    }

    /// `dispose` (§4.5/§9 "must remove [listeners] on dispose to avoid
    /// leaks"). Event listener registration itself is left to the
    /// embedder's wasm-bindgen closures (out of this core's scope per
    /// §1); this tears down the owned DOM subtree.
    pub fn dispose(&mut self) {
        self.close();
    }

    pub(crate) fn dom_map_mut(&mut self) -> &mut HashMap<NodeId, Mounted> {
        &mut self.dom_map
    }

    pub fn focus(&self) {
        self.root.focus();
    }
}
