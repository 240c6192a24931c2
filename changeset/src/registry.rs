// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Block/Span/Embed Registry (§2, §9): sealed-after-init, polymorphic
//! catalogs the rest of the core consumes. Mirrors
//! `op_transform::registry::Registry`'s shape — a global
//! `Lazy<RwLock<_>>`, name-keyed maps, and an explicit registration
//! order — generalized from `FormatTait` (DOM-coupled) to
//! `BlockDefinition` (arena-level only; the DOM-facing optional paste
//! hooks live in `editor`, see `editor::block_trait::PasteCapable`).

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use doc_model::{AttrValue, BlockyDocument, NodeId};
use once_cell::sync::Lazy;

use crate::error::Error;

/// What a block plugin declares about itself (§6 Block definition
/// contract: `name`, `editable`, `onBlockCreated`). The DOM-facing
/// runtime contract (`blockDidMount`, `blockFocused`, ...) is a
/// separate trait in `editor`, implemented by the same plugin type.
pub trait BlockDefinition {
    fn name(&self) -> &'static str;

    fn editable(&self) -> bool {
        true
    }

    fn is_text_like(&self) -> bool;

    /// Called once right after the arena allocates a node of this type,
    /// to let the plugin seed default attributes.
    fn on_block_created(&self, _doc: &mut BlockyDocument, _id: NodeId) {}
}

#[derive(Default)]
pub struct BlockRegistry {
    defs: HashMap<&'static str, Arc<dyn BlockDefinition + Send + Sync>>,
    order: Vec<&'static str>,
}

impl BlockRegistry {
    pub fn register(&mut self, def: Arc<dyn BlockDefinition + Send + Sync>) {
        let name = def.name();
        if !self.defs.contains_key(name) {
            self.order.push(name);
        }
        self.defs.insert(name, def);
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn BlockDefinition + Send + Sync>, Error> {
        self.defs.get(name).cloned().ok_or_else(|| Error::UnknownBlockType { name: name.to_string() })
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    pub fn registration_order(&self) -> &[&'static str] {
        &self.order
    }
}

/// Maps a CSS class name seen on pasted HTML to the text attribute it
/// stands for (e.g. `class="ql-bold"` → `{bold: true}`), used by the
/// paste pipeline's leaf handler (§4.4).
#[derive(Default)]
pub struct SpanRegistry {
    class_to_attr: HashMap<String, (String, AttrValue)>,
}

impl SpanRegistry {
    pub fn register(&mut self, class_name: impl Into<String>, attr_name: impl Into<String>, value: AttrValue) {
        self.class_to_attr.insert(class_name.into(), (attr_name.into(), value));
    }

    pub fn lookup(&self, class_name: &str) -> Option<(&str, &AttrValue)> {
        self.class_to_attr.get(class_name).map(|(name, value)| (name.as_str(), value))
    }
}

/// Maps an embed type name to a factory producing the object-insert
/// attribute payload for it (§3 Text Model: "embeds are represented as
/// object inserts if an embed registry handles them"). No concrete
/// embed type is registered by this core — Image and similar are named
/// out-of-scope external collaborators in spec.md §1.
#[derive(Default)]
pub struct EmbedRegistry {
    factories: HashMap<&'static str, Arc<dyn Fn(&serde_json::Value) -> AttrValue + Send + Sync>>,
}

impl EmbedRegistry {
    pub fn register(&mut self, name: &'static str, factory: Arc<dyn Fn(&serde_json::Value) -> AttrValue + Send + Sync>) {
        self.factories.insert(name, factory);
    }

    pub fn build(&self, name: &str, payload: &serde_json::Value) -> Option<AttrValue> {
        self.factories.get(name).map(|f| f(payload))
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

#[derive(Default)]
pub struct Registries {
    pub blocks: BlockRegistry,
    pub spans: SpanRegistry,
    pub embeds: EmbedRegistry,
}

static REGISTRIES: Lazy<RwLock<Registries>> = Lazy::new(|| RwLock::new(Registries::default()));

pub fn global() -> Result<RwLockReadGuard<'static, Registries>, Error> {
    REGISTRIES.read().map_err(|_| Error::UnknownBlockType { name: "<poisoned registry lock>".to_string() })
}

pub fn global_mut() -> Result<RwLockWriteGuard<'static, Registries>, Error> {
    REGISTRIES.write().map_err(|_| Error::UnknownBlockType { name: "<poisoned registry lock>".to_string() })
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use doc_model::document::TITLE_BLOCK_TYPE;

    struct TestTitle;
    impl BlockDefinition for TestTitle {
        fn name(&self) -> &'static str {
            TITLE_BLOCK_TYPE
        }
        fn is_text_like(&self) -> bool {
            true
        }
    }

    struct TestParagraph;
    impl BlockDefinition for TestParagraph {
        fn name(&self) -> &'static str {
            "Paragraph"
        }
        fn is_text_like(&self) -> bool {
            true
        }
    }

    /// Registers just enough for unit tests in this crate: a title and a
    /// plain paragraph, mirroring `op_transform::registry::init_test_registry`.
    pub fn init_test_registry() {
        let mut reg = global_mut().unwrap();
        if !reg.blocks.is_registered("Paragraph") {
            reg.blocks.register(Arc::new(TestTitle));
            reg.blocks.register(Arc::new(TestParagraph));
        }
    }
}

#[cfg(test)]
mod test {
    use super::test_support::init_test_registry;
    use super::*;

    #[test]
    fn unregistered_block_type_is_an_error() {
        init_test_registry();
        let reg = global().unwrap();
        assert!(matches!(reg.blocks.get("no-such-block"), Err(Error::UnknownBlockType { .. })));
        assert!(reg.blocks.get("Paragraph").is_ok());
    }

    #[test]
    fn span_registry_maps_class_to_attribute() {
        let mut spans = SpanRegistry::default();
        spans.register("ql-bold", "bold", AttrValue::Bool(true));
        let (attr, value) = spans.lookup("ql-bold").unwrap();
        assert_eq!(attr, "bold");
        assert_eq!(value.as_bool(), Some(true));
        assert!(spans.lookup("unknown-class").is_none());
    }
}
