// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! `BlockyDocument`: a title node plus an ordered body of block nodes,
//! all owned by one `Arena`. Mirrors the shape of the teacher's
//! `DocumentRoot` (`op_transform::doc_root::DocumentRoot`), minus the DOM
//! skeleton it builds in `new()` — here "open" is just allocating a title
//! and one empty paragraph, no `<div class="ql-container">` involved.

use serde_json::{Map, Value as Json};

use crate::error::Error;
use crate::location::NodeLocation;
use crate::node::{is_block_id, Arena, AttrValue, Attributes, BlockDataElement, NodeId};
use crate::text_model::TextModel;

pub const TITLE_BLOCK_TYPE: &str = "Title";

#[derive(Clone, Debug)]
pub struct BlockyDocument {
    arena: Arena,
    title: NodeId,
    body: Vec<NodeId>,
}

impl BlockyDocument {
    /// A fresh document: an empty title and an empty body, same as the
    /// teacher's `DocumentRoot::new` before `open()` has inserted the
    /// first paragraph.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let title = arena.alloc(TITLE_BLOCK_TYPE, Attributes::new(), Some(TextModel::new()));
        BlockyDocument {
            arena,
            title,
            body: Vec::new(),
        }
    }

    pub fn title_id(&self) -> NodeId {
        self.title
    }

    pub fn body(&self) -> &[NodeId] {
        &self.body
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    pub fn block(&self, id: NodeId) -> Result<&BlockDataElement, Error> {
        self.arena.get(id)
    }

    pub fn block_mut(&mut self, id: NodeId) -> Result<&mut BlockDataElement, Error> {
        self.arena.get_mut(id)
    }

    pub fn allocate_block(
        &mut self,
        block_type: impl Into<String>,
        attributes: Attributes,
        text_content: Option<TextModel>,
    ) -> NodeId {
        self.arena.alloc(block_type, attributes, text_content)
    }

    /// Inserts `children` as siblings starting at `index` under `parent`
    /// (`parent == None` means the document body). Returns the number of
    /// nodes inserted, for translating into a `SiblingEdit::Insert`.
    pub fn insert_children_at(&mut self, parent: Option<NodeId>, index: usize, children: Vec<NodeId>) -> Result<usize, Error> {
        let count = children.len();
        let list = self.children_list_mut(parent)?;
        let at = index.min(list.len());
        for (i, child) in children.into_iter().enumerate() {
            list.insert(at + i, child);
        }
        Ok(count)
    }

    /// Removes the child of `parent` at `index`, returning its id.
    pub fn remove_child_at(&mut self, parent: Option<NodeId>, index: usize) -> Result<NodeId, Error> {
        let list = self.children_list_mut(parent)?;
        if index >= list.len() {
            return Err(Error::OutOfRangeCursor {
                offset: index,
                length: list.len(),
            });
        }
        Ok(list.remove(index))
    }

    /// Removes `child` from `parent`'s child list by id (§4.2 `removeChild`).
    /// Returns the index it occupied, for translating into a
    /// `SiblingEdit::Remove` when transforming pending `NodeLocation`s.
    pub fn remove_child(&mut self, parent: Option<NodeId>, child: NodeId) -> Result<usize, Error> {
        let list = self.children_list_mut(parent)?;
        let index = list.iter().position(|&id| id == child).ok_or_else(|| Error::UnknownNodeId { id: child.to_string() })?;
        list.remove(index);
        Ok(index)
    }

    /// Finds `node`'s current parent (`None` means it's a body child) and
    /// removes it from that parent's child list (§4.2 `removeNode`).
    pub fn remove_node(&mut self, node: NodeId) -> Result<(Option<NodeId>, usize), Error> {
        if let Some(index) = self.body.iter().position(|&id| id == node) {
            self.body.remove(index);
            return Ok((None, index));
        }
        let ids: Vec<NodeId> = self.arena.ids().collect();
        for id in ids {
            if let Ok(element) = self.arena.get(id) {
                if let Some(index) = element.children.iter().position(|&c| c == node) {
                    self.arena.get_mut(id)?.children.remove(index);
                    return Ok((Some(id), index));
                }
            }
        }
        Err(Error::UnknownNodeId { id: node.to_string() })
    }

    /// Removes the whole subtree rooted at `id` from the arena (it must
    /// already have been unlinked from its parent's child list).
    pub fn delete_subtree(&mut self, id: NodeId) -> Result<(), Error> {
        let node = self.arena.remove(id)?;
        for child in node.children {
            self.delete_subtree(child)?;
        }
        Ok(())
    }

    fn children_list_mut(&mut self, parent: Option<NodeId>) -> Result<&mut Vec<NodeId>, Error> {
        match parent {
            None => Ok(&mut self.body),
            Some(id) => Ok(&mut self.arena.get_mut(id)?.children),
        }
    }

    fn children_list(&self, parent: Option<NodeId>) -> Result<&[NodeId], Error> {
        match parent {
            None => Ok(&self.body),
            Some(id) => Ok(&self.arena.get(id)?.children),
        }
    }

    /// Resolves a `NodeLocation` to the id of the node it currently
    /// names, starting from the body (the title is addressed directly by
    /// `title_id()`, never through a location).
    pub fn resolve(&self, location: &NodeLocation) -> Result<NodeId, Error> {
        let mut parent: Option<NodeId> = None;
        let mut current: Option<NodeId> = None;
        for &index in location.indices() {
            let siblings = self.children_list(parent)?;
            let id = *siblings.get(index).ok_or_else(|| Error::OutOfRangeCursor {
                offset: index,
                length: siblings.len(),
            })?;
            current = Some(id);
            parent = Some(id);
        }
        current.ok_or_else(|| Error::MalformedDocument { found: 0 })
    }

    /// Serializes a node and its subtree to the wire JSON format:
    /// `{"t": type, "id": id, "attributes": {...}, "children": [...]}`,
    /// with `textContent` folded into `attributes` as a `{"ops": [...]}`
    /// Text Model when present.
    pub fn to_json(&self, id: NodeId) -> Result<Json, Error> {
        let node = self.arena.get(id)?;
        let mut obj = Map::new();
        obj.insert("t".to_string(), Json::String(node.block_type.clone()));
        obj.insert("id".to_string(), Json::String(node.id.to_string()));

        let mut attrs = Map::new();
        for (k, v) in &node.attributes {
            attrs.insert(k.clone(), attr_to_json(v));
        }
        if let Some(text) = &node.text_content {
            attrs.insert("textContent".to_string(), text_model_to_json(text));
        }
        obj.insert("attributes".to_string(), Json::Object(attrs));

        if !node.children.is_empty() {
            let children: Result<Vec<Json>, Error> = node.children.iter().map(|c| self.to_json(*c)).collect();
            obj.insert("children".to_string(), Json::Array(children?));
        }
        Ok(Json::Object(obj))
    }

    pub fn to_json_document(&self) -> Result<Json, Error> {
        let mut obj = Map::new();
        obj.insert("title".to_string(), self.to_json(self.title)?);
        let body: Result<Vec<Json>, Error> = self.body.iter().map(|c| self.to_json(*c)).collect();
        obj.insert("body".to_string(), Json::Array(body?));
        Ok(Json::Object(obj))
    }

    /// Test-only precedent for the teacher's `as_html_string`/
    /// `as_outer_html_string`: a compact, one-line-per-node rendering of
    /// the tree shape (id, block type, plain text), so tests can assert
    /// structure without hand-walking the arena.
    pub fn debug_tree(&self) -> String {
        let mut out = String::new();
        self.debug_node(self.title, 0, &mut out);
        for &id in &self.body {
            self.debug_node(id, 0, &mut out);
        }
        out
    }

    fn debug_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let Ok(block) = self.block(id) else { return };
        let text = block.text_content.as_ref().map(|t| t.plain_text()).unwrap_or_default();
        out.push_str(&"  ".repeat(depth));
        out.push_str(&format!("{id} <{}> {text:?}\n", block.block_type));
        for &child in &block.children {
            self.debug_node(child, depth + 1, out);
        }
    }
}

impl Default for BlockyDocument {
    fn default() -> Self {
        BlockyDocument::new()
    }
}

fn attr_to_json(v: &AttrValue) -> Json {
    match v {
        AttrValue::Null => Json::Null,
        AttrValue::Bool(b) => Json::Bool(*b),
        AttrValue::Number(n) => serde_json::Number::from_f64(*n).map(Json::Number).unwrap_or(Json::Null),
        AttrValue::Str(s) => Json::String(s.clone()),
        AttrValue::List(items) => Json::Array(items.iter().map(attr_to_json).collect()),
        AttrValue::Map(map) => Json::Object(map.iter().map(|(k, v)| (k.clone(), attr_to_json(v))).collect()),
        AttrValue::Text(t) => text_model_to_json(t),
    }
}

/// Inverse of `attr_to_json`. `Number`/`List`/`Map`/nested `Text` round-trip
/// structurally; a bare `{"ops": [...]}` object is recognized as a nested
/// Text Model rather than a `Map`.
pub fn attr_value_from_json(json: &Json) -> AttrValue {
    match json {
        Json::Null => AttrValue::Null,
        Json::Bool(b) => AttrValue::Bool(*b),
        Json::Number(n) => AttrValue::Number(n.as_f64().unwrap_or(0.0)),
        Json::String(s) => AttrValue::Str(s.clone()),
        Json::Array(items) => AttrValue::List(items.iter().map(attr_value_from_json).collect()),
        Json::Object(map) if map.contains_key("ops") => text_model_from_json(json).map(AttrValue::Text).unwrap_or(AttrValue::Null),
        Json::Object(map) => AttrValue::Map(map.iter().map(|(k, v)| (k.clone(), attr_value_from_json(v))).collect()),
    }
}

/// Each op is `{"insert": "text"}` or, when attributed, `{"insert": "text",
/// "attributes": {...}}` — the same shape `quill-delta`'s own JSON
/// serialization uses, so a block's `data-content` survives a round-trip
/// through an external clipboard unchanged.
fn text_model_to_json(t: &TextModel) -> Json {
    let ops: Vec<Json> = t
        .as_delta()
        .get_ops_ref()
        .iter()
        .filter_map(|op| {
            let text = op.insert_value().str_val().ok()?;
            let mut entry = Map::new();
            entry.insert("insert".to_string(), Json::String(text));
            if !op.get_attributes().is_empty() {
                let attrs: Map<String, Json> = op.get_attributes().iter().map(|(k, v)| (k.clone(), attr_val_to_json(v))).collect();
                entry.insert("attributes".to_string(), Json::Object(attrs));
            }
            Some(Json::Object(entry))
        })
        .collect();
    let mut obj = Map::new();
    obj.insert("ops".to_string(), Json::Array(ops));
    Json::Object(obj)
}

fn attr_val_to_json(v: &delta::types::attr_val::AttrVal) -> Json {
    use delta::types::attr_val::AttrVal;
    match v {
        AttrVal::Null => Json::Null,
        AttrVal::Bool(b) => Json::Bool(*b),
        AttrVal::String(s) => Json::String(s.clone()),
    }
}

fn attr_val_from_json(v: &Json) -> delta::types::attr_val::AttrVal {
    use delta::types::attr_val::AttrVal;
    match v {
        Json::Bool(b) => AttrVal::Bool(*b),
        Json::String(s) => AttrVal::String(s.clone()),
        _ => AttrVal::Null,
    }
}

/// Inverse of `text_model_to_json`: rebuilds a Text Model from `{"ops":
/// [...]}`, accepting both the attributed object form and a bare string
/// (for hand-authored fixtures).
pub fn text_model_from_json(json: &Json) -> Result<TextModel, Error> {
    let ops = json.get("ops").and_then(Json::as_array).ok_or_else(|| Error::MalformedNodeJson {
        reason: "text model JSON is missing an 'ops' array".to_string(),
    })?;
    let mut delta = delta::delta::Delta::default();
    for op in ops {
        match op {
            Json::String(s) => delta.insert(s.clone()),
            Json::Object(map) => {
                let text = map.get("insert").and_then(Json::as_str).ok_or_else(|| Error::MalformedNodeJson {
                    reason: "text model op is missing 'insert'".to_string(),
                })?;
                match map.get("attributes").and_then(Json::as_object) {
                    Some(attrs) if !attrs.is_empty() => {
                        let mut a = delta::attributes::Attributes::default();
                        for (k, v) in attrs {
                            a.insert(k.clone(), attr_val_from_json(v));
                        }
                        delta.insert_attr(text.to_string(), a);
                    }
                    _ => delta.insert(text.to_string()),
                }
            }
            other => {
                return Err(Error::MalformedNodeJson {
                    reason: format!("unexpected text model op shape: {other}"),
                })
            }
        }
    }
    TextModel::from_delta(delta)
}

/// Parses the syntactic id convention without resolving it against any
/// particular arena — used by the JSON deserializer to sanity-check ids
/// coming from an external source before trusting them.
pub fn validate_external_id(id: &str) -> Result<(), Error> {
    if is_block_id(id) {
        Ok(())
    } else {
        Err(Error::MalformedNodeJson {
            reason: format!("id '{id}' is not a recognizable block id"),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn new_document_has_an_empty_title_and_body() {
        let doc = BlockyDocument::new();
        assert!(doc.block(doc.title_id()).unwrap().text_content().unwrap().is_empty());
        assert!(doc.body().is_empty());
    }

    #[test]
    fn insert_then_resolve_round_trips() {
        let mut doc = BlockyDocument::new();
        let p = doc.allocate_block("paragraph", Attributes::new(), Some(TextModel::from_str("hi")));
        doc.insert_children_at(None, 0, vec![p]).unwrap();
        let loc = NodeLocation::from_indices(vec![0]);
        assert_eq!(doc.resolve(&loc).unwrap(), p);
    }

    #[test]
    fn remove_node_finds_its_parent_regardless_of_nesting() {
        let mut doc = BlockyDocument::new();
        let child = doc.allocate_block("paragraph", Attributes::new(), Some(TextModel::new()));
        let parent = doc.allocate_block("group", Attributes::new(), None);
        doc.block_mut(parent).unwrap().children.push(child);
        doc.insert_children_at(None, 0, vec![parent]).unwrap();

        let (found_parent, index) = doc.remove_node(child).unwrap();
        assert_eq!(found_parent, Some(parent));
        assert_eq!(index, 0);
        assert!(doc.block(parent).unwrap().children.is_empty());
    }

    #[test]
    fn delete_subtree_removes_nested_children_too() {
        let mut doc = BlockyDocument::new();
        let child = doc.allocate_block("paragraph", Attributes::new(), Some(TextModel::new()));
        let parent = doc.allocate_block("group", Attributes::new(), None);
        doc.block_mut(parent).unwrap().children.push(child);
        doc.delete_subtree(parent).unwrap();
        assert!(doc.block(child).is_err());
    }

    #[test]
    fn to_json_carries_text_content_as_ops() {
        let mut doc = BlockyDocument::new();
        let p = doc.allocate_block("paragraph", Attributes::new(), Some(TextModel::from_str("hi")));
        doc.insert_children_at(None, 0, vec![p]).unwrap();
        let json = doc.to_json(p).unwrap();
        assert_eq!(json["attributes"]["textContent"]["ops"][0], "hi");
    }
}
