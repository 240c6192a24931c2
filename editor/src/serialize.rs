// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The `data-content` wire format (§4.4 "Paste" self-paste branch, §6
//! "Clone... with a freshly minted id"): the inverse of
//! `doc_model::document::BlockyDocument::to_json`. Parses `{"t", "id",
//! "attributes", "children"}` back into a `NewBlock` tree. The incoming
//! `id` is discarded — `NewBlock` never carries one, so the arena mints a
//! fresh id for every pasted node the moment the changeset applies.

use changeset::NewBlock;
use doc_model::document::{attr_value_from_json, text_model_from_json};
use doc_model::{Attributes, Error as ModelError};
use serde_json::Value as Json;

use crate::error::Error;

/// Parses one `to_json`-shaped object into a `NewBlock` subtree, recursing
/// into `children`. Returns `None` if `json` isn't an object with a `t`
/// field — callers treat that as "not a self-paste payload".
pub fn new_block_from_json(json: &Json) -> Result<NewBlock, Error> {
    let obj = json.as_object().ok_or_else(malformed)?;
    let block_type = obj.get("t").and_then(Json::as_str).ok_or_else(malformed)?.to_string();

    let mut attributes: Attributes = Attributes::new();
    let mut text_content = None;
    if let Some(attrs) = obj.get("attributes").and_then(Json::as_object) {
        for (k, v) in attrs {
            if k == "textContent" {
                text_content = Some(text_model_from_json(v)?);
            } else {
                attributes.insert(k.clone(), attr_value_from_json(v));
            }
        }
    }

    let children = match obj.get("children").and_then(Json::as_array) {
        Some(items) => items.iter().map(new_block_from_json).collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let mut block = NewBlock::new(block_type).with_attributes(attributes).with_children(children);
    if let Some(text) = text_content {
        block = block.with_text(text);
    }
    Ok(block)
}

pub fn parse(raw: &str) -> Result<NewBlock, Error> {
    let json: Json = serde_json::from_str(raw).map_err(|_| malformed_err())?;
    new_block_from_json(&json)
}

fn malformed() -> ModelError {
    ModelError::MalformedNodeJson {
        reason: "data-content JSON is not a recognizable node object".to_string(),
    }
}

fn malformed_err() -> Error {
    Error::Model(malformed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::document::BlockyDocument;
    use doc_model::TextModel;

    #[test]
    fn round_trips_through_new_block() {
        let mut doc = BlockyDocument::new();
        let id = doc.allocate_block("paragraph", Attributes::new(), Some(TextModel::from_str("hi")));
        doc.insert_children_at(None, 0, vec![id]).unwrap();
        let json = doc.to_json(id).unwrap();
        let block = new_block_from_json(&json).unwrap();
        assert_eq!(block.block_type, "paragraph");
        assert_eq!(block.text_content.unwrap().plain_text(), "hi");
    }

    #[test]
    fn rejects_non_object_payload() {
        assert!(parse("\"just a string\"").is_err());
    }
}
