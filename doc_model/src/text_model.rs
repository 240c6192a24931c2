// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! `TextModel`: the Text Model attached to text-like blocks, wrapping a
//! normalized `delta::delta::Delta` of inserts and retain-only attribute
//! spans (no embedded deletes or retains once resolved — a Text Model is
//! the *document*, not an edit).

use delta::delta::Delta;
use delta::types::ops_kind::OpKind;

use crate::delta_ext;
use crate::error::Error;

/// A resolved, normalized text document: a run of `insert` operations,
/// each optionally attributed. `retain`/`delete` ops never appear here —
/// those only show up in the edits applied *to* a `TextModel`.
#[derive(Clone, Debug, Default)]
pub struct TextModel {
    content: Delta,
}

impl TextModel {
    pub fn new() -> Self {
        TextModel {
            content: Delta::default(),
        }
    }

    /// Builds a Text Model from a delta, rejecting retain/delete ops:
    /// a Text Model must already be in resolved document form.
    pub fn from_delta(delta: Delta) -> Result<Self, Error> {
        for op in delta.get_ops_ref() {
            if !matches!(op.get_op_kind(), OpKind::Insert(_)) {
                return Err(Error::MalformedDocument {
                    found: delta.get_ops_ref().len(),
                });
            }
        }
        Ok(TextModel { content: delta })
    }

    pub fn from_str(s: impl Into<String>) -> Self {
        let mut d = Delta::default();
        d.insert(s.into());
        TextModel { content: d }
    }

    pub fn as_delta(&self) -> &Delta {
        &self.content
    }

    pub fn len(&self) -> usize {
        delta_ext::length(&self.content)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn plain_text(&self) -> String {
        self.content
            .get_ops_ref()
            .iter()
            .filter_map(|op| op.insert_value().str_val().ok())
            .collect()
    }

    /// Applies a retain/insert/delete edit to the current content, as
    /// produced by a `textEdit` Changeset op. `edit` must fully span the
    /// current content (its retain+delete length equals `self.len()`) —
    /// this is the same contract `delta::delta::Delta::compose` expects.
    pub fn compose(&self, edit: &Delta) -> Result<TextModel, Error> {
        let composed = delta_ext::compose(&self.content, edit);
        TextModel::from_delta(composed)
    }

    /// Builds the edit that turns this model's content into `other`'s,
    /// for reconciling a DOM edit back into a textEdit op.
    pub fn diff(&self, other: &TextModel, cursor_hint: Option<usize>) -> Delta {
        delta_ext::diff(&self.content, other.as_delta(), cursor_hint)
    }

    pub fn slice(&self, start: usize, end: Option<usize>) -> TextModel {
        TextModel {
            content: delta_ext::slice(&self.content, start, end),
        }
    }

    pub fn concat(&self, other: &TextModel) -> TextModel {
        TextModel {
            content: delta_ext::concat(&self.content, &other.content),
        }
    }
}

impl PartialEq for TextModel {
    fn eq(&self, other: &Self) -> bool {
        self.plain_text() == other.plain_text()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn slice_and_concat_round_trip() {
        let model = TextModel::from_str("hello world");
        let left = model.slice(0, Some(5));
        let right = model.slice(5, None);
        assert_eq!(left.concat(&right).plain_text(), "hello world");
    }

    #[test]
    fn compose_applies_an_insert_edit() {
        let model = TextModel::from_str("hello");
        let mut edit = Delta::default();
        edit.retain(5);
        edit.insert(" world");
        let updated = model.compose(&edit).unwrap();
        assert_eq!(updated.plain_text(), "hello world");
    }

    #[test]
    fn from_delta_rejects_unresolved_ops() {
        let mut edit = Delta::default();
        edit.retain(3);
        assert!(TextModel::from_delta(edit).is_err());
    }
}
