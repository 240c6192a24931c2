// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Operational-transform helpers for [`delta::delta::Delta`].
//!
//! `delta` (quill-delta-rs) gives us the operation primitives (`insert`,
//! `retain`, `delete`, boundary-op merging via `push`) but stops short of
//! `compose`/`diff`/`slice`/`concat` over whole documents, since the
//! original port applies operations straight onto a live DOM tree instead
//! of composing a separate document delta. The Text Model needs the
//! document-algebra form, so this module builds it on top of `delta`'s
//! operation type.

use delta::attributes::Attributes;
use delta::delta::Delta;
use delta::operations::DeltaOperation;
use delta::types::attr_val::AttrVal;
use delta::types::ops_kind::OpKind;

/// Total length of the insert operations in `delta`.
pub fn length(delta: &Delta) -> usize {
    delta
        .get_ops_ref()
        .iter()
        .filter(|op| matches!(op.get_op_kind(), OpKind::Insert(_)))
        .map(|op| op.op_len())
        .sum()
}

/// Net change in document length this delta would cause when applied:
/// sum of insert lengths minus sum of delete lengths.
pub fn change_length(delta: &Delta) -> i64 {
    delta
        .get_ops_ref()
        .iter()
        .map(|op| match op.get_op_kind() {
            OpKind::Insert(_) => op.op_len() as i64,
            OpKind::Delete(len) => -(len as i64),
            OpKind::Retain(_) => 0,
        })
        .sum()
}

/// A cursor over a delta's operations that can be advanced by an arbitrary
/// number of characters, splitting an operation at a boundary when needed.
struct OpCursor<'a> {
    ops: &'a [DeltaOperation],
    index: usize,
    /// characters of `ops[index]` already consumed
    offset: usize,
}

impl<'a> OpCursor<'a> {
    fn new(ops: &'a [DeltaOperation]) -> Self {
        OpCursor {
            ops,
            index: 0,
            offset: 0,
        }
    }

    fn peek_len(&self) -> usize {
        self.ops
            .get(self.index)
            .map(|op| op.op_len() - self.offset)
            .unwrap_or(0)
    }

    fn peek_kind(&self) -> Option<&OpKind> {
        self.ops.get(self.index).map(|op| op.get_op_kind())
    }

    fn has_next(&self) -> bool {
        self.index < self.ops.len()
    }

    /// Consume up to `max_len` characters of the current operation (or the
    /// whole remainder of it if `max_len` is `None`) and return the slice
    /// as a standalone `DeltaOperation`.
    fn next(&mut self, max_len: Option<usize>) -> DeltaOperation {
        let op = &self.ops[self.index];
        let remaining = op.op_len() - self.offset;
        let take = max_len.unwrap_or(remaining).min(remaining);
        let sliced = slice_op(op, self.offset, take);
        self.offset += take;
        if self.offset >= op.op_len() {
            self.index += 1;
            self.offset = 0;
        }
        sliced
    }
}

fn slice_op(op: &DeltaOperation, start: usize, len: usize) -> DeltaOperation {
    if start == 0 && len == op.op_len() {
        return op.clone();
    }
    match op.get_op_kind() {
        OpKind::Delete(_) => DeltaOperation::delete(len),
        OpKind::Retain(_) => {
            let mut r = DeltaOperation::retain(len);
            r.set_attributes(op.get_attributes().clone());
            r
        }
        OpKind::Insert(_) => {
            let text = op
                .insert_value()
                .str_val()
                .expect("embed inserts are not sliceable; split before slicing");
            let sub: String = text.chars().skip(start).take(len).collect();
            let mut i = DeltaOperation::insert(sub);
            i.set_attributes(op.get_attributes().clone());
            i
        }
    }
}

/// Returns the `[start, end)` sub-range of `delta`, measured in Delta space
/// (insert lengths only). `end = None` means "to the end".
pub fn slice(delta: &Delta, start: usize, end: Option<usize>) -> Delta {
    let end = end.unwrap_or(usize::MAX);
    let mut out = Delta::default();
    let mut cursor = OpCursor::new(delta.get_ops_ref());
    let mut consumed = 0usize;

    while consumed < end && cursor.has_next() {
        if consumed < start {
            let skip = (start - consumed).min(cursor.peek_len());
            cursor.next(Some(skip));
            consumed += skip;
        } else {
            let take = (end - consumed).min(cursor.peek_len());
            let op = cursor.next(Some(take));
            consumed += take;
            out.push(op);
        }
    }
    out
}

/// Appends `other` after `self`, merging a boundary-adjacent pair of
/// compatible ops the way `Delta::push` already merges adjacent ops.
pub fn concat(this: &Delta, other: &Delta) -> Delta {
    let mut out = this.clone();
    for op in other.get_ops_ref() {
        out.push(op.clone());
    }
    out
}

fn compose_attrs(base: Option<&Attributes>, applied: Option<&Attributes>, keep_null: bool) -> Attributes {
    let mut result = base.cloned().unwrap_or_default();
    if let Some(applied) = applied {
        for (k, v) in applied.iter() {
            if *v == AttrVal::Null && !keep_null {
                result.remove(k);
            } else {
                result.insert(k.clone(), v.clone());
            }
        }
    }
    result
}

/// Standard OT composition: the delta that applying `other` to the document
/// produced by `this` is equivalent to applying directly.
pub fn compose(this: &Delta, other: &Delta) -> Delta {
    let mut this_cur = OpCursor::new(this.get_ops_ref());
    let mut other_cur = OpCursor::new(other.get_ops_ref());
    let mut result = Delta::default();

    // Leading retain-without-attributes in `other` just keeps a prefix of
    // `this`'s inserts untouched.
    if let Some(OpKind::Retain(len)) = other_cur.peek_kind() {
        if other.get_ops_ref()[other_cur.index].get_attributes().is_empty() {
            let mut remaining = *len;
            while matches!(this_cur.peek_kind(), Some(OpKind::Insert(_))) && this_cur.peek_len() <= remaining
            {
                remaining -= this_cur.peek_len();
                result.push(this_cur.next(None));
            }
            if *len - remaining > 0 {
                other_cur.next(Some(len - remaining));
            }
        }
    }

    while this_cur.has_next() || other_cur.has_next() {
        match (this_cur.peek_kind(), other_cur.peek_kind()) {
            (_, Some(OpKind::Insert(_))) => {
                result.push(other_cur.next(None));
            }
            (Some(OpKind::Delete(_)), _) => {
                result.push(this_cur.next(None));
            }
            (None, None) => break,
            _ => {
                let len = this_cur.peek_len().min(other_cur.peek_len());
                let this_op = this_cur.next(Some(len));
                let other_op = other_cur.next(Some(len));
                match other_op.get_op_kind() {
                    OpKind::Delete(_) => {
                        if !matches!(this_op.get_op_kind(), OpKind::Delete(_)) {
                            result.push(DeltaOperation::delete(len));
                        }
                    }
                    OpKind::Retain(_) => {
                        // Composing onto an Insert resolves content: a
                        // `null` in `other` clears the key outright. Onto a
                        // Retain the result is still a pending edit, where
                        // `null` must survive to later clear the key when
                        // this edit is itself composed onto resolved
                        // content (see cited grounding in DESIGN.md).
                        let keep_null = matches!(this_op.get_op_kind(), OpKind::Retain(_));
                        let merged_attrs = compose_attrs(Some(this_op.get_attributes()), Some(other_op.get_attributes()), keep_null);
                        match this_op.get_op_kind() {
                            OpKind::Insert(_) => {
                                let text = this_op.insert_value().str_val().unwrap_or_default();
                                let mut op = DeltaOperation::insert(text);
                                op.set_attributes(merged_attrs);
                                result.push(op);
                            }
                            _ => {
                                let mut op = DeltaOperation::retain(len);
                                op.set_attributes(merged_attrs);
                                result.push(op);
                            }
                        }
                    }
                    OpKind::Insert(_) => unreachable!("insert handled above"),
                }
            }
        }
    }
    result.chop();
    result
}

/// Minimal prefix/suffix diff between two document deltas, producing a
/// `retain/insert/delete` delta that transforms `this` into `other`.
///
/// This is not a general Myers diff: the intended caller is the input
/// reconciler, which re-diffs a single text-like block after one local
/// contenteditable edit, so the edit region is always contiguous. When the
/// common prefix and suffix overlap (e.g. typing the same character
/// repeatedly) `offset_hint` (typically the caret offset before the edit)
/// biases where the split falls.
pub fn diff(this: &Delta, other: &Delta, offset_hint: Option<usize>) -> Delta {
    let a = plain_text(this);
    let b = plain_text(other);
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let mut prefix = 0;
    while prefix < a_chars.len() && prefix < b_chars.len() && a_chars[prefix] == b_chars[prefix] {
        prefix += 1;
    }

    let mut suffix = 0;
    while suffix < a_chars.len() - prefix
        && suffix < b_chars.len() - prefix
        && a_chars[a_chars.len() - 1 - suffix] == b_chars[b_chars.len() - 1 - suffix]
    {
        suffix += 1;
    }

    // If prefix/suffix overlap, the split point is ambiguous; bias it
    // toward the hinted offset so the caret lands where the user expects.
    if prefix + suffix > a_chars.len().min(b_chars.len()) {
        let max_prefix = a_chars.len().min(b_chars.len());
        if let Some(hint) = offset_hint {
            prefix = hint.min(max_prefix);
        } else {
            prefix = max_prefix.saturating_sub(suffix).min(prefix);
        }
        suffix = max_prefix - prefix;
    }

    let deleted = a_chars.len() - prefix - suffix;
    let inserted: String = b_chars[prefix..b_chars.len() - suffix].iter().collect();

    let mut out = Delta::default();
    out.retain(prefix);
    if !inserted.is_empty() {
        out.insert(inserted);
    }
    if deleted > 0 {
        out.delete(deleted);
    }
    out.retain(suffix);
    out.chop();
    out
}

/// Builds the retain-only edit that toggles `attr_name` over
/// `[start, end)` of `content` (§4.1 attribute semantics): if every
/// insert op already covering the range carries `attr_name == on`, the
/// edit sets it to `Null` (clearing it); otherwise the edit sets it to
/// `on`. Used by `formatTextOnCursor`/`formatTextOnSelectedText`.
pub fn toggle_format_edit(content: &Delta, start: usize, end: usize, attr_name: &str, on: AttrVal) -> Delta {
    let range = slice(content, start, end.max(start).min(length(content)));
    let already_set = range.get_ops_ref().iter().all(|op| {
        matches!(op.get_op_kind(), OpKind::Insert(_)) && op.get_attributes().get(attr_name) == Some(&on)
    }) && !range.get_ops_ref().is_empty();

    let value = if already_set { AttrVal::Null } else { on };

    let mut edit = Delta::default();
    edit.retain(start);
    let mut attrs = Attributes::default();
    attrs.insert(attr_name.to_string(), value);
    edit.retain_attr(end.saturating_sub(start), attrs);
    edit
}

/// Plain-text projection of a document delta (embeds contribute nothing;
/// they are out of scope for character-level diffing).
fn plain_text(delta: &Delta) -> String {
    let mut s = String::new();
    for op in delta.get_ops_ref() {
        if let OpKind::Insert(_) = op.get_op_kind() {
            if let Ok(text) = op.insert_value().str_val() {
                s.push_str(&text);
            }
        }
    }
    s
}

#[cfg(test)]
mod test {
    use super::*;

    fn doc(s: &str) -> Delta {
        let mut d = Delta::default();
        d.insert(s);
        d
    }

    #[test]
    fn length_counts_inserts_only() {
        let mut d = Delta::default();
        d.insert("hello");
        d.retain(3);
        d.delete(2);
        assert_eq!(length(&d), 5);
        assert_eq!(change_length(&d), 3);
    }

    #[test]
    fn slice_extracts_substring() {
        let d = doc("hello world");
        let s = slice(&d, 0, Some(5));
        assert_eq!(plain_text(&s), "hello");
        let s = slice(&d, 6, None);
        assert_eq!(plain_text(&s), "world");
    }

    #[test]
    fn diff_then_compose_round_trips() {
        let a = doc("hello world");
        let b = doc("hello brave world");
        let edit = diff(&a, &b, Some(6));
        let composed = compose(&a, &edit);
        assert_eq!(plain_text(&composed), plain_text(&b));
    }

    #[test]
    fn diff_pure_insert_at_cursor() {
        let a = doc("Hi");
        let b = doc("Hi!");
        let edit = diff(&a, &b, Some(2));
        let composed = compose(&a, &edit);
        assert_eq!(plain_text(&composed), "Hi!");
    }

    #[test]
    fn toggle_format_sets_then_clears() {
        let d = doc("hello world");
        let edit = toggle_format_edit(&d, 2, 5, "bold", AttrVal::Bool(true));
        let bolded = compose(&d, &edit);
        let bold_attrs = bolded.get_ops_ref()[1].get_attributes();
        assert_eq!(bold_attrs.get("bold"), Some(&AttrVal::Bool(true)));

        let edit2 = toggle_format_edit(&bolded, 2, 5, "bold", AttrVal::Bool(true));
        let cleared = compose(&bolded, &edit2);
        assert_eq!(plain_text(&cleared), "hello world");
        // A cleared attribute must be absent from the resolved content's
        // attribute map, not merely non-true: a leftover `Some(&AttrVal::
        // Null)` would satisfy the weaker `!= Some(&AttrVal::Bool(true))`.
        assert!(cleared.get_ops_ref().iter().all(|op| op.get_attributes().get("bold").is_none()));
    }

    #[test]
    fn compose_onto_insert_drops_null_attribute_key_entirely() {
        let d = doc("hi");
        let mut bold = Attributes::default();
        bold.insert("bold".to_string(), AttrVal::Bool(true));
        let mut with_bold = Delta::default();
        with_bold.insert_attr("hi", bold);
        let resolved = compose(&d, &with_bold);

        let mut clear = Delta::default();
        let mut null_attrs = Attributes::default();
        null_attrs.insert("bold".to_string(), AttrVal::Null);
        clear.retain_attr(2, null_attrs);
        let cleared = compose(&resolved, &clear);

        assert!(cleared.get_ops_ref()[0].get_attributes().get("bold").is_none());
    }
}
