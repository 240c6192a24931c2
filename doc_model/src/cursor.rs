// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! `CursorState`: a collapsed caret or an open (non-empty) selection,
//! addressed by block id and character offset rather than by a DOM
//! `(Node, Node)` pair the way `node_tree::cursor::Cursor` does it. The
//! teacher's `Cursor` also walks next/prev DOM nodes one character at a
//! time to compute a selection's length (`Cursor::selection_length`);
//! here that walk becomes `split_cursor_state_by_blocks`, which only
//! needs to walk block-sized steps because block boundaries are known
//! from the arena instead of discovered by DOM traversal.

use crate::document::BlockyDocument;
use crate::error::Error;
use crate::node::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorState {
    Collapsed { id: NodeId, offset: usize },
    Open {
        start_id: NodeId,
        start_offset: usize,
        end_id: NodeId,
        end_offset: usize,
    },
}

impl CursorState {
    pub fn collapsed(id: NodeId, offset: usize) -> Self {
        CursorState::Collapsed { id, offset }
    }

    pub fn open(start_id: NodeId, start_offset: usize, end_id: NodeId, end_offset: usize) -> Self {
        if start_id == end_id && start_offset == end_offset {
            CursorState::Collapsed { id: start_id, offset: start_offset }
        } else {
            CursorState::Open { start_id, start_offset, end_id, end_offset }
        }
    }

    pub fn is_collapsed(&self) -> bool {
        matches!(self, CursorState::Collapsed { .. })
    }

    /// The block the caret (or selection start) is in.
    pub fn anchor_block(&self) -> NodeId {
        match self {
            CursorState::Collapsed { id, .. } => *id,
            CursorState::Open { start_id, .. } => *start_id,
        }
    }

    pub fn collapse_to_start(&self) -> CursorState {
        match self {
            CursorState::Collapsed { .. } => *self,
            CursorState::Open { start_id, start_offset, .. } => CursorState::Collapsed {
                id: *start_id,
                offset: *start_offset,
            },
        }
    }
}

/// One block's worth of a (possibly multi-block) selection: the offset
/// range `[start, end)` within `block`'s Text Model that the overall
/// selection covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockRange {
    pub block: NodeId,
    pub start: usize,
    pub end: usize,
}

/// Pre-order list of text-like blocks in document order, the traversal
/// order block-spanning selection math is defined over.
fn linear_text_blocks(doc: &BlockyDocument, ids: &[NodeId], out: &mut Vec<NodeId>) -> Result<(), Error> {
    for &id in ids {
        let block = doc.block(id)?;
        if block.is_text_like() {
            out.push(id);
        }
        linear_text_blocks(doc, &block.children.clone(), out)?;
    }
    Ok(())
}

/// Splits an (possibly multi-block) `CursorState::Open` selection into
/// per-block ranges in document order: the start block from
/// `start_offset` to its end, every fully-covered block in between (the
/// full `0..len` range), and the end block from `0` to `end_offset`. A
/// collapsed cursor yields a single zero-length range.
pub fn split_cursor_state_by_blocks(doc: &BlockyDocument, cursor: &CursorState) -> Result<Vec<BlockRange>, Error> {
    match cursor {
        CursorState::Collapsed { id, offset } => Ok(vec![BlockRange {
            block: *id,
            start: *offset,
            end: *offset,
        }]),
        CursorState::Open {
            start_id,
            start_offset,
            end_id,
            end_offset,
        } => {
            let mut order = Vec::new();
            linear_text_blocks(doc, doc.body(), &mut order)?;

            let start_pos = order
                .iter()
                .position(|id| id == start_id)
                .ok_or_else(|| Error::UnknownNodeId { id: start_id.to_string() })?;
            let end_pos = order
                .iter()
                .position(|id| id == end_id)
                .ok_or_else(|| Error::UnknownNodeId { id: end_id.to_string() })?;
            let (lo, hi, lo_off, hi_off) = if start_pos <= end_pos {
                (start_pos, end_pos, *start_offset, *end_offset)
            } else {
                (end_pos, start_pos, *end_offset, *start_offset)
            };

            let mut ranges = Vec::new();
            for (i, &id) in order.iter().enumerate().take(hi + 1).skip(lo) {
                let len = doc.block(id)?.text_content()?.len();
                let start = if i == lo { lo_off } else { 0 };
                let end = if i == hi { hi_off } else { len };
                ranges.push(BlockRange { block: id, start, end });
            }
            Ok(ranges)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::node::Attributes;
    use crate::text_model::TextModel;

    fn sample_doc() -> (BlockyDocument, NodeId, NodeId, NodeId) {
        let mut doc = BlockyDocument::new();
        let a = doc.allocate_block("paragraph", Attributes::new(), Some(TextModel::from_str("hello")));
        let b = doc.allocate_block("paragraph", Attributes::new(), Some(TextModel::from_str("world")));
        let c = doc.allocate_block("paragraph", Attributes::new(), Some(TextModel::from_str("!")));
        doc.insert_children_at(None, 0, vec![a, b, c]).unwrap();
        (doc, a, b, c)
    }

    #[test]
    fn collapsed_cursor_yields_a_single_zero_length_range() {
        let (doc, a, _, _) = sample_doc();
        let cursor = CursorState::collapsed(a, 2);
        let ranges = split_cursor_state_by_blocks(&doc, &cursor).unwrap();
        assert_eq!(ranges, vec![BlockRange { block: a, start: 2, end: 2 }]);
    }

    #[test]
    fn open_selection_across_three_blocks_splits_per_block() {
        let (doc, a, b, c) = sample_doc();
        let cursor = CursorState::open(a, 3, c, 1);
        let ranges = split_cursor_state_by_blocks(&doc, &cursor).unwrap();
        assert_eq!(
            ranges,
            vec![
                BlockRange { block: a, start: 3, end: 5 },
                BlockRange { block: b, start: 0, end: 5 },
                BlockRange { block: c, start: 0, end: 1 },
            ]
        );
    }

    #[test]
    fn reversed_selection_normalizes_to_document_order() {
        let (doc, a, _, c) = sample_doc();
        let forward = split_cursor_state_by_blocks(&doc, &CursorState::open(a, 1, c, 1)).unwrap();
        let backward = split_cursor_state_by_blocks(&doc, &CursorState::open(c, 1, a, 1)).unwrap();
        assert_eq!(forward, backward);
    }

    #[test]
    fn identical_start_and_end_collapses() {
        let (_, a, _, _) = sample_doc();
        let cursor = CursorState::open(a, 2, a, 2);
        assert!(cursor.is_collapsed());
    }
}
