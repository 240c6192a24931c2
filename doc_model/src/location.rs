// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! `NodeLocation`: an immutable path into the node tree, and the arithmetic
//! needed to keep a previously-recorded path valid across a sibling
//! insert/delete (mirrors how `node_tree::cursor::Cursor` keeps a DOM
//! position valid across a structural edit, but expressed as plain index
//! arithmetic over an arena path instead of walking live DOM nodes).

use std::fmt;

/// A path from the document root down to a node, as a sequence of child
/// indices. `[]` denotes the root itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct NodeLocation(Vec<usize>);

impl NodeLocation {
    pub fn root() -> Self {
        NodeLocation(Vec::new())
    }

    pub fn from_indices(indices: impl Into<Vec<usize>>) -> Self {
        NodeLocation(indices.into())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn parent(&self) -> Option<NodeLocation> {
        if self.0.is_empty() {
            None
        } else {
            Some(NodeLocation(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Index of this node among its siblings, if not the root.
    pub fn sibling_index(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn child(&self, index: usize) -> NodeLocation {
        let mut v = self.0.clone();
        v.push(index);
        NodeLocation(v)
    }

    /// True if `other` names a node under the subtree rooted at `self`
    /// (or `self` itself).
    pub fn contains(&self, other: &NodeLocation) -> bool {
        other.0.len() >= self.0.len() && other.0[..self.0.len()] == self.0[..]
    }
}

impl fmt::Display for NodeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/")?;
        for (i, idx) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{idx}")?;
        }
        Ok(())
    }
}

/// The structural edit a `Changeset` op applies at `parent`: a contiguous
/// run of siblings inserted or removed starting at `at`.
#[derive(Clone, Copy, Debug)]
pub enum SiblingEdit {
    Insert { at: usize, count: usize },
    Remove { at: usize, count: usize },
}

/// Recomputes `loc` after `edit` is applied under `parent`. Locations
/// outside `parent`'s subtree, or naming a sibling strictly before the
/// edit point, are returned unchanged. A location removed by a `Remove`
/// edit (i.e. it or an ancestor of it falls inside the removed run)
/// resolves to `None` — callers must decide what a now-dangling reference
/// should fall back to (e.g. the block boundary, per the open question
/// on cross-attribute path components below).
pub fn transform(parent: &NodeLocation, edit: SiblingEdit, loc: &NodeLocation) -> Option<NodeLocation> {
    if !parent.contains(loc) || loc.depth() == parent.depth() {
        return Some(loc.clone());
    }
    let sibling_depth = parent.depth();
    let sibling_index = loc.indices()[sibling_depth];

    let new_index = match edit {
        SiblingEdit::Insert { at, count } => {
            if sibling_index >= at {
                sibling_index + count
            } else {
                sibling_index
            }
        }
        SiblingEdit::Remove { at, count } => {
            if sibling_index < at {
                sibling_index
            } else if sibling_index < at + count {
                // loc lived inside the removed run.
                return None;
            } else {
                sibling_index - count
            }
        }
    };

    let mut indices = loc.indices().to_vec();
    indices[sibling_depth] = new_index;
    Some(NodeLocation(indices))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn insert_before_shifts_later_siblings() {
        let parent = NodeLocation::root();
        let loc = NodeLocation::from_indices(vec![2]);
        let shifted = transform(&parent, SiblingEdit::Insert { at: 1, count: 2 }, &loc).unwrap();
        assert_eq!(shifted.indices(), &[4]);
    }

    #[test]
    fn insert_after_does_not_shift() {
        let parent = NodeLocation::root();
        let loc = NodeLocation::from_indices(vec![0]);
        let shifted = transform(&parent, SiblingEdit::Insert { at: 1, count: 2 }, &loc).unwrap();
        assert_eq!(shifted.indices(), &[0]);
    }

    #[test]
    fn remove_shifts_later_siblings_down() {
        let parent = NodeLocation::root();
        let loc = NodeLocation::from_indices(vec![5]);
        let shifted = transform(&parent, SiblingEdit::Remove { at: 1, count: 2 }, &loc).unwrap();
        assert_eq!(shifted.indices(), &[3]);
    }

    #[test]
    fn remove_of_the_node_itself_resolves_to_none() {
        let parent = NodeLocation::root();
        let loc = NodeLocation::from_indices(vec![1, 0]);
        let shifted = transform(&parent, SiblingEdit::Remove { at: 0, count: 2 }, &loc);
        assert!(shifted.is_none());
    }

    #[test]
    fn unrelated_subtree_is_untouched() {
        let parent = NodeLocation::from_indices(vec![0]);
        let loc = NodeLocation::from_indices(vec![1, 3]);
        let shifted = transform(&parent, SiblingEdit::Insert { at: 0, count: 5 }, &loc).unwrap();
        assert_eq!(shifted.indices(), &[1, 3]);
    }
}
