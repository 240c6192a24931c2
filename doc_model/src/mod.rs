// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Block-structured document model: an arena-owned node tree
//! (`node`, `document`), the rich-text Text Model built on quill-delta-rs
//! (`text_model`, `delta_ext`), path arithmetic for keeping references
//! valid across structural edits (`location`), and selection state
//! (`cursor`).

pub mod cursor;
pub mod delta_ext;
pub mod document;
pub mod error;
pub mod location;
pub mod node;
pub mod text_model;

pub use cursor::CursorState;
pub use document::BlockyDocument;
pub use error::Error;
pub use location::NodeLocation;
pub use node::{AttrValue, Attributes, BlockDataElement, NodeId};
pub use text_model::TextModel;
