// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Attribute name constants used in Text Model deltas. These take the
//! value `true`, or are absent; a `null` value clears the attribute
//! (§4.1).

pub const FORMAT_BOLD: &str = "bold";
pub const FORMAT_ITALIC: &str = "italic";
pub const FORMAT_UNDERLINE: &str = "underline";
pub const FORMAT_STRIKE: &str = "strike";
pub const FORMAT_SUB: &str = "subscript";
pub const FORMAT_SUP: &str = "superscript";
pub const FORMAT_DELETED: &str = "deleted";
pub const FORMAT_INSERTED: &str = "inserted";
pub const FORMAT_MARKED: &str = "marked";
pub const FORMAT_SMALL: &str = "small";

pub const TEXT_ATTR_FONT: &str = "font";
pub const TEXT_ATTR_SIZE: &str = "size";
pub const TEXT_ATTR_COLOR: &str = "color";
pub const TEXT_ATTR_BACKGROUND: &str = "background";

pub const NAME_PARAGRAPH: &str = "Text";
