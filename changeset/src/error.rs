// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use doc_model::NodeId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("document model error: {0}")]
    Model(#[from] doc_model::Error),
    #[error("block type {name} is not registered")]
    UnknownBlockType { name: String },
    #[error("a Changeset apply was attempted while another apply is still in progress on this State")]
    ReentrantApply,
    #[error("node {id} is not a live node in this document")]
    InvariantViolation { id: NodeId },
    #[error("clipboard HTML could not be parsed: {reason}")]
    ClipboardParseError { reason: String },
    #[error("format registry has no formatter registered under '{name}'")]
    RegistryNoSuchFormat { name: String },
}
