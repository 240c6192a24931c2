// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use doc_model::NodeId;
use thiserror::Error;

/// §7 Error Handling Design, the `editor`-local half: the view/controller
/// variants on top of `doc_model::Error` and `changeset::Error`, which are
/// wrapped rather than duplicated.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Model(#[from] doc_model::Error),

    #[error(transparent)]
    Changeset(#[from] changeset::Error),

    #[error("invariant violation: the DOM and model disagree on block {id}")]
    InvariantViolation { id: NodeId },

    #[error("paste refers to unregistered block type {name}")]
    UnknownBlockType { name: String },

    #[error("could not parse clipboard HTML: {reason}")]
    ClipboardParseError { reason: String },

    #[error("paste failed: {reason}")]
    PasteFailed { reason: String },

    #[error("block {id} is not mounted in the DOM map")]
    BlockNotMounted { id: NodeId },

    #[error("editor is not open for edit")]
    NotOpenForEdit,
}
