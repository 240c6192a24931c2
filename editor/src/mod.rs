// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

/// # editor
///
/// The DOM-facing half of the block-structured rich-text core: the
/// `Controller` (§4.5, the stable public façade over `changeset::State`),
/// the `Editor` (§4.4, the DOM projector and event dispatcher it drives),
/// the `Block`/`PasteCapable` runtime contract a plugin's mounted
/// instance implements, and the `data-content` serialization format used
/// by copy/paste and persistence.
pub mod block_trait;
pub mod controller;
pub mod error;
pub mod registry;
pub mod serialize;
pub mod view;

pub use controller::{Controller, ControllerOptions};
pub use error::Error;
pub use view::{Editor, EditorMode};

use cfg_if::cfg_if;
extern crate web_sys;
use log::Level;

// When the `console_error_panic_hook` feature is enabled, we can call the
// `set_panic_hook` function at least once during initialization, and then
// we will get better error messages if our code ever panics.
//
// For more details see
// https://github.com/rustwasm/console_error_panic_hook#readme
cfg_if! {
    if #[cfg(feature = "console_error_panic_hook")] {
        extern crate console_error_panic_hook;
        pub use self::console_error_panic_hook::set_once as set_panic_hook;
    } else {
        #[inline]
        pub fn set_panic_hook() {}
    }
}

// When the `console_log` feature is enabled, forward log calls to the
// JS console.
cfg_if! {
    if #[cfg(feature = "console_log")] {
        pub fn init_log(level: Level) {
            // Best effort, ignore error if initialization fails.
            let _ = console_log::init_with_level(level);
        }
    } else {
        pub fn init_log(_level: Level) {}
    }
}
