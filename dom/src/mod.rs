// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

// Look here: https://github.com/gbj/custom-elements
// And here too: https://dmitripavlutin.com/dom-node-element/

pub mod constants;
pub mod dom_element;
pub mod dom_text;
