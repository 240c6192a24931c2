// Copyright 2024 quill-core-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Single-producer multicast streams (`newBlockCreated`, `blockWillDelete`,
//! `cursorStateChanged`, `changesetApplied`, §9 Design Notes): plain
//! observer lists with deterministic, enqueue-order emission. A
//! subscriber added while `emit` is iterating is appended to the list but
//! does not receive the event currently being emitted — `emit` snapshots
//! the subscriber count up front.

pub struct Stream<T> {
    subscribers: Vec<Box<dyn FnMut(&T)>>,
}

impl<T> Stream<T> {
    pub fn new() -> Self {
        Stream { subscribers: Vec::new() }
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&T) + 'static) {
        self.subscribers.push(Box::new(handler));
    }

    pub fn emit(&mut self, value: T) {
        let n = self.subscribers.len();
        for handler in self.subscribers.iter_mut().take(n) {
            handler(&value);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T> Default for Stream<T> {
    fn default() -> Self {
        Stream::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn subscribers_are_called_in_enqueue_order() {
        let mut stream: Stream<i32> = Stream::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_a = seen.clone();
        stream.subscribe(move |v| seen_a.borrow_mut().push(("a", *v)));
        let seen_b = seen.clone();
        stream.subscribe(move |v| seen_b.borrow_mut().push(("b", *v)));

        stream.emit(1);
        assert_eq!(*seen.borrow(), vec![("a", 1), ("b", 1)]);
    }

    #[test]
    fn subscriber_added_during_emit_does_not_see_current_event() {
        let mut stream: Stream<i32> = Stream::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let count = Rc::new(RefCell::new(0));

        let count_for_closure = count.clone();
        stream.subscribe(move |_| {
            *count_for_closure.borrow_mut() += 1;
        });
        stream.emit(1);
        let seen_late = seen.clone();
        stream.subscribe(move |v| seen_late.borrow_mut().push(*v));
        stream.emit(2);
        assert_eq!(*seen.borrow(), vec![2]);
        assert_eq!(*count.borrow(), 2);
    }
}
