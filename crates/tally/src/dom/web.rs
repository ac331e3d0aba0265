// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Browser backend, rendering into the page `document` through `web-sys`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, UnwrapThrowExt};
use web_sys::{Document, Element, Node};

use super::{Dom, Event, Handler};
use crate::runtime::{self, Runtime};
use crate::store::Store;
use crate::View;

/// The page `document`.
///
/// DOM calls that fail here leave the page in an unknown state, so they throw
/// instead of returning errors.
pub struct WebDom {
    document: Document,
    // Dropping a `Closure` invalidates the JavaScript function bound to it.
    listeners: RefCell<Vec<Closure<dyn Fn()>>>,
}

impl WebDom {
    pub fn new() -> Self {
        let document = web_sys::window()
            .expect_throw("no global `window`")
            .document()
            .expect_throw("`window` has no `document`");

        WebDom {
            document,
            listeners: RefCell::new(Vec::new()),
        }
    }
}

impl Default for WebDom {
    fn default() -> Self {
        WebDom::new()
    }
}

impl Dom for WebDom {
    type Node = Node;

    fn element(&self, tag: &'static str) -> Node {
        self.document.create_element(tag).unwrap_throw().into()
    }

    fn text(&self, text: &str) -> Node {
        self.document.create_text_node(text).into()
    }

    fn set_text(&self, node: &Node, text: &str) {
        node.set_text_content(Some(text));
    }

    fn set_attr(&self, node: &Node, name: &'static str, value: &str) {
        node.unchecked_ref::<Element>()
            .set_attribute(name, value)
            .unwrap_throw();
    }

    fn append(&self, parent: &Node, child: &Node) {
        parent.append_child(child).unwrap_throw();
    }

    fn listen(&self, node: &Node, event: Event, handler: Handler) {
        let closure = Closure::<dyn Fn()>::wrap(handler);

        node.add_event_listener_with_callback(event.name(), closure.as_ref().unchecked_ref())
            .unwrap_throw();

        self.listeners.borrow_mut().push(closure);
    }

    fn mount(&self, root: &Node) {
        self.document
            .body()
            .expect_throw("`document` has no `<body>`")
            .append_child(root)
            .unwrap_throw();
    }
}

thread_local! {
    static INIT: Cell<bool> = const { Cell::new(false) };
}

/// Start the app by mounting the view produced by `render` in the document `body`.
///
/// The app lives for as long as the page does. Calling `start` more than once does nothing.
pub fn start<S, F, V>(store: &Store<S>, render: F)
where
    S: 'static,
    F: Fn(&S) -> V + 'static,
    V: View<WebDom>,
    V::Product: 'static,
{
    if INIT.get() {
        return;
    }
    INIT.set(true);

    init_panic_hook();

    let app: Runtime<S> = runtime::start(Rc::new(WebDom::new()), store, render);

    app.detach();
}

fn init_panic_hook() {
    // Only enable console hook on debug builds
    #[cfg(debug_assertions)]
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
}
