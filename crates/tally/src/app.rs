// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The counter component: a heading showing the value and two buttons changing it.
//!
//! ```html
//! <main>
//!     <h1 style="margin-bottom: 20px">0</h1>
//!     <div style="display: flex; gap: 20px; justify-content: center">
//!         <button>+1</button>
//!         <button>-1</button>
//!     </div>
//! </main>
//! ```

use std::rc::Rc;

use crate::counter::{Action, Counter, CounterStore, WeakCounterStore};
use crate::dom::{Dom, Event};
use crate::runtime::{self, Runtime};
use crate::view::{Mountable, ValueProduct, View};

pub const HEADING_STYLE: &str = "margin-bottom: 20px";
pub const CONTROLS_STYLE: &str = "display: flex; gap: 20px; justify-content: center";

/// Render the counter held by `store`.
pub fn counter(value: i64, store: &CounterStore) -> CounterView {
    CounterView {
        value,
        store: store.downgrade(),
    }
}

/// Render function to hand to a runtime observing `store`.
///
/// The store owns its observers, so the views only hold it weakly.
pub fn render(store: &CounterStore) -> impl Fn(&Counter) -> CounterView + 'static {
    let store = store.downgrade();

    move |state: &Counter| CounterView {
        value: state.value,
        store: store.clone(),
    }
}

pub struct CounterView {
    value: i64,
    store: WeakCounterStore,
}

pub struct CounterProduct<D: Dom> {
    root: D::Node,
    value: ValueProduct<D, i64>,
    increment: D::Node,
    decrement: D::Node,
}

impl<D: Dom> CounterProduct<D> {
    /// The heading text node showing the value.
    pub fn value(&self) -> &D::Node {
        self.value.node()
    }

    /// The button dispatching `action`.
    pub fn button(&self, action: Action) -> &D::Node {
        match action {
            Action::Increment => &self.increment,
            Action::Decrement => &self.decrement,
        }
    }
}

impl<D: Dom> Mountable<D> for CounterProduct<D> {
    fn node(&self) -> &D::Node {
        &self.root
    }
}

impl<D: Dom> View<D> for CounterView {
    type Product = CounterProduct<D>;

    fn build(self, dom: &D) -> Self::Product {
        let root = dom.element("main");
        let heading = dom.element("h1");
        let controls = dom.element("div");

        let value = self.value.build(dom);
        let increment = button(dom, &self.store, Action::Increment);
        let decrement = button(dom, &self.store, Action::Decrement);

        dom.set_attr(&heading, "style", HEADING_STYLE);
        dom.set_attr(&controls, "style", CONTROLS_STYLE);

        dom.append(&heading, value.node());
        dom.append(&controls, &increment);
        dom.append(&controls, &decrement);
        dom.append(&root, &heading);
        dom.append(&root, &controls);

        CounterProduct {
            root,
            value,
            increment,
            decrement,
        }
    }

    fn update(self, dom: &D, p: &mut Self::Product) {
        self.value.update(dom, &mut p.value);
    }
}

fn button<D: Dom>(dom: &D, store: &WeakCounterStore, action: Action) -> D::Node {
    let button = dom.element("button");
    let label = dom.text(action.label());
    let store = store.clone();

    dom.append(&button, &label);
    dom.listen(&button, Event::Click, Box::new(move || store.dispatch(action)));

    button
}

/// Mount the counter component in `dom`, re-rendering on every change of `store`.
pub fn start<D: Dom>(dom: Rc<D>, store: &CounterStore) -> Runtime<Counter> {
    runtime::start(dom, store.store(), render(store))
}
