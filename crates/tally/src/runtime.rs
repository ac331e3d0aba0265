// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Glue between a [`Store`] and a [`View`].

use std::cell::RefCell;
use std::fmt::{self, Debug};
use std::rc::Rc;

use crate::dom::Dom;
use crate::store::{Store, Subscription};
use crate::view::{Mountable, View};

/// A running app. Dropping it stops rendering updates, the nodes it created stay
/// in the document as they were last rendered.
#[must_use = "dropping the runtime immediately stops rendering updates"]
pub struct Runtime<S> {
    subscription: Subscription<S>,
}

impl<S> Runtime<S> {
    /// Keep rendering for as long as the store lives.
    pub fn detach(self) {
        self.subscription.detach();
    }
}

impl<S> Debug for Runtime<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("subscription", &self.subscription)
            .finish()
    }
}

/// Build the view produced by `render` for the current state, mount it in `dom`, and
/// update it synchronously after every mutation of `store`.
pub fn start<D, S, F, V>(dom: Rc<D>, store: &Store<S>, render: F) -> Runtime<S>
where
    D: Dom,
    S: 'static,
    F: Fn(&S) -> V + 'static,
    V: View<D>,
    V::Product: 'static,
{
    let product = store.with(|state| render(state).build(&*dom));

    dom.mount(product.node());

    let product = RefCell::new(product);
    let subscription = store.subscribe(move |state| {
        render(state).update(&*dom, &mut *product.borrow_mut());
    });

    Runtime { subscription }
}
