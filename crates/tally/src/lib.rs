// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Tally
//!
//! _A counter, a store, and a view._
//!
//! The whole application is a single integer shown in a heading, with a `+1` and a `-1`
//! button underneath. The pieces that make it up:
//!
//! * A [`Store`](store::Store) that exclusively owns the state, exposes controlled mutations
//!   and notifies subscribers synchronously after each of them.
//! * The [`Counter`](counter::Counter) state and its [`CounterStore`](counter::CounterStore).
//! * Declarative [`View`]s that are built once and then updated in place, only touching
//!   the document where values changed.
//! * A [`Dom`](dom::Dom) abstraction with an in-memory backend and, behind the `web`
//!   feature, a browser backend.
//!
//! ### Example
//!
//! ```
//! use std::rc::Rc;
//!
//! use tally::prelude::*;
//!
//! let dom = Rc::new(MemoryDom::new());
//! let store = CounterStore::new(0);
//! let _app = tally::app::start(dom.clone(), &store);
//!
//! let plus = dom.find_by_text("button", "+1").unwrap();
//!
//! dom.click(plus);
//! dom.click(plus);
//!
//! assert_eq!(dom.text_content(dom.find("h1").unwrap()), "2");
//! ```
//!
//! ### In the browser
//!
//! With the `web` feature enabled the same component can be mounted in the page:
//!
//! ```ignore
//! use tally::prelude::*;
//!
//! #[wasm_bindgen(start)]
//! fn main() {
//!     let store = CounterStore::new(0);
//!
//!     tally::dom::web::start(store.store(), tally::app::render(&store));
//! }
//! ```

#[cfg(all(
    target_arch = "wasm32",
    feature = "rlsf",
    not(target_feature = "atomics")
))]
#[global_allocator]
static A: rlsf::SmallGlobalTlsf = rlsf::SmallGlobalTlsf::new();

pub mod app;
pub mod counter;
pub mod dom;
pub mod runtime;
pub mod store;
pub mod view;

pub use view::View;

/// The prelude module with most commonly used types.
///
/// Intended use is:
/// ```
/// use tally::prelude::*;
/// ```
pub mod prelude {
    pub use crate::counter::{Action, Counter, CounterStore};
    pub use crate::dom::memory::MemoryDom;
    pub use crate::dom::{Dom, Event};
    pub use crate::store::{Store, Subscription, Then};
    pub use crate::view::{Mountable, View};
}
