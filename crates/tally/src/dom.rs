// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The document a [`View`](crate::View) renders into.
//!
//! Views never talk to a concrete document directly, they go through the [`Dom`] trait.
//! Two backends are provided:
//!
//! * [`memory::MemoryDom`], a retained node tree living in Rust memory. It can be queried,
//!   clicked and serialized to HTML, which makes it useful both for tests and for
//!   front ends that paint the tree themselves.
//! * `web::WebDom` (with the `web` feature), the browser document via `web-sys`.

pub mod memory;
#[cfg(feature = "web")]
pub mod web;

/// Callback attached to a node with [`Dom::listen`].
pub type Handler = Box<dyn Fn()>;

/// DOM events views can listen to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    Click,
}

impl Event {
    /// Name of the event as used by `addEventListener`.
    pub const fn name(self) -> &'static str {
        match self {
            Event::Click => "click",
        }
    }
}

pub trait Dom: 'static {
    /// Handle to a single node in this document.
    type Node: Clone + 'static;

    fn element(&self, tag: &'static str) -> Self::Node;

    fn text(&self, text: &str) -> Self::Node;

    /// Replace the text content of a node.
    fn set_text(&self, node: &Self::Node, text: &str);

    fn set_attr(&self, node: &Self::Node, name: &'static str, value: &str);

    /// Append `child` as the last child of `parent`, moving it if it already had a parent.
    fn append(&self, parent: &Self::Node, child: &Self::Node);

    fn listen(&self, node: &Self::Node, event: Event, handler: Handler);

    /// Attach the root node of an app to the document.
    fn mount(&self, root: &Self::Node);
}
