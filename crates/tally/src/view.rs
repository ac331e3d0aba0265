// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Declarative views
//!
//! A [`View`] is a transient description of some UI. It is [built](View::build) once into
//! a _product_ holding the [`Dom`] nodes it created, and on every subsequent render the new
//! description [updates](View::update) that product in place. Views compare against what
//! they rendered last time and only touch the document when something actually changed.

use crate::dom::Dom;

/// Trait that describes types that can be rendered in a [`Dom`].
pub trait View<D: Dom> {
    /// The product should contain a reference to the root node of this View and
    /// any data it needs to update itself.
    type Product: Mountable<D>;

    /// Build a product that can be mounted in the document from this type.
    fn build(self, dom: &D) -> Self::Product;

    /// Update the product and apply changes to the document if necessary.
    fn update(self, dom: &D, p: &mut Self::Product);
}

/// A built view that can be attached to the document.
pub trait Mountable<D: Dom> {
    fn node(&self) -> &D::Node;
}

/// Product of primitive values rendered as text.
pub struct ValueProduct<D: Dom, T> {
    node: D::Node,
    memo: T,
}

impl<D: Dom, T> Mountable<D> for ValueProduct<D, T> {
    fn node(&self) -> &D::Node {
        &self.node
    }
}

macro_rules! impl_int_view {
    ($($ty:ty),*) => {
        $(
            impl<D: Dom> View<D> for $ty {
                type Product = ValueProduct<D, $ty>;

                fn build(self, dom: &D) -> Self::Product {
                    let node = dom.text(itoa::Buffer::new().format(self));

                    ValueProduct { node, memo: self }
                }

                fn update(self, dom: &D, p: &mut Self::Product) {
                    if p.memo != self {
                        p.memo = self;
                        dom.set_text(&p.node, itoa::Buffer::new().format(self));
                    }
                }
            }

            impl<D: Dom> View<D> for &$ty {
                type Product = ValueProduct<D, $ty>;

                fn build(self, dom: &D) -> Self::Product {
                    (*self).build(dom)
                }

                fn update(self, dom: &D, p: &mut Self::Product) {
                    (*self).update(dom, p)
                }
            }
        )*
    };
}

impl_int_view!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Product of a static string, which never changes after the first render.
pub struct StaticProduct<D: Dom> {
    node: D::Node,
}

impl<D: Dom> Mountable<D> for StaticProduct<D> {
    fn node(&self) -> &D::Node {
        &self.node
    }
}

impl<D: Dom> View<D> for &'static str {
    type Product = StaticProduct<D>;

    fn build(self, dom: &D) -> Self::Product {
        StaticProduct {
            node: dom.text(self),
        }
    }

    fn update(self, _: &D, _: &mut Self::Product) {}
}
