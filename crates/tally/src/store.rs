// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Centralized state with change notification
//!
//! A [`Store`] is the sole owner of some state `S`. Everyone else holds a cheap
//! clone of the handle and can read the state, mutate it through [`Store::update`],
//! or [`subscribe`](Store::subscribe) to be told after every mutation.
//!
//! ```
//! use tally::store::{Store, Then};
//!
//! let store = Store::new(0_i32);
//! let sub = store.subscribe(|count| println!("count is now {count}"));
//!
//! // notifies observers
//! store.update(|count| *count += 1);
//!
//! // only notifies observers if the count was below 10
//! store.update(|count| {
//!     if *count < 10 {
//!         *count += 1;
//!         Then::Render
//!     } else {
//!         Then::Stop
//!     }
//! });
//!
//! assert_eq!(store.get(), 2);
//! drop(sub);
//! ```
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt::{self, Debug};
use std::rc::{Rc, Weak};

/// Describes whether or not observers should be notified after a mutation.
/// For uses see [`Store::update`].
pub trait ShouldRender: 'static {
    fn should_render(self) -> bool;
}

/// Closures without return type always notify.
impl ShouldRender for () {
    fn should_render(self) -> bool {
        true
    }
}

/// An enum that implements the [`ShouldRender`] trait.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Then {
    /// This is a silent update
    Stop,
    /// Notify observers after this update
    Render,
}

impl ShouldRender for Then {
    fn should_render(self) -> bool {
        match self {
            Then::Stop => false,
            Then::Render => true,
        }
    }
}

impl ShouldRender for bool {
    fn should_render(self) -> bool {
        self
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(transparent)]
struct ObserverId(u32);

type Observer<S> = Rc<dyn Fn(&S)>;

type Deferred<S> = Box<dyn FnOnce(&mut S) -> bool>;

struct Inner<S> {
    state: RefCell<S>,
    observers: RefCell<Vec<(ObserverId, Observer<S>)>>,
    next_id: Cell<u32>,
    deferred: RefCell<VecDeque<Deferred<S>>>,
    notifying: Cell<bool>,
}

impl<S> Inner<S> {
    fn is_subscribed(&self, id: ObserverId) -> bool {
        self.observers.borrow().iter().any(|(oid, _)| *oid == id)
    }
}

/// Shared handle to some state `S`. Cloning the handle does not clone the state.
pub struct Store<S> {
    inner: Rc<Inner<S>>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Store {
            inner: self.inner.clone(),
        }
    }
}

impl<S> Store<S>
where
    S: 'static,
{
    pub fn new(state: S) -> Self {
        Store {
            inner: Rc::new(Inner {
                state: RefCell::new(state),
                observers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                deferred: RefCell::new(VecDeque::new()),
                notifying: Cell::new(false),
            }),
        }
    }

    /// Read the state. Calling [`update`](Store::update) from inside `f`
    /// will panic, since the state is borrowed.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        f(&self.inner.state.borrow())
    }

    /// Get the value of state if state implements `Copy`.
    pub fn get(&self) -> S
    where
        S: Copy,
    {
        *self.inner.state.borrow()
    }

    /// Clone the current state.
    pub fn snapshot(&self) -> S
    where
        S: Clone,
    {
        self.inner.state.borrow().clone()
    }

    /// Mutate the state and notify all observers, unless the mutator
    /// returned [`Then::Stop`].
    ///
    /// When called while observers are being notified the mutation is queued
    /// and applied as soon as the current notification pass is over, after
    /// which observers are notified again. An observer that unconditionally
    /// updates the store will therefore never settle.
    pub fn update<F, O>(&self, mutator: F)
    where
        F: FnOnce(&mut S) -> O + 'static,
        O: ShouldRender,
    {
        if self.inner.notifying.get() {
            self.inner
                .deferred
                .borrow_mut()
                .push_back(Box::new(move |state| mutator(state).should_render()));
            return;
        }

        let render = mutator(&mut self.inner.state.borrow_mut()).should_render();

        if render {
            self.notify();
        }
    }

    /// Same as [`update`](Store::update), but it never notifies.
    pub fn update_silent<F>(&self, mutator: F)
    where
        F: FnOnce(&mut S) + 'static,
    {
        self.update(move |state| {
            mutator(state);
            Then::Stop
        });
    }

    /// Replace the entire state with a new value and notify.
    pub fn set(&self, val: S) {
        self.update(move |s| *s = val);
    }

    /// Register an observer called with the new state after every notifying mutation.
    ///
    /// Observers are called in the order they subscribed. The observer stays
    /// registered until the returned [`Subscription`] is dropped.
    #[must_use = "dropping the subscription immediately unsubscribes"]
    pub fn subscribe<F>(&self, observer: F) -> Subscription<S>
    where
        F: Fn(&S) + 'static,
    {
        let id = ObserverId(self.inner.next_id.get());

        self.inner.next_id.set(id.0.wrapping_add(1));
        self.inner
            .observers
            .borrow_mut()
            .push((id, Rc::new(observer)));

        Subscription {
            store: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// A handle that does not keep the state alive.
    pub fn downgrade(&self) -> WeakStore<S> {
        WeakStore {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Number of currently registered observers.
    pub fn observer_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }

    fn notify(&self) {
        let inner = &*self.inner;
        let _guard = NotifyGuard::new(&inner.notifying);

        loop {
            // Observers may subscribe or unsubscribe while being called.
            let observers = inner.observers.borrow().clone();

            {
                let state = inner.state.borrow();

                for (id, observer) in &observers {
                    if inner.is_subscribed(*id) {
                        observer(&state);
                    }
                }
            }

            let mut render = false;

            loop {
                let next = inner.deferred.borrow_mut().pop_front();
                let Some(mutator) = next else {
                    break;
                };

                render |= mutator(&mut inner.state.borrow_mut());
            }

            if !render {
                break;
            }
        }
    }
}

impl<S> Debug for Store<S>
where
    S: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("Store");

        match self.inner.state.try_borrow() {
            Ok(state) => dbg.field("state", &*state),
            Err(_) => dbg.field("state", &"<borrowed>"),
        };

        dbg.field("observers", &self.inner.observers.borrow().len())
            .finish()
    }
}

/// Non-owning handle to a [`Store`], for observers and listeners the store
/// itself ends up owning.
pub struct WeakStore<S> {
    inner: Weak<Inner<S>>,
}

impl<S> WeakStore<S> {
    pub fn upgrade(&self) -> Option<Store<S>> {
        self.inner.upgrade().map(|inner| Store { inner })
    }
}

impl<S> Clone for WeakStore<S> {
    fn clone(&self) -> Self {
        WeakStore {
            inner: self.inner.clone(),
        }
    }
}

impl<S> Debug for WeakStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakStore")
            .field("live", &(self.inner.strong_count() > 0))
            .finish()
    }
}

struct NotifyGuard<'a>(&'a Cell<bool>);

impl<'a> NotifyGuard<'a> {
    fn new(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        NotifyGuard(flag)
    }
}

impl Drop for NotifyGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Keeps an observer registered with a [`Store`]. Dropping it unsubscribes.
pub struct Subscription<S> {
    store: Weak<Inner<S>>,
    id: ObserverId,
}

impl<S> Subscription<S> {
    /// Keep the observer registered for as long as the store lives.
    pub fn detach(self) {
        std::mem::forget(self);
    }
}

impl<S> Drop for Subscription<S> {
    fn drop(&mut self) {
        let Some(inner) = self.store.upgrade() else {
            return;
        };

        let removed = {
            let mut observers = inner.observers.borrow_mut();

            observers
                .iter()
                .position(|(id, _)| *id == self.id)
                .map(|idx| observers.remove(idx))
        };

        // The observer might own other subscriptions, drop it without holding the borrow.
        drop(removed);
    }
}

impl<S> Debug for Subscription<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id.0)
            .field("live", &(self.store.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder<S: Copy + 'static>() -> (Rc<RefCell<Vec<S>>>, impl Fn(&S) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();

        (seen, move |s: &S| sink.borrow_mut().push(*s))
    }

    #[test]
    fn update_notifies_observers() {
        let store = Store::new(0_i32);
        let (seen, observer) = recorder();
        let _sub = store.subscribe(observer);

        store.update(|n| *n += 1);
        store.update(|n| *n += 1);
        store.set(10);

        assert_eq!(store.get(), 10);
        assert_eq!(&*seen.borrow(), &[1, 2, 10]);
    }

    #[test]
    fn silent_updates() {
        let store = Store::new(0_i32);
        let (seen, observer) = recorder();
        let _sub = store.subscribe(observer);

        store.update_silent(|n| *n += 5);
        store.update(|n| {
            *n += 1;
            Then::Stop
        });

        assert_eq!(store.get(), 6);
        assert!(seen.borrow().is_empty());

        store.update(|_| Then::Render);

        assert_eq!(&*seen.borrow(), &[6]);
    }

    #[test]
    fn observers_called_in_subscription_order() {
        let store = Store::new(0_u8);
        let order = Rc::new(RefCell::new(Vec::new()));

        let subs = (0..3)
            .map(|n| {
                let order = order.clone();
                store.subscribe(move |_| order.borrow_mut().push(n))
            })
            .collect::<Vec<_>>();

        store.set(1);

        assert_eq!(&*order.borrow(), &[0, 1, 2]);
        assert_eq!(store.observer_count(), 3);

        drop(subs);

        assert_eq!(store.observer_count(), 0);
    }

    #[test]
    fn dropped_subscription_is_not_notified() {
        let store = Store::new(0_i32);
        let (seen, observer) = recorder();
        let sub = store.subscribe(observer);

        store.set(1);
        drop(sub);
        store.set(2);

        assert_eq!(&*seen.borrow(), &[1]);
    }

    #[test]
    fn detached_subscription_stays() {
        let store = Store::new(0_i32);
        let (seen, observer) = recorder();

        store.subscribe(observer).detach();
        store.set(7);

        assert_eq!(&*seen.borrow(), &[7]);
        assert_eq!(store.observer_count(), 1);
    }

    #[test]
    fn nested_update_is_deferred() {
        let store = Store::new(0_i32);
        let (seen, observer) = recorder();

        let handle = store.clone();
        let _bounce = store.subscribe(move |&n| {
            // Bring odd numbers up to the next even one.
            if n % 2 != 0 {
                handle.update(|n| *n += 1);
            }
        });
        let _record = store.subscribe(observer);

        store.update(|n| *n += 1);

        assert_eq!(store.get(), 2);
        // Second observer sees the state before the queued mutation, then after.
        assert_eq!(&*seen.borrow(), &[1, 2]);
    }

    #[test]
    fn unsubscribe_during_notification() {
        let store = Store::new(0_i32);
        let (seen, observer) = recorder();
        let second = Rc::new(RefCell::new(None));

        let slot = second.clone();
        let _first = store.subscribe(move |_| drop(slot.borrow_mut().take()));
        *second.borrow_mut() = Some(store.subscribe(observer));

        store.set(3);

        assert!(seen.borrow().is_empty());
        assert_eq!(store.observer_count(), 1);
    }

    #[test]
    fn weak_store_does_not_keep_state_alive() {
        let store = Store::new(1_i32);
        let weak = store.downgrade();

        weak.upgrade().unwrap().update(|n| *n += 1);
        assert_eq!(store.get(), 2);

        drop(store);

        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn subscription_outlives_store() {
        let store = Store::new(String::from("foo"));
        let sub = store.subscribe(|_| {});

        assert_eq!(store.snapshot(), "foo");
        assert_eq!(store.with(|s| s.len()), 3);

        drop(store);
        drop(sub);
    }
}
