// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The counter: its state, the actions that change it, and the store that owns it.

use std::error::Error;
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::store::{Store, Subscription, WeakStore};

/// The only entity of the application.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Counter {
    pub value: i64,
}

impl Counter {
    pub const fn new(value: i64) -> Self {
        Counter { value }
    }

    /// Add 1. Wraps around at `i64::MAX`.
    pub fn increment(&mut self) {
        self.value = self.value.wrapping_add(1);
    }

    /// Subtract 1. Wraps around at `i64::MIN`.
    pub fn decrement(&mut self) {
        self.value = self.value.wrapping_sub(1);
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Increment => self.increment(),
            Action::Decrement => self.decrement(),
        }
    }
}

/// A mutation of the [`Counter`] as a value, so it can be parsed, logged or replayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Action {
    Increment,
    Decrement,
}

impl Action {
    pub const ALL: [Action; 2] = [Action::Increment, Action::Decrement];

    /// Fully qualified action type, `<slice>/<action>`.
    pub const fn kind(self) -> &'static str {
        match self {
            Action::Increment => "counter/increment",
            Action::Decrement => "counter/decrement",
        }
    }

    /// Text of the button dispatching this action.
    pub const fn label(self) -> &'static str {
        match self {
            Action::Increment => "+1",
            Action::Decrement => "-1",
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

/// Returned when parsing an [`Action`] from text that names neither action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseActionError {
    input: String,
}

impl Display for ParseActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown action `{}`, expected one of `+1`, `-1`, `increment`, `decrement`",
            self.input
        )
    }
}

impl Error for ParseActionError {}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        match s {
            "+1" | "+" => return Ok(Action::Increment),
            "-1" | "-" => return Ok(Action::Decrement),
            _ => (),
        }

        let word = s.strip_prefix("counter/").unwrap_or(s);

        if word.eq_ignore_ascii_case("increment") || word.eq_ignore_ascii_case("inc") {
            Ok(Action::Increment)
        } else if word.eq_ignore_ascii_case("decrement") || word.eq_ignore_ascii_case("dec") {
            Ok(Action::Decrement)
        } else {
            Err(ParseActionError {
                input: s.to_owned(),
            })
        }
    }
}

/// The store owning the application's [`Counter`].
#[derive(Clone, Debug)]
pub struct CounterStore {
    store: Store<Counter>,
}

impl Default for CounterStore {
    fn default() -> Self {
        CounterStore::new(0)
    }
}

impl CounterStore {
    pub fn new(start: i64) -> Self {
        CounterStore {
            store: Store::new(Counter::new(start)),
        }
    }

    pub fn value(&self) -> i64 {
        self.store.get().value
    }

    pub fn increment(&self) {
        self.dispatch(Action::Increment);
    }

    pub fn decrement(&self) {
        self.dispatch(Action::Decrement);
    }

    pub fn dispatch(&self, action: Action) {
        self.store.update(move |counter| counter.apply(action));
    }

    /// Call `observer` with the new value after every mutation.
    #[must_use = "dropping the subscription immediately unsubscribes"]
    pub fn subscribe<F>(&self, observer: F) -> Subscription<Counter>
    where
        F: Fn(i64) + 'static,
    {
        self.store.subscribe(move |counter| observer(counter.value))
    }

    /// The underlying generic store.
    pub fn store(&self) -> &Store<Counter> {
        &self.store
    }

    pub fn downgrade(&self) -> WeakCounterStore {
        WeakCounterStore {
            store: self.store.downgrade(),
        }
    }
}

/// A [`CounterStore`] handle that does not keep the counter alive.
#[derive(Clone, Debug)]
pub struct WeakCounterStore {
    store: WeakStore<Counter>,
}

impl WeakCounterStore {
    pub fn upgrade(&self) -> Option<CounterStore> {
        self.store.upgrade().map(|store| CounterStore { store })
    }

    /// Dispatch `action` if the store is still alive.
    pub fn dispatch(&self, action: Action) {
        if let Some(store) = self.upgrade() {
            store.dispatch(action);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn increments_from_zero() {
        for n in [0, 1, 2, 3, 10, 257] {
            let store = CounterStore::default();

            for _ in 0..n {
                store.increment();
            }

            assert_eq!(store.value(), n);
        }
    }

    #[test]
    fn decrements_from_zero() {
        for n in [0, 1, 2, 3, 10, 257] {
            let store = CounterStore::default();

            for _ in 0..n {
                store.decrement();
            }

            assert_eq!(store.value(), -n);
        }
    }

    #[test]
    fn increment_and_decrement_cancel_out() {
        for start in [i64::MIN, -42, -1, 0, 1, 5, 1337, i64::MAX] {
            let mut counter = Counter::new(start);

            counter.increment();
            counter.decrement();
            assert_eq!(counter.value, start);

            counter.decrement();
            counter.increment();
            assert_eq!(counter.value, start);
        }
    }

    #[test]
    fn wraps_at_bounds() {
        let mut counter = Counter::new(i64::MAX);
        counter.increment();
        assert_eq!(counter.value, i64::MIN);

        counter.decrement();
        assert_eq!(counter.value, i64::MAX);
    }

    #[test]
    fn observers_see_every_value() {
        let store = CounterStore::new(5);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        let _sub = store.subscribe(move |value| sink.borrow_mut().push(value));

        store.increment();
        store.dispatch(Action::Decrement);
        store.decrement();

        assert_eq!(&*seen.borrow(), &[6, 5, 4]);
    }

    #[test]
    fn parse_actions() {
        assert_eq!("+1".parse::<Action>(), Ok(Action::Increment));
        assert_eq!("+".parse::<Action>(), Ok(Action::Increment));
        assert_eq!(" Increment ".parse::<Action>(), Ok(Action::Increment));
        assert_eq!("counter/increment".parse::<Action>(), Ok(Action::Increment));
        assert_eq!("-1".parse::<Action>(), Ok(Action::Decrement));
        assert_eq!("DEC".parse::<Action>(), Ok(Action::Decrement));

        let err = "+2".parse::<Action>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown action `+2`, expected one of `+1`, `-1`, `increment`, `decrement`"
        );
    }

    #[test]
    fn labels_parse_back() {
        for action in Action::ALL {
            assert_eq!(action.label().parse::<Action>(), Ok(action));
            assert_eq!(action.kind().parse::<Action>(), Ok(action));
        }

        assert_eq!(Action::Increment.to_string(), "counter/increment");
    }
}
