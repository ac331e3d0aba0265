use std::rc::Rc;

use tally::app;
use tally::prelude::*;
use tally::runtime::Runtime;

use crate::report::{Error, Report};

/// The counter app mounted in an in-memory document, driven by clicking its buttons.
pub struct Session {
    dom: Rc<MemoryDom>,
    store: CounterStore,
    _app: Runtime<Counter>,
}

impl Session {
    pub fn start(start: i64) -> Self {
        let dom = Rc::new(MemoryDom::new());
        let store = CounterStore::new(start);
        let _app = app::start(dom.clone(), &store);

        Session { dom, store, _app }
    }

    /// Click the button labeled for `action`, returning the new counter value.
    pub fn click(&self, action: Action) -> Report<i64> {
        let button = self
            .dom
            .find_by_text("button", action.label())
            .ok_or_else(|| Error::message(format!("no `{}` button", action.label())))?;

        self.dom.click(button);

        Ok(self.store.value())
    }

    /// Text of the heading.
    pub fn displayed(&self) -> Report<String> {
        let heading = self
            .dom
            .find("h1")
            .ok_or_else(|| Error::message("no heading rendered"))?;

        Ok(self.dom.text_content(heading))
    }

    /// Labels of all rendered buttons in document order, with the action each dispatches.
    pub fn buttons(&self) -> Vec<(String, Option<Action>)> {
        self.dom
            .find_all("button")
            .into_iter()
            .map(|button| {
                let label = self.dom.text_content(button);
                let action = label.parse::<Action>().ok();

                (label, action)
            })
            .collect()
    }

    pub fn html(&self) -> String {
        self.dom.to_html()
    }

    pub fn value(&self) -> i64 {
        self.store.value()
    }
}
