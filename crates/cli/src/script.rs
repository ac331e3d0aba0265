use serde::Serialize;
use tally::prelude::*;

use crate::log;
use crate::report::{ErrorExt, Report};
use crate::session::Session;
use crate::{Render, Script};

#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    counter: Counter,
    displayed: &'a str,
    actions: &'a [Action],
}

pub fn script(s: &Script) -> Report<()> {
    let out = run_script(s.counter.start, &s.actions, s.json)?;

    println!("{out}");

    Ok(())
}

pub fn render(r: &Render) -> Report<()> {
    println!("{}", Session::start(r.counter.start).html());

    Ok(())
}

fn run_script(start: i64, actions: &[Action], json: bool) -> Report<String> {
    let session = Session::start(start);

    log::info!("mounted counter at {start}");

    for &action in actions {
        let value = session.click(action)?;

        if log::is_verbose_output_enabled() {
            log::clicked!("`{}` ({action}), counter at {value}", action.label());
        }
    }

    let displayed = session.displayed()?;

    if !json {
        return Ok(displayed);
    }

    let snapshot = Snapshot {
        counter: Counter::new(session.value()),
        displayed: &displayed,
        actions,
    };

    serde_json::to_string(&snapshot).message("failed to encode snapshot")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_increments() {
        let out = run_script(0, &[Action::Increment; 3], false).unwrap();

        assert_eq!(out, "3");
    }

    #[test]
    fn one_decrement() {
        let out = run_script(0, &[Action::Decrement], false).unwrap();

        assert_eq!(out, "-1");
    }

    #[test]
    fn round_trip_from_five() {
        let out = run_script(5, &[Action::Increment, Action::Decrement], false).unwrap();

        assert_eq!(out, "5");
    }

    #[test]
    fn no_actions() {
        assert_eq!(run_script(-12, &[], false).unwrap(), "-12");
    }

    #[test]
    fn json_snapshot() {
        let out = run_script(1, &[Action::Increment, Action::Increment], true).unwrap();

        assert_eq!(
            out,
            r#"{"counter":{"value":3},"displayed":"3","actions":["increment","increment"]}"#
        );
    }
}
