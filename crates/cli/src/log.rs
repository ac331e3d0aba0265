//! Right-aligned status lines on stderr.

use std::fmt;
use std::io::{self, IsTerminal};
use std::sync::OnceLock;

use clap::ValueEnum;
use crossterm::style::{Color, Stylize};

/// When to color output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum When {
    /// Only when stderr is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

struct Settings {
    verbose: bool,
    color: bool,
}

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Configure output for the rest of the process. Only the first call has any effect.
pub fn init(verbose: bool, color: When) {
    let color = match color {
        When::Auto => io::stderr().is_terminal(),
        When::Always => true,
        When::Never => false,
    };

    let _ = SETTINGS.set(Settings { verbose, color });
}

pub fn is_verbose_output_enabled() -> bool {
    SETTINGS.get().is_some_and(|s| s.verbose)
}

pub fn is_color_output_enabled() -> bool {
    SETTINGS.get().is_some_and(|s| s.color)
}

#[macro_export]
macro_rules! status {
    ($title:literal, $color:ident, $($arg:tt)*) => {{
        eprintln!(
            "{} {}",
            $crate::log::Title($title, ::crossterm::style::Color::$color),
            format_args!($($arg)*),
        );
    }};
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {{
        eprintln!("{}: {}", $crate::log::Error, format_args!($($arg)*));
    }};
}

pub use error;

#[macro_export]
macro_rules! starting {
    ($($arg:tt)*) => {
        $crate::status!("Starting", DarkBlue, $($arg)*)
    };
}

pub use starting;

#[macro_export]
macro_rules! clicked {
    ($($arg:tt)*) => {
        $crate::status!("Clicked", DarkBlue, $($arg)*)
    };
}

pub use clicked;

#[macro_export]
macro_rules! finished {
    ($($arg:tt)*) => {
        $crate::status!("Finished", DarkGreen, $($arg)*)
    };
}

pub use finished;

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        if $crate::log::is_verbose_output_enabled() {
            $crate::status!("Info", DarkCyan, $($arg)*)
        }
    };
}

pub use info;

pub struct Error;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = "error";
        if is_color_output_enabled() {
            write!(f, "{}", title.dark_red().bold())
        } else {
            write!(f, "{title}")
        }
    }
}

/// Status title, right-aligned to 12 columns.
pub struct Title(pub &'static str, pub Color);

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = format!("{:>12}", self.0);
        if is_color_output_enabled() {
            write!(f, "{}", title.with(self.1).bold())
        } else {
            write!(f, "{title}")
        }
    }
}
