use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tally::counter::Action;

use crate::log::When;

mod log;
mod report;
mod script;
mod session;
mod term;

/// A counter in your terminal
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Print what happens on every click
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Color status output
    #[arg(long, value_enum, default_value_t = When::Auto, global = true)]
    color: When,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open the counter in the terminal
    #[command(visible_alias = "r")]
    Run(Run),

    /// Click the buttons named by ACTIONS and print the displayed value
    #[command(visible_alias = "s")]
    Script(Script),

    /// Print the counter as HTML
    Render(Render),
}

#[derive(Debug, Args)]
struct CounterArgs {
    /// Value the counter starts at
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    start: i64,
}

#[derive(Debug, Args)]
struct Run {
    #[command(flatten)]
    counter: CounterArgs,
}

#[derive(Debug, Args)]
struct Script {
    #[command(flatten)]
    counter: CounterArgs,

    /// Print a JSON snapshot instead of the displayed value
    #[arg(long)]
    json: bool,

    /// Buttons to click in order: `+1`, `-1`, `increment` or `decrement`
    #[arg(value_name = "ACTIONS", allow_negative_numbers = true)]
    actions: Vec<Action>,
}

#[derive(Debug, Args)]
struct Render {
    #[command(flatten)]
    counter: CounterArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    log::init(cli.verbose, cli.color);

    let res = match cli.command {
        Command::Run(r) => term::run(&r),
        Command::Script(s) => script::script(&s),
        Command::Render(r) => script::render(&r),
    };

    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
