use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use cardledger::console::Console;
use cardledger::engine::Engine;
use cardledger::entries::Side;
use cardledger::session::Session;
use cardledger::store::FileStore;

#[derive(Parser)]
#[clap(version = "0.1.0", author = "Vance Longwill <vancelongwill@gmail.com>")]
/// Keep per-round wagers across a fixed row of numbered cards.
struct Opts {
    /// Number of cards; fixed for the life of the snapshot
    #[clap(
        long,
        env = "CARDLEDGER_ACCOUNTS",
        default_value = "7",
        parse(try_from_str = parse_account_count)
    )]
    accounts: usize,
    /// Snapshot file
    #[clap(long, env = "CARDLEDGER_STORE", default_value = "ledger.json")]
    store: PathBuf,
    #[clap(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Record entries, e.g. `3:30` or `1:100:A:Alice`
    Apply {
        #[clap(required = true)]
        commands: Vec<String>,
    },
    /// Declare the winning side and settle every open bet
    Settle { side: Side },
    /// Discard the snapshot and start over
    Reset,
    /// Print a CSV statement of every card
    Statement,
    /// Read commands and directives from stdin, one per line
    Session,
}

fn parse_account_count(s: &str) -> Result<usize> {
    match s.parse::<usize>()? {
        0 => Err(anyhow!("at least one account is required")),
        n => Ok(n),
    }
}

fn run() -> Result<()> {
    let opts: Opts = Opts::parse();

    let store = FileStore::new(opts.store);
    let mut session = Session::open(Engine::new(opts.accounts), &store);
    let mut console = Console::new(&mut session, io::stdout(), io::stderr());

    match opts.action {
        Action::Apply { commands } => {
            for raw in &commands {
                console.submit(raw)?;
            }
        }
        Action::Settle { side } => console.settle(side)?,
        Action::Reset => console.reset()?,
        Action::Statement => console.statement()?,
        Action::Session => console.interact(io::stdin().lock())?,
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run() {
        error!(error = e.to_string(), "Something went wrong");
        process::exit(1);
    }
}
