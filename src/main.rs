use anyhow::Result;
use argh::FromArgs;
use closure_objects::tour::{self, Tier};
use closure_objects::{Catalog, Interpreter, logging};

#[derive(FromArgs)]
/// Closures and first-class functions standing in for objects.
/// Runs the tour when no subcommand is given.
struct Cli {
    #[argh(subcommand)]
    command: Option<Command>,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Tour(TourArgs),
    List(ListArgs),
    Repl(ReplArgs),
}

#[derive(FromArgs, Default)]
#[argh(subcommand, name = "tour")]
/// Run every listing and check what it prints against its documentation.
struct TourArgs {
    #[argh(option)]
    /// only run one tier: identity, deferred, positional, named, counter, shouty or inherited.
    tier: Option<Tier>,

    #[argh(switch, short = 'q')]
    /// print one status line per listing instead of the listings themselves.
    quiet: bool,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "list")]
/// Print the constructors available in the playground.
struct ListArgs {}

#[derive(FromArgs)]
#[argh(subcommand, name = "repl")]
/// Start the interactive playground.
struct ReplArgs {}

fn main() {
    logging::init();
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(1);
        }
    }
}

/// Returns false when the tour found a listing whose output differs.
fn run() -> Result<bool> {
    let cli: Cli = argh::from_env();
    match cli.command {
        None => cmd_tour(TourArgs::default()),
        Some(Command::Tour(args)) => cmd_tour(args),
        Some(Command::List(_)) => cmd_list().map(|_| true),
        Some(Command::Repl(_)) => {
            Interpreter::default().repl()?;
            Ok(true)
        }
    }
}

fn cmd_tour(args: TourArgs) -> Result<bool> {
    let outcomes = tour::run_tour(args.tier)?;
    let mut stdout = std::io::stdout().lock();
    tour::report(&outcomes, &mut stdout, args.quiet)
}

fn cmd_list() -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    Catalog::default().describe(&mut stdout)
}
