//! CLI frontend for the SOLUZION text session engine.

mod catalog;
mod commands;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use commands::play::PlayOptions;

#[derive(Parser)]
#[command(
    name = "sz",
    about = "Play SOLUZION puzzles and games in the terminal",
    version
)]
struct Cli {
    /// Formulation to play, by key or alias (see --list)
    #[arg(required_unless_present = "list")]
    formulation: Option<String>,

    /// List the available formulations and exit
    #[arg(short, long)]
    list: bool,

    /// Print JSON: the catalog with --list, the session summary otherwise
    #[arg(long)]
    json: bool,

    /// Declare a player before role assignment (repeatable)
    #[arg(short, long = "player", value_name = "NAME")]
    players: Vec<String>,

    /// Root directory for session folders
    #[arg(long, value_name = "DIR")]
    docs_root: Option<PathBuf>,

    /// Editor for externally-edited parameters (default: $EDITOR, then nano)
    #[arg(long, value_name = "PROGRAM")]
    editor: Option<String>,

    /// RNG seed for formulations with random setup
    #[arg(short, long)]
    seed: Option<u64>,

    /// Do not print the command instructions at the start
    #[arg(long)]
    no_instructions: bool,

    /// Log engine decisions at debug level
    #[arg(short, long)]
    debug: bool,

    /// Log session milestones at info level
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(debug: bool, verbose: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug, cli.verbose);

    let result = match cli.formulation {
        _ if cli.list => commands::list::run(cli.json),
        Some(name) => commands::play::run(
            &name,
            PlayOptions {
                players: cli.players,
                docs_root: cli.docs_root,
                editor: cli.editor,
                seed: cli.seed,
                skip_instructions: cli.no_instructions,
                json: cli.json,
            },
        ),
        None => Err("no formulation given; run `sz --list` to see what is available".into()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
