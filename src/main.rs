//! # pagerank
//!
//! `pagerank` ranks the pages of a small web, given as a directory of HTML
//! files, with the PageRank model. Every `.html` file in the directory is a
//! page; `<a href="...">` anchors to other files of the same directory are its
//! links.
//!
//! Two estimators are available:
//! 1.  **Sampling**: a random surfer walks the corpus for `n` steps and the
//!     transition distributions it meets are averaged.
//! 2.  **Iteration**: the PageRank recurrence is applied to all pages until no
//!     rank moves by more than the tolerance.
//!
//! ## Usage
//!
//! ```sh
//! pagerank [OPTIONS] <DIR>
//! pagerank rank --path <DIR> [OPTIONS]
//! pagerank completions <SHELL>
//! ```
//!
//! ### Options
//!
//! -   `--damping <D>`: Damping factor (default: `0.85`).
//! -   `-n, --samples <N>`: Pages visited by the sampler (default: `10000`).
//! -   `--tolerance <T>`: Convergence threshold of the iteration (default: `0.001`).
//! -   `--max-iterations <K>`: Optional cap on iteration rounds.
//! -   `--seed <S>`: Seed the sampler for reproducible output.
//! -   `-m, --method <M>`: `both`, `sampling` or `iteration` (default: `both`).
//! -   `-p, --precision <P>`: Decimal places in the output (default: `4`).
//! -   `-r, --by-rank`: List pages from the highest rank down instead of by name.
//! -   `--stats`: Print crawl and estimator statistics.
//! -   `-d, --debug`: Enable debug logging (`RUST_LOG` is honoured as well).
//!
//! ## Example Invocations
//!
//! ```sh
//! # Rank corpus0 with both estimators
//! pagerank corpus0
//!
//! # Reproducible sampling with 100k samples, plus statistics
//! pagerank rank --path corpus0 --method sampling -n 100000 --seed 7 --stats
//! ```

use crate::command_line::cli::{Cli, Commands, print_completions, rank_and_report};
use clap::Parser;
use tracing::{Level, error};
use tracing_subscriber::EnvFilter;

mod command_line;

/// Global allocator using `tikv-jemallocator`, which also backs the memory
/// figures in the statistics table.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

/// Main entry point of the pagerank application.
///
/// Parses command-line arguments, dispatches to the appropriate command handler,
/// and exits with status 1 on any failure.
fn main() {
    let cli = Cli::parse();

    let debug = match &cli.command {
        Some(Commands::Rank { common, .. }) => common.debug,
        _ => cli.common.debug,
    };
    init_tracing(debug);

    let result = match cli.command {
        Some(Commands::Rank { path, common }) => rank_and_report(&path, &common).map(drop),
        Some(Commands::Completions { shell }) => {
            print_completions(shell);
            Ok(())
        }
        None => {
            let Some(path) = cli.path else {
                eprintln!("No corpus directory provided. Use --help for more information.");
                std::process::exit(1);
            };
            rank_and_report(&path, &cli.common).map(drop)
        }
    };

    if let Err(e) = result {
        error!(error = %e, "ranking failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
