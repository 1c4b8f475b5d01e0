#![allow(clippy::cast_precision_loss)]

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use pagerank::rank::config::{DAMPING, RankConfig, SAMPLES, TOLERANCE};
use pagerank::rank::corpus::Corpus;
use pagerank::rank::crawl::crawl;
use pagerank::rank::distribution::Distribution;
use pagerank::rank::error::Result;
use pagerank::rank::{EstimatorType, RankStats, Ranker};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};
use tracing::{debug, info};

/// Defines the command-line interface for the pagerank application.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "pagerank",
    version,
    about = "Estimate PageRank for a directory of HTML pages",
    args_conflicts_with_subcommands = true
)]
pub(crate) struct Cli {
    /// An optional path argument. If provided without a subcommand,
    /// it's treated as the corpus directory to rank.
    pub path: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `rank`, `completions`).
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Rank every `.html` page of a directory.
    Rank {
        /// Directory holding the corpus.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Which estimators to run.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash, Default, ValueEnum)]
pub(crate) enum Method {
    /// Sampling first, then iteration.
    #[default]
    Both,
    /// Random-surfer sampling only.
    Sampling,
    /// Fixed-point iteration only.
    Iteration,
}

impl Method {
    pub(crate) const fn estimators(self) -> &'static [EstimatorType] {
        match self {
            Self::Both => &[EstimatorType::Sampling, EstimatorType::Iteration],
            Self::Sampling => &[EstimatorType::Sampling],
            Self::Iteration => &[EstimatorType::Iteration],
        }
    }
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Clone)]
pub(crate) struct CommonOptions {
    /// Enable debug logging.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Print crawl and estimator statistics after the ranks.
    #[arg(long, default_value_t = false)]
    pub(crate) stats: bool,

    /// Probability of following a link rather than jumping to a random page.
    #[arg(long, default_value_t = DAMPING)]
    pub(crate) damping: f64,

    /// Number of pages visited by the sampling estimator.
    #[arg(short = 'n', long, default_value_t = SAMPLES)]
    pub(crate) samples: usize,

    /// Largest per-page change the iterative estimator accepts as converged.
    #[arg(long, default_value_t = TOLERANCE)]
    pub(crate) tolerance: f64,

    /// Give up iterating after this many rounds. Unbounded when omitted.
    #[arg(long)]
    pub(crate) max_iterations: Option<usize>,

    /// Seed for the sampling estimator; a random seed is used when omitted.
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// Which estimators to run.
    #[arg(short, long, value_enum, default_value_t = Method::Both)]
    pub(crate) method: Method,

    /// Decimal places used when printing ranks.
    #[arg(short, long, default_value_t = 4)]
    pub(crate) precision: usize,

    /// List pages from the highest rank to the lowest instead of by name.
    #[arg(short = 'r', long, default_value_t = false)]
    pub(crate) by_rank: bool,
}

impl CommonOptions {
    pub(crate) const fn config(&self) -> RankConfig {
        RankConfig {
            damping: self.damping,
            samples: self.samples,
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
        }
    }
}

/// One estimator run, kept for the statistics table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RunReport {
    pub(crate) estimator: EstimatorType,
    pub(crate) stats: RankStats,
    pub(crate) elapsed: Duration,
    pub(crate) sum: f64,
}

/// Writes shell completions for `shell` to stdout.
pub(crate) fn print_completions(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

/// Crawls `path`, runs the selected estimators and prints their ranks.
///
/// # Errors
///
/// If the corpus cannot be crawled, the options describe an invalid
/// configuration, or an estimator fails.
pub(crate) fn rank_and_report(path: &Path, common: &CommonOptions) -> Result<Vec<RunReport>> {
    let config = common.config();
    config.validate()?;

    let time = Instant::now();
    let corpus = crawl(path)?;
    let crawl_time = time.elapsed();

    info!(
        path = %path.display(),
        pages = corpus.len(),
        links = corpus.num_links(),
        "corpus loaded"
    );
    debug!("corpus:\n{corpus}");

    let mut reports = Vec::with_capacity(common.method.estimators().len());
    for &estimator in common.method.estimators() {
        let mut ranker = estimator.to_impl(config, common.seed);

        let time = Instant::now();
        let ranks = ranker.rank(&corpus)?;
        let elapsed = time.elapsed();

        println!("{}", heading(estimator, &config));
        print!("{}", format_ranks(&ranks, common.precision, common.by_rank));
        reports.push(RunReport {
            estimator: ranker.estimator(),
            stats: ranker.stats(),
            elapsed,
            sum: ranks.sum(),
        });
    }

    if common.stats {
        print_stats(crawl_time, &corpus, &reports, memory_usage());
    }

    Ok(reports)
}

/// Heading printed above the ranks of one estimator.
pub(crate) fn heading(estimator: EstimatorType, config: &RankConfig) -> String {
    match estimator {
        EstimatorType::Sampling => {
            format!("PageRank Results from Sampling (n = {})", config.samples)
        }
        EstimatorType::Iteration => "PageRank Results from Iteration".to_string(),
    }
}

/// One `  page: rank` line per page, by name or by descending rank.
pub(crate) fn format_ranks(ranks: &Distribution, precision: usize, by_rank: bool) -> String {
    if !by_rank {
        return format!("{ranks:.precision$}");
    }
    ranks
        .ranked()
        .into_iter()
        .map(|(page, value)| format!("  {page}: {value:.precision$}\n"))
        .collect()
}

/// Allocated and resident memory in MiB, as reported by jemalloc.
fn memory_usage() -> Option<(f64, f64)> {
    epoch::advance().ok()?;
    let allocated = stats::allocated::read().ok()?;
    let resident = stats::resident::read().ok()?;
    Some((
        allocated as f64 / (1024.0 * 1024.0),
        resident as f64 / (1024.0 * 1024.0),
    ))
}

/// A `label  value` row of the statistics table.
fn stat_row(label: &str, value: impl std::fmt::Display) -> String {
    format!("|  {label:<28} {value:>18}  |")
}

/// A counter row that also shows how many of it were done per second.
fn counter_row(label: &str, count: usize, secs: f64) -> String {
    let per_sec = if secs > 0.0 { count as f64 / secs } else { 0.0 };
    format!("|  {label:<20} {count:>12} ({per_sec:>9.0}/sec)  |")
}

/// Prints a summary of corpus and estimator statistics.
///
/// # Arguments
/// * `crawl_time` - Duration spent building the corpus.
/// * `corpus` - The ranked corpus.
/// * `reports` - One entry per estimator run.
/// * `memory` - Allocated and resident memory in MiB, when jemalloc reports it.
pub(crate) fn print_stats(
    crawl_time: Duration,
    corpus: &Corpus,
    reports: &[RunReport],
    memory: Option<(f64, f64)>,
) {
    println!("\n=======================[ Corpus Statistics ]==========================");
    println!("{}", stat_row("Crawl time (s)", format!("{:.3}", crawl_time.as_secs_f64())));
    println!("{}", stat_row("Pages", corpus.len()));
    println!("{}", stat_row("Links", corpus.num_links()));
    println!("{}", stat_row("Dangling pages", corpus.num_dangling()));

    for report in reports {
        let elapsed_secs = report.elapsed.as_secs_f64();
        println!("========================[ {:^9} Statistics ]=======================", report.estimator);
        println!("{}", counter_row("Rounds", report.stats.rounds, elapsed_secs));
        println!("{}", counter_row("Transitions", report.stats.transitions, elapsed_secs));
        if let Some(delta) = report.stats.final_delta {
            println!("{}", stat_row("Final change", format!("{delta:.6}")));
        }
        println!("{}", stat_row("Rank sum", format!("{:.6}", report.sum)));
        println!("{}", stat_row("CPU time (s)", format!("{elapsed_secs:.3}")));
    }

    if let Some((allocated, resident)) = memory {
        println!("==========================[ Memory ]=================================");
        println!("{}", stat_row("Memory usage (MiB)", format!("{allocated:.2}")));
        println!("{}", stat_row("Resident memory (MiB)", format!("{resident:.2}")));
    }
    println!("=====================================================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagerank::rank::error::RankError;
    use std::fs;
    use tempfile::TempDir;

    fn corpus_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("1.html"), r#"<a href="2.html">2</a>"#).unwrap();
        fs::write(
            dir.path().join("2.html"),
            r#"<a href="1.html">1</a><a href="3.html">3</a>"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("3.html"),
            r#"<a href="2.html">2</a><a href="4.html">4</a>"#,
        )
        .unwrap();
        fs::write(dir.path().join("4.html"), r#"<a href="2.html">2</a>"#).unwrap();
        dir
    }

    #[test]
    fn test_bare_path() {
        let cli = Cli::try_parse_from(["pagerank", "corpus0"]).unwrap();
        assert_eq!(cli.path, Some(PathBuf::from("corpus0")));
        assert!(cli.command.is_none());
        assert_eq!(cli.common.method, Method::Both);
        assert_eq!(cli.common.samples, SAMPLES);
        assert_eq!(cli.common.config(), RankConfig::default());
    }

    #[test]
    fn test_rank_subcommand_options() {
        let cli = Cli::try_parse_from([
            "pagerank",
            "rank",
            "--path",
            "corpus1",
            "--damping",
            "0.5",
            "-n",
            "200",
            "--max-iterations",
            "30",
            "--seed",
            "9",
            "--method",
            "iteration",
        ])
        .unwrap();

        let Some(Commands::Rank { path, common }) = cli.command else {
            panic!("expected the rank subcommand");
        };
        assert_eq!(path, PathBuf::from("corpus1"));
        assert_eq!(common.seed, Some(9));
        assert_eq!(common.method, Method::Iteration);
        assert_eq!(
            common.config(),
            RankConfig::default()
                .with_damping(0.5)
                .with_samples(200)
                .with_max_iterations(Some(30))
        );
    }

    #[test]
    fn test_unknown_method_rejected() {
        assert!(Cli::try_parse_from(["pagerank", "x", "--method", "eigen"]).is_err());
    }

    #[test]
    fn test_completions_subcommand() {
        let cli = Cli::try_parse_from(["pagerank", "completions", "bash"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Completions {
                shell: clap_complete::Shell::Bash
            })
        ));
    }

    #[test]
    fn test_method_estimators() {
        assert_eq!(Method::Both.estimators().len(), 2);
        assert_eq!(Method::Sampling.estimators(), &[EstimatorType::Sampling]);
        assert_eq!(Method::Iteration.estimators(), &[EstimatorType::Iteration]);
    }

    #[test]
    fn test_headings() {
        let config = RankConfig::default();
        assert_eq!(
            heading(EstimatorType::Sampling, &config),
            "PageRank Results from Sampling (n = 10000)"
        );
        assert_eq!(
            heading(EstimatorType::Iteration, &config),
            "PageRank Results from Iteration"
        );
    }

    #[test]
    fn test_rank_and_report() {
        let dir = corpus_dir();
        let cli = Cli::try_parse_from(["pagerank", "--seed", "1", "--stats", "x"]).unwrap();
        let reports = rank_and_report(dir.path(), &cli.common).unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].estimator, EstimatorType::Sampling);
        assert_eq!(reports[0].stats.rounds, SAMPLES - 1);
        assert_eq!(reports[1].estimator, EstimatorType::Iteration);
        assert!(reports.iter().all(|r| (r.sum - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_by_rank_flag() {
        let cli = Cli::try_parse_from(["pagerank", "x", "-r"]).unwrap();
        assert!(cli.common.by_rank);
        let cli = Cli::try_parse_from(["pagerank", "x"]).unwrap();
        assert!(!cli.common.by_rank);
    }

    #[test]
    fn test_format_ranks_orders() {
        let corpus = Corpus::new([("a", vec!["b"]), ("b", vec!["a", "c"]), ("c", vec!["b"])]).unwrap();
        let ranks = pagerank::rank::iteration::iterate_pagerank(&corpus, &RankConfig::default()).unwrap();

        let by_name = format_ranks(&ranks, 2, false);
        let names: Vec<&str> = by_name.lines().map(|l| l.trim().split(':').next().unwrap()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);

        let by_rank = format_ranks(&ranks, 2, true);
        let first = by_rank.lines().next().unwrap();
        assert!(first.starts_with("  b: "), "{by_rank}");
        assert_eq!(by_rank.lines().count(), 3);
    }

    #[test]
    fn test_stat_rows() {
        let row = stat_row("Pages", 4);
        assert!(row.starts_with("|  Pages "));
        assert!(row.ends_with("   4  |"));
        assert!(counter_row("Rounds", 500, 2.0).contains("(      250/sec)"));
        assert!(counter_row("Rounds", 500, 0.0).contains("(        0/sec)"));
    }

    #[test]
    fn test_rank_and_report_rejects_bad_damping() {
        let dir = corpus_dir();
        let cli = Cli::try_parse_from(["pagerank", "--damping", "1.2", "x"]).unwrap();
        assert!(matches!(
            rank_and_report(dir.path(), &cli.common),
            Err(RankError::InvalidDamping(_))
        ));
    }

    #[test]
    fn test_rank_and_report_empty_directory() {
        let dir = TempDir::new().unwrap();
        let cli = Cli::try_parse_from(["pagerank", "x"]).unwrap();
        assert!(matches!(
            rank_and_report(dir.path(), &cli.common),
            Err(RankError::EmptyCorpus)
        ));
    }
}
