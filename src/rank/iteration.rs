#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Iterative estimation of PageRank.
//!
//! Starting from the uniform distribution, the PageRank recurrence
//!
//! ```text
//! PR(p) = (1 - d) / N + d * Σ PR(q) / |links(q)|   over every q linking to p
//! ```
//!
//! is applied to all pages at once, each round reading only the values of the
//! previous round, until no page moves by more than the tolerance.
//!
//! A dangling page has no outgoing links and therefore contributes nothing to
//! any sum; its rank leaks out of the system and the result then sums to less
//! than one. This differs from the transition model, which spreads a dangling
//! page uniformly over the corpus.

use crate::rank::config::{check_damping, RankConfig};
use crate::rank::corpus::Corpus;
use crate::rank::distribution::{max_abs_diff, Distribution};
use crate::rank::error::{RankError, Result};
use crate::rank::{RankStats, Ranker};
use tracing::{debug, trace};

/// Computes PageRank by iterating the recurrence until convergence.
///
/// Without `config.max_iterations` the loop has no bound: a sequence that
/// never settles within `config.tolerance` keeps the call running.
///
/// # Errors
///
/// Any violation reported by [`RankConfig::validate`], or `NotConverged` when
/// the configured iteration cap is reached first.
pub fn iterate_pagerank(corpus: &Corpus, config: &RankConfig) -> Result<Distribution> {
    iterate_with_stats(corpus, config).map(|(dist, _)| dist)
}

/// Applies one synchronous round of the recurrence to `previous`.
///
/// # Errors
///
/// `InvalidDamping` if `damping` is not strictly between 0 and 1.
///
/// # Panics
///
/// If `previous` does not cover exactly the pages of `corpus`.
pub fn pagerank_round(corpus: &Corpus, damping: f64, previous: &Distribution) -> Result<Distribution> {
    let damping = check_damping(damping)?;
    assert_eq!(
        previous.pages(),
        corpus.pages(),
        "distribution does not belong to this corpus"
    );
    let mut next = vec![0.0; corpus.len()];
    round_into(corpus, damping, previous.values(), &mut next);
    Ok(Distribution::from_values(corpus, next))
}

fn round_into(corpus: &Corpus, damping: f64, previous: &[f64], next: &mut [f64]) {
    let base = (1.0 - damping) / corpus.len() as f64;
    for (page, slot) in next.iter_mut().enumerate() {
        let inflow: f64 = corpus
            .inbound(page)
            .iter()
            .map(|&source| previous[source] / corpus.links(source).len() as f64)
            .sum();
        *slot = base + damping * inflow;
    }
}

fn iterate_with_stats(corpus: &Corpus, config: &RankConfig) -> Result<(Distribution, RankStats)> {
    config.validate()?;

    let n = corpus.len();
    let mut current = vec![1.0 / n as f64; n];
    let mut next = vec![0.0; n];
    let mut rounds = 0_usize;

    debug!(
        pages = n,
        damping = config.damping,
        tolerance = config.tolerance,
        max_iterations = ?config.max_iterations,
        "iterating PageRank"
    );

    loop {
        rounds += 1;
        round_into(corpus, config.damping, &current, &mut next);
        let delta = max_abs_diff(&current, &next);
        std::mem::swap(&mut current, &mut next);
        trace!(round = rounds, delta, "iteration round");

        if delta <= config.tolerance {
            let stats = RankStats {
                rounds,
                transitions: rounds * corpus.num_links(),
                final_delta: Some(delta),
            };
            debug!(rounds, delta, "iteration converged");
            return Ok((Distribution::from_values(corpus, current), stats));
        }

        if config.max_iterations.is_some_and(|cap| rounds >= cap) {
            return Err(RankError::NotConverged { rounds, delta });
        }
    }
}

/// The iterative estimator as a [`Ranker`].
#[derive(Debug, Clone)]
pub struct Iteration {
    config: RankConfig,
    stats: RankStats,
}

impl Iteration {
    /// Creates an iterative estimator.
    #[must_use]
    pub fn new(config: RankConfig) -> Self {
        Self {
            config,
            stats: RankStats::default(),
        }
    }
}

impl Ranker for Iteration {
    fn rank(&mut self, corpus: &Corpus) -> Result<Distribution> {
        let (dist, stats) = iterate_with_stats(corpus, &self.config)?;
        self.stats = stats;
        Ok(dist)
    }

    fn stats(&self) -> RankStats {
        self.stats
    }

    fn config(&self) -> &RankConfig {
        &self.config
    }
}
