#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Monte-Carlo estimation of PageRank.
//!
//! A random surfer starts on a uniformly chosen page. At every step the
//! transition distribution of the current page is folded into a running
//! average, and the next page is drawn from that running average rather than
//! from the single-step transition. The running average after `n - 1` steps is
//! the estimate.

use crate::rank::config::RankConfig;
use crate::rank::corpus::Corpus;
use crate::rank::distribution::{fold_mean, sample_categorical, Distribution};
use crate::rank::error::Result;
use crate::rank::transition::transition_into;
use crate::rank::{RankStats, Ranker};
use fastrand::Rng;
use tracing::{debug, warn};

/// Estimates PageRank by sampling `config.samples` pages.
///
/// All randomness comes from `rng`, so two calls with identically seeded
/// generators return bit-identical distributions.
///
/// With `samples == 1` no transition is taken and every page keeps rank 0.
///
/// # Errors
///
/// Any violation reported by [`RankConfig::validate`].
pub fn sample_pagerank(corpus: &Corpus, config: &RankConfig, rng: &mut Rng) -> Result<Distribution> {
    sample_with_stats(corpus, config, rng).map(|(dist, _)| dist)
}

fn sample_with_stats(
    corpus: &Corpus,
    config: &RankConfig,
    rng: &mut Rng,
) -> Result<(Distribution, RankStats)> {
    config.validate()?;

    let n = corpus.len();
    let mut average = vec![0.0; n];
    let mut step = vec![0.0; n];
    let mut current = rng.usize(..n);

    debug!(
        pages = n,
        samples = config.samples,
        damping = config.damping,
        start = corpus.page(current),
        "sampling PageRank"
    );
    if config.samples == 1 {
        warn!("a single sample takes no transition, every rank stays at zero");
    }

    for i in 1..config.samples {
        transition_into(corpus, current, config.damping, &mut step);
        fold_mean(&mut average, &step, i);
        current = sample_categorical(&average, rng);
    }

    let stats = RankStats {
        rounds: config.samples - 1,
        transitions: config.samples - 1,
        final_delta: None,
    };
    debug!(rounds = stats.rounds, "sampling finished");

    Ok((Distribution::from_values(corpus, average), stats))
}

/// The sampling estimator as a [`Ranker`], owning its random generator.
#[derive(Debug, Clone)]
pub struct Sampling {
    config: RankConfig,
    rng: Rng,
    stats: RankStats,
}

impl Sampling {
    /// Creates a sampler drawing from `rng`.
    #[must_use]
    pub fn new(config: RankConfig, rng: Rng) -> Self {
        Self {
            config,
            rng,
            stats: RankStats::default(),
        }
    }

    /// Creates a sampler with a generator seeded from `seed`.
    #[must_use]
    pub fn with_seed(config: RankConfig, seed: u64) -> Self {
        Self::new(config, Rng::with_seed(seed))
    }
}

impl Ranker for Sampling {
    fn rank(&mut self, corpus: &Corpus) -> Result<Distribution> {
        let (dist, stats) = sample_with_stats(corpus, &self.config, &mut self.rng)?;
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
