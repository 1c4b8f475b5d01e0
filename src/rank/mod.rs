#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! PageRank estimation over a directed link graph.
//!
//! Two estimators are provided:
//! - [`sampling`]: a random surfer walks the corpus and the visited transition
//!   distributions are averaged.
//! - [`iteration`]: the PageRank recurrence is applied to the whole
//!   distribution until it stops moving.
//!
//! Both implement the [`Ranker`] trait; [`EstimatorType`] picks one at runtime.

pub mod config;
pub mod corpus;
pub mod crawl;
pub mod distribution;
pub mod error;
pub mod iteration;
pub mod sampling;
pub mod transition;

use crate::rank::config::RankConfig;
use crate::rank::corpus::Corpus;
use crate::rank::distribution::Distribution;
use crate::rank::error::Result;
use crate::rank::iteration::Iteration;
use crate::rank::sampling::Sampling;
use clap::ValueEnum;
use fastrand::Rng;
use std::fmt::Display;

/// Counters collected by the last run of a [`Ranker`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RankStats {
    /// Update rounds performed: walk steps for sampling, sweeps for iteration.
    pub rounds: usize,
    /// Transition distributions computed (sampling) or link contributions summed (iteration).
    pub transitions: usize,
    /// Largest per-page change of the final round, when the estimator tracks it.
    pub final_delta: Option<f64>,
}

/// A strategy that turns a corpus into a rank distribution.
pub trait Ranker {
    /// Ranks every page of `corpus`.
    ///
    /// # Errors
    ///
    /// Invalid configuration, or an estimator-specific failure such as a
    /// reached iteration cap.
    fn rank(&mut self, corpus: &Corpus) -> Result<Distribution>;

    /// Counters of the most recent successful [`Ranker::rank`] call.
    fn stats(&self) -> RankStats;

    /// Parameters this ranker runs with.
    fn config(&self) -> &RankConfig;
}

/// Available rank estimators.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash, Default, ValueEnum)]
pub enum EstimatorType {
    /// Random-surfer sampling.
    #[default]
    Sampling,
    /// Fixed-point iteration of the PageRank recurrence.
    Iteration,
}

impl Display for EstimatorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sampling => f.pad("sampling"),
            Self::Iteration => f.pad("iteration"),
        }
    }
}

impl EstimatorType {
    /// Builds the concrete estimator. Sampling uses `seed` when given, and a
    /// randomly seeded generator otherwise.
    #[must_use]
    pub fn to_impl(self, config: RankConfig, seed: Option<u64>) -> RankerImpls {
        match self {
            Self::Sampling => {
                let rng = seed.map_or_else(Rng::new, Rng::with_seed);
                RankerImpls::Sampling(Sampling::new(config, rng))
            }
            Self::Iteration => RankerImpls::Iteration(Iteration::new(config)),
        }
    }
}

/// Runtime dispatch over the available [`Ranker`] implementations.
#[derive(Debug, Clone)]
pub enum RankerImpls {
    /// See [`Sampling`].
    Sampling(Sampling),
    /// See [`Iteration`].
    Iteration(Iteration),
}

impl RankerImpls {
    /// Which estimator this is.
    #[must_use]
    pub const fn estimator(&self) -> EstimatorType {
        match self {
            Self::Sampling(_) => EstimatorType::Sampling,
            Self::Iteration(_) => EstimatorType::Iteration,
        }
    }
}

impl Ranker for RankerImpls {
    fn rank(&mut self, corpus: &Corpus) -> Result<Distribution> {
        match self {
            Self::Sampling(r) => r.rank(corpus),
            Self::Iteration(r) => r.rank(corpus),
        }
    }

    fn stats(&self) -> RankStats {
        match self {
            Self::Sampling(r) => r.stats(),
            Self::Iteration(r) => r.stats(),
        }
    }

    fn config(&self) -> &RankConfig {
        match self {
            Self::Sampling(r) => r.config(),
            Self::Iteration(r) => r.config(),
        }
    }
}
