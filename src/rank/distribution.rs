//! Probability distributions over the pages of a corpus.
//!
//! A [`Distribution`] shares the page list of the corpus it was computed from
//! and stores one value per page in the same order. The free functions at the
//! bottom of this module are the numeric helpers the estimators build on.

use crate::rank::corpus::Corpus;
use fastrand::Rng;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::fmt::Display;
use std::ops::Index;
use std::sync::Arc;

/// A mapping from page name to a non-negative real value.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pages: Arc<[String]>,
    values: Vec<f64>,
}

impl Distribution {
    /// Every page of `corpus` gets `1 / N`.
    #[must_use]
    pub fn uniform(corpus: &Corpus) -> Self {
        let n = corpus.len();
        Self::from_values(corpus, vec![1.0 / n as f64; n])
    }

    /// Every page of `corpus` gets `0`.
    #[must_use]
    pub fn zeros(corpus: &Corpus) -> Self {
        Self::from_values(corpus, vec![0.0; corpus.len()])
    }

    pub(crate) fn from_values(corpus: &Corpus, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), corpus.len());
        Self {
            pages: corpus.shared_pages(),
            values,
        }
    }

    /// Value of the page called `page`.
    #[must_use]
    pub fn get(&self, page: &str) -> Option<f64> {
        self.pages
            .binary_search_by(|p| p.as_str().cmp(page))
            .ok()
            .map(|idx| self.values[idx])
    }

    /// Values in page order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Page names, sorted.
    #[must_use]
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    /// Number of pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the distribution covers no page at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(page, value)` pairs sorted by page name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.pages
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// `(page, value)` pairs from the highest value to the lowest; ties keep page order.
    #[must_use]
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        self.iter()
            .sorted_by_key(|&(page, value)| (Reverse(OrderedFloat(value)), page))
            .collect_vec()
    }

    /// Sum of all values.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Whether the values add up to 1 within `tolerance`.
    #[must_use]
    pub fn is_normalised(&self, tolerance: f64) -> bool {
        (self.sum() - 1.0).abs() <= tolerance
    }

    /// Largest per-page absolute difference to `other`.
    ///
    /// # Panics
    ///
    /// If the two distributions cover a different number of pages.
    #[must_use]
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        max_abs_diff(&self.values, &other.values)
    }
}

impl Index<&str> for Distribution {
    type Output = f64;

    fn index(&self, page: &str) -> &Self::Output {
        let idx = self
            .pages
            .binary_search_by(|p| p.as_str().cmp(page))
            .unwrap_or_else(|_| panic!("page '{page}' is not part of the distribution"));
        &self.values[idx]
    }
}

impl Display for Distribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let precision = f.precision().unwrap_or(4);
        for (page, value) in self.iter() {
            writeln!(f, "  {page}: {value:.precision$}")?;
        }
        Ok(())
    }
}

/// Folds one more observation into a running mean.
///
/// After the call with `count = i`, `mean` is the arithmetic mean of the
/// first `i` observations, provided it held the mean of the first `i - 1`
/// before.
pub(crate) fn fold_mean(mean: &mut [f64], observation: &[f64], count: usize) {
    debug_assert!(count >= 1);
    let i = count as f64;
    for (m, &x) in mean.iter_mut().zip(observation) {
        *m = ((i - 1.0) * *m + x) / i;
    }
}

/// Draws an index with probability proportional to its weight.
///
/// A uniform draw is scaled by the total weight and located on the running
/// cumulative sum: the first index whose cumulative weight exceeds it wins.
/// Falls back to a uniform pick when every weight is zero.
pub(crate) fn sample_categorical(weights: &[f64], rng: &mut Rng) -> usize {
    debug_assert!(!weights.is_empty());
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return rng.usize(..weights.len());
    }

    locate(weights, rng.f64() * total)
}

/// First index whose cumulative weight exceeds `target`.
fn locate(weights: &[f64], target: f64) -> usize {
    let mut cumulative = 0.0;
    for (idx, &w) in weights.iter().enumerate() {
        cumulative += w;
        if target < cumulative {
            return idx;
        }
    }
    // Rounding can push `target` onto the total; settle on the last page that has weight.
    weights
        .iter()
        .rposition(|&w| w > 0.0)
        .unwrap_or(weights.len() - 1)
}

/// Largest absolute element-wise difference of two equally long slices.
pub(crate) fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "distributions cover different pages");
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}
