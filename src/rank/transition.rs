//! The one-step transition model of the random surfer.
//!
//! From a page with outgoing links the surfer follows one of them, chosen
//! uniformly, with probability `damping`, and otherwise jumps to any page of
//! the corpus. A dangling page behaves as if it linked to every page,
//! itself included.

use crate::rank::config::check_damping;
use crate::rank::corpus::Corpus;
use crate::rank::distribution::Distribution;
use crate::rank::error::{RankError, Result};

/// Probability distribution over the page visited after `page`.
///
/// # Errors
///
/// `UnknownPage` if `page` is not in `corpus`, `InvalidDamping` if `damping`
/// is not strictly between 0 and 1.
pub fn transition_model(corpus: &Corpus, page: &str, damping: f64) -> Result<Distribution> {
    let damping = check_damping(damping)?;
    let idx = corpus
        .index_of(page)
        .ok_or_else(|| RankError::UnknownPage(page.to_string()))?;

    let mut out = vec![0.0; corpus.len()];
    transition_into(corpus, idx, damping, &mut out);
    Ok(Distribution::from_values(corpus, out))
}

/// Writes the transition distribution of page `idx` into `out`.
///
/// `out` must have one slot per page; its previous contents are overwritten.
pub(crate) fn transition_into(corpus: &Corpus, idx: usize, damping: f64, out: &mut [f64]) {
    debug_assert_eq!(out.len(), corpus.len());
    let n = corpus.len() as f64;
    let links = corpus.links(idx);

    if links.is_empty() {
        out.fill(1.0 / n);
        return;
    }

    out.fill((1.0 - damping) / n);
    let share = damping / links.len() as f64;
    for &target in links {
        out[target] += share;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_linked_page() {
        let corpus = Corpus::new([("A", vec!["B"]), ("B", vec!["A"])]).unwrap();
        let dist = transition_model(&corpus, "A", 0.85).unwrap();
        assert!((dist["A"] - 0.075).abs() < 1e-12);
        assert!((dist["B"] - 0.925).abs() < 1e-12);
    }

    #[test]
    fn test_link_share_is_split_evenly() {
        let corpus = Corpus::new([
            ("1.html", vec!["2.html"]),
            ("2.html", vec!["1.html", "3.html"]),
            ("3.html", vec!["2.html", "4.html"]),
            ("4.html", vec!["2.html"]),
        ])
        .unwrap();
        let dist = transition_model(&corpus, "2.html", 0.85).unwrap();
        let base = 0.15 / 4.0;
        assert!((dist["1.html"] - (base + 0.425)).abs() < 1e-12);
        assert!((dist["2.html"] - base).abs() < 1e-12);
        assert!((dist["3.html"] - (base + 0.425)).abs() < 1e-12);
        assert!((dist["4.html"] - base).abs() < 1e-12);
        assert!(dist.is_normalised(1e-9));
    }

    #[test]
    fn test_dangling_page_is_uniform() {
        let corpus = Corpus::new([("A", vec![]), ("B", vec!["A"])]).unwrap();
        let dist = transition_model(&corpus, "A", 0.85).unwrap();
        assert!((dist["A"] - 0.5).abs() < 1e-12);
        assert!((dist["B"] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_dangling_ignores_damping() {
        let corpus = Corpus::new([("x", vec![]), ("y", vec![]), ("z", vec!["x"])]).unwrap();
        for damping in [0.1, 0.5, 0.85, 0.99] {
            let dist = transition_model(&corpus, "y", damping).unwrap();
            assert!(dist.values().iter().all(|&v| (v - 1.0 / 3.0).abs() < 1e-12));
        }
    }

    #[test]
    fn test_unknown_page() {
        let corpus = Corpus::new([("A", vec!["B"]), ("B", vec![])]).unwrap();
        let err = transition_model(&corpus, "C", 0.85);
        assert!(matches!(err, Err(RankError::UnknownPage(p)) if p == "C"));
    }

    #[test]
    fn test_invalid_damping() {
        let corpus = Corpus::new([("A", vec!["B"]), ("B", vec![])]).unwrap();
        assert!(matches!(
            transition_model(&corpus, "A", 1.0),
            Err(RankError::InvalidDamping(_))
        ));
    }

    #[test]
    fn test_transition_into_overwrites_buffer() {
        let corpus = Corpus::new([("A", vec!["B"]), ("B", vec![])]).unwrap();
        let mut out = vec![42.0; 2];
        transition_into(&corpus, 0, 0.5, &mut out);
        assert!((out[0] - 0.25).abs() < 1e-12);
        assert!((out[1] - 0.75).abs() < 1e-12);
    }

    /// Random corpora as adjacency matrices without self links.
    fn arb_corpus() -> impl Strategy<Value = Corpus> {
        (1_usize..10)
            .prop_flat_map(|n| proptest::collection::vec(proptest::bool::ANY, n * n))
            .prop_map(|cells| {
                let n = (cells.len() as f64).sqrt().round() as usize;
                let adjacency = (0..n).map(|i| {
                    let links = (0..n)
                        .filter(|&j| j != i && cells[i * n + j])
                        .map(|j| format!("p{j}"))
                        .collect::<Vec<_>>();
                    (format!("p{i}"), links)
                });
                Corpus::new(adjacency).unwrap()
            })
    }

    proptest! {
        #[test]
        fn prop_transition_sums_to_one(corpus in arb_corpus(), damping in 0.01_f64..0.99) {
            for page in corpus.pages() {
                let dist = transition_model(&corpus, page, damping).unwrap();
                prop_assert!((dist.sum() - 1.0).abs() < 1e-6);
                prop_assert!(dist.values().iter().all(|&v| v >= 0.0));
            }
        }

        #[test]
        fn prop_dangling_is_uniform(corpus in arb_corpus(), damping in 0.01_f64..0.99) {
            let n = corpus.len() as f64;
            for (idx, page) in corpus.pages().iter().enumerate() {
                if corpus.is_dangling(idx) {
                    let dist = transition_model(&corpus, page, damping).unwrap();
                    prop_assert!(dist.values().iter().all(|&v| (v - 1.0 / n).abs() < 1e-12));
                }
            }
        }
    }
}
