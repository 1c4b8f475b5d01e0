//! Error type shared by the corpus, the rank estimators and the crawler.

use thiserror::Error;

/// Result type alias using `RankError`.
pub type Result<T> = std::result::Result<T, RankError>;

/// Everything that can go wrong while building a corpus or ranking it.
///
/// Most variants describe a broken contract on the caller's side (an empty
/// corpus, a page that does not exist, a damping factor outside `(0, 1)`).
/// They are reported as soon as they are detected; no estimator returns a
/// partially computed distribution.
#[derive(Debug, Error)]
pub enum RankError {
    /// The corpus has no pages.
    #[error("corpus must contain at least one page")]
    EmptyCorpus,

    /// A page was looked up by a name the corpus does not contain.
    #[error("page '{0}' is not part of the corpus")]
    UnknownPage(String),

    /// A link points outside the corpus.
    #[error("page '{page}' links to '{target}', which is not part of the corpus")]
    UnknownLink {
        /// Page carrying the link.
        page: String,
        /// Link target missing from the corpus.
        target: String,
    },

    /// A page lists itself among its links.
    #[error("page '{0}' links to itself")]
    SelfLink(String),

    /// The same page name was given twice.
    #[error("page '{0}' appears more than once in the corpus")]
    DuplicatePage(String),

    /// Damping outside the open interval `(0, 1)`, or NaN.
    #[error("damping factor must lie strictly between 0 and 1, got {0}")]
    InvalidDamping(f64),

    /// The sampler was asked for zero samples.
    #[error("sample count must be at least 1")]
    ZeroSamples,

    /// Tolerance that is zero, negative or not finite.
    #[error("convergence tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),

    /// An iteration cap of zero rounds.
    #[error("iteration cap must be at least 1")]
    ZeroIterationCap,

    /// The iteration cap was reached before the ranks settled.
    #[error("iteration did not converge within {rounds} rounds (last change {delta})")]
    NotConverged {
        /// Rounds performed.
        rounds: usize,
        /// Largest per-page change of the last round.
        delta: f64,
    },

    /// Reading the corpus directory or a page failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Walking the corpus directory failed.
    #[error("Walk directory error: {0}")]
    WalkDir(#[from] walkdir::Error),
}
