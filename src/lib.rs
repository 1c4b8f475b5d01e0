#![deny(missing_docs)]
//! This crate estimates the PageRank of pages in a directed link graph, by
//! random-surfer sampling and by iterating the PageRank recurrence.

/// The `rank` module holds the link corpus, the transition model, both rank
/// estimators and the HTML crawler that builds a corpus from disk.
pub mod rank;
