//! Argument parsing and result reporting for the `pagerank` binary.

pub(crate) mod cli;
