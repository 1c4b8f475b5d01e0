#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The link graph that the rank estimators operate on.
//!
//! A `Corpus` maps every page to the set of pages it links to. Internally the
//! pages are sorted by name and addressed by index, so every estimator walks
//! them in the same, reproducible order. Both the outgoing and the inbound
//! link lists are stored, the latter being what the iterative estimator needs.

use crate::rank::error::{RankError, Result};
use itertools::Itertools;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::fmt::Display;
use std::sync::Arc;

/// Indices of the pages on one side of a page's links.
pub type Links = SmallVec<[usize; 8]>;

/// An immutable directed link graph.
///
/// Invariants, checked by [`Corpus::new`]:
/// - there is at least one page,
/// - every link target is itself a page of the corpus,
/// - no page links to itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    pages: Arc<[String]>,
    index: FxHashMap<String, usize>,
    outbound: Vec<Links>,
    inbound: Vec<Links>,
}

impl Corpus {
    /// Builds a corpus from an adjacency mapping of page to linked pages.
    ///
    /// The mapping may come from any iterable of `(page, links)` pairs; link
    /// collections may contain duplicates, which are collapsed.
    ///
    /// # Errors
    ///
    /// - `EmptyCorpus` if the mapping has no pages.
    /// - `DuplicatePage` if the same page appears twice as a key.
    /// - `SelfLink` if a page links to itself.
    /// - `UnknownLink` if a page links to something that is not a key.
    pub fn new<I, P, L, T>(adjacency: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, L)>,
        P: Into<String>,
        L: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut raw: Vec<(String, FxHashSet<String>)> = adjacency
            .into_iter()
            .map(|(page, links)| (page.into(), links.into_iter().map(Into::into).collect()))
            .collect_vec();

        if raw.is_empty() {
            return Err(RankError::EmptyCorpus);
        }

        raw.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));

        if let Some(pair) = raw.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(RankError::DuplicatePage(pair[0].0.clone()));
        }

        let index: FxHashMap<String, usize> = raw
            .iter()
            .enumerate()
            .map(|(i, (page, _))| (page.clone(), i))
            .collect();

        let mut outbound = Vec::with_capacity(raw.len());
        let mut inbound = vec![Links::new(); raw.len()];

        for (page, links) in &raw {
            let mut targets = Links::with_capacity(links.len());
            for link in links {
                if link == page {
                    return Err(RankError::SelfLink(page.clone()));
                }
                let Some(&target) = index.get(link) else {
                    return Err(RankError::UnknownLink {
                        page: page.clone(),
                        target: link.clone(),
                    });
                };
                targets.push(target);
            }
            targets.sort_unstable();
            outbound.push(targets);
        }

        // Sources are visited in ascending order, so every inbound list ends up sorted.
        for (source, targets) in outbound.iter().enumerate() {
            for &target in targets {
                inbound[target].push(source);
            }
        }

        let pages: Arc<[String]> = raw.into_iter().map(|(page, _)| page).collect();

        Ok(Self {
            pages,
            index,
            outbound,
            inbound,
        })
    }

    /// Number of pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Always `false`: a corpus cannot be constructed without pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Page names, sorted.
    #[must_use]
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub(crate) fn shared_pages(&self) -> Arc<[String]> {
        Arc::clone(&self.pages)
    }

    /// Name of the page at `idx`.
    ///
    /// # Panics
    ///
    /// If `idx` is out of range.
    #[must_use]
    pub fn page(&self, idx: usize) -> &str {
        &self.pages[idx]
    }

    /// Index of the page called `name`, if there is one.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Whether `name` is a page of this corpus.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Indices of the pages that page `idx` links to.
    #[must_use]
    pub fn links(&self, idx: usize) -> &[usize] {
        &self.outbound[idx]
    }

    /// Indices of the pages that link to page `idx`.
    #[must_use]
    pub fn inbound(&self, idx: usize) -> &[usize] {
        &self.inbound[idx]
    }

    /// Names of the pages that `name` links to, or `None` if `name` is unknown.
    pub fn links_of(&self, name: &str) -> Option<impl Iterator<Item = &str> + '_> {
        self.index_of(name)
            .map(move |idx| self.outbound[idx].iter().map(move |&t| self.page(t)))
    }

    /// A page with no outgoing links.
    #[must_use]
    pub fn is_dangling(&self, idx: usize) -> bool {
        self.outbound[idx].is_empty()
    }

    /// Total number of links in the corpus.
    #[must_use]
    pub fn num_links(&self) -> usize {
        self.outbound.iter().map(SmallVec::len).sum()
    }

    /// Number of pages without outgoing links.
    #[must_use]
    pub fn num_dangling(&self) -> usize {
        self.outbound.iter().filter(|links| links.is_empty()).count()
    }

    /// Iterates over `(page, linked pages)` in page order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, impl Iterator<Item = &str> + '_)> + '_ {
        self.pages.iter().zip(&self.outbound).map(move |(page, links)| {
            (
                page.as_str(),
                links.iter().map(move |&t| self.pages[t].as_str()),
            )
        })
    }
}

impl Display for Corpus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (page, links) in self.iter() {
            writeln!(f, "{page} -> {{{}}}", links.format(", "))?;
        }
        Ok(())
    }
}
