//! Builds a [`Corpus`] from a directory of HTML pages.
//!
//! Every `.html` file directly inside the directory becomes a page named after
//! its file name. Anchors pointing at other pages of the same directory become
//! links; self links and links leaving the directory are dropped.

use crate::rank::corpus::Corpus;
use crate::rank::error::Result;
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};
use walkdir::WalkDir;

static ANCHOR_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a\s+(?:[^>]*?)href="([^"]*)""#).expect("anchor pattern is valid")
});

/// Every distinct `href` target of an `<a>` tag in `html`.
#[must_use]
pub fn extract_links(html: &str) -> FxHashSet<String> {
    ANCHOR_HREF
        .captures_iter(html)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Parses every `.html` page in `dir` (not recursing) into a corpus.
///
/// # Errors
///
/// - `WalkDir` or `Io` if the directory or one of its pages cannot be read.
/// - `EmptyCorpus` if the directory holds no `.html` page.
pub fn crawl(dir: impl AsRef<Path>) -> Result<Corpus> {
    let dir = dir.as_ref();
    let mut pages: FxHashMap<String, FxHashSet<String>> = FxHashMap::default();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            warn!(path = %entry.path().display(), "skipping page with a non UTF-8 name");
            continue;
        };
        if !name.ends_with(".html") {
            continue;
        }

        let contents = std::fs::read_to_string(entry.path())?;
        let mut links = extract_links(&contents);
        links.remove(name);
        pages.insert(name.to_string(), links);
    }

    let known: FxHashSet<String> = pages.keys().cloned().collect();
    let mut dropped = 0_usize;
    for links in pages.values_mut() {
        let before = links.len();
        links.retain(|link| known.contains(link));
        dropped += before - links.len();
    }

    debug!(
        dir = %dir.display(),
        pages = pages.len(),
        external_links = dropped,
        "crawled corpus"
    );

    Corpus::new(pages)
}
