// src/services/pagination.rs

//! Pagination URL resolution.
//!
//! Decides which classifier-proposed "next page" URLs are worth fetching:
//! new pages only, inside the requested page range, one URL per page number,
//! and never a page the caller already fetched.

use std::collections::HashSet;

use serde::Deserialize;

use crate::models::{PageRange, ResolvedPageSet};
use crate::services::page_number::{extract_page_number, is_likely_first_page};

/// Why a candidate was left out of the resolved set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DropReason {
    FirstPageAlreadyFetched,
    OutOfRange,
    OriginalUrl,
    DuplicateUrl,
    DuplicatePageNumber,
}

/// Resolver for candidate pagination URLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaginationResolver {
    range: PageRange,
}

impl PaginationResolver {
    /// Create a resolver for the given page range.
    pub fn new(range: PageRange) -> Self {
        Self { range }
    }

    pub fn range(&self) -> PageRange {
        self.range
    }

    /// Resolve candidates against the URLs that were originally requested.
    ///
    /// The output preserves candidate order. When an original URL already
    /// covers page 1 and the range starts at 1, the range effectively starts
    /// at 2 so the first page is not fetched twice.
    pub fn resolve<C, O>(&self, candidate_urls: &[C], original_urls: &[O]) -> ResolvedPageSet
    where
        C: AsRef<str>,
        O: AsRef<str>,
    {
        let originals: HashSet<&str> = original_urls.iter().map(AsRef::as_ref).collect();
        let original_has_page_1 = originals.iter().any(|url| is_likely_first_page(url));

        let effective = if original_has_page_1 && self.range.start() == 1 {
            self.range.with_start(2)
        } else {
            self.range
        };

        let mut resolved = ResolvedPageSet::default();
        let mut seen_urls: HashSet<&str> = HashSet::new();
        let mut seen_pages: HashSet<u32> = HashSet::new();

        for candidate in candidate_urls {
            let url = candidate.as_ref();
            let page = extract_page_number(url);

            match Self::check(url, page, effective, &originals, &seen_urls, &seen_pages) {
                Some(reason) => {
                    log::debug!("Dropping pagination candidate {url} ({reason:?})");
                }
                None => {
                    seen_urls.insert(url);
                    if let Some(page) = page {
                        seen_pages.insert(page);
                    }
                    resolved.push(url.to_string(), page);
                }
            }
        }

        log::debug!(
            "Resolved {} of {} pagination candidates (effective start {}, end {:?})",
            resolved.len(),
            candidate_urls.len(),
            effective.start(),
            effective.end()
        );
        resolved
    }

    /// Apply the filters in order; the first that rejects names the reason.
    fn check(
        url: &str,
        page: Option<u32>,
        effective: PageRange,
        originals: &HashSet<&str>,
        seen_urls: &HashSet<&str>,
        seen_pages: &HashSet<u32>,
    ) -> Option<DropReason> {
        if effective.start() > 1 {
            let is_first = match page {
                Some(n) => n == 1,
                None => is_likely_first_page(url),
            };
            if is_first {
                return Some(DropReason::FirstPageAlreadyFetched);
            }
        }

        // Unknown page numbers are never range-filtered.
        if page.is_some_and(|n| !effective.contains(n)) {
            return Some(DropReason::OutOfRange);
        }

        if originals.contains(url) {
            return Some(DropReason::OriginalUrl);
        }

        if seen_urls.contains(url) {
            return Some(DropReason::DuplicateUrl);
        }

        if page.is_some_and(|n| seen_pages.contains(&n)) {
            return Some(DropReason::DuplicatePageNumber);
        }

        None
    }
}

/// Resolve candidate URLs for an explicit page range.
///
/// `start_page` below 1 is treated as 1; an `end_page` before the start
/// leaves only candidates with unknown page numbers.
pub fn resolve<C, O>(
    candidate_urls: &[C],
    original_urls: &[O],
    start_page: u32,
    end_page: Option<u32>,
) -> ResolvedPageSet
where
    C: AsRef<str>,
    O: AsRef<str>,
{
    let start = start_page.max(1);
    if end_page.is_some_and(|end| end < start) {
        log::warn!("end_page {end_page:?} precedes start_page {start}; only unnumbered pages can match");
    }
    let range = PageRange::unchecked(start, end_page);
    PaginationResolver::new(range).resolve(candidate_urls, original_urls)
}

/// Shape of the pagination classifier's answer.
#[derive(Debug, Deserialize)]
struct ClassifierResponse {
    #[serde(default)]
    page_urls: Vec<String>,
}

/// Parse the pagination classifier's JSON answer into candidate URLs.
///
/// Anything that is not `{"page_urls": [...]}` yields no candidates.
pub fn parse_classifier_response(raw: &str) -> Vec<String> {
    match serde_json::from_str::<ClassifierResponse>(raw) {
        Ok(response) => response
            .page_urls
            .into_iter()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect(),
        Err(e) => {
            log::warn!("Unusable pagination classifier response: {e}");
            Vec::new()
        }
    }
}

/// Flatten per-source candidate lists, keeping the first occurrence of each
/// URL.
pub fn merge_candidates<I, L, S>(lists: I) -> Vec<String>
where
    I: IntoIterator<Item = L>,
    L: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for url in lists.into_iter().flatten() {
        let url = url.as_ref();
        if seen.insert(url.to_string()) {
            merged.push(url.to_string());
        }
    }
    merged
}
