// src/models/page.rs

//! Page numbers, page ranges, and resolved page sets.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Inclusive page window requested by the caller.
///
/// `end == None` means the window is unbounded above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    start: u32,
    end: Option<u32>,
}

impl PageRange {
    /// Create a validated range. `start` must be at least 1 and `end`, when
    /// present, must not precede `start`.
    pub fn new(start: u32, end: Option<u32>) -> Result<Self> {
        if start == 0 {
            return Err(AppError::validation("start_page must be >= 1"));
        }
        if let Some(end) = end {
            if end < start {
                return Err(AppError::validation(format!(
                    "end_page ({end}) must be >= start_page ({start})"
                )));
            }
        }
        Ok(Self { start, end })
    }

    /// Build a range without validation, for callers that have already
    /// clamped `start` and accept an empty window.
    pub(crate) fn unchecked(start: u32, end: Option<u32>) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> Option<u32> {
        self.end
    }

    /// Whether a known page number falls inside the window.
    pub fn contains(&self, page: u32) -> bool {
        page >= self.start && self.end.is_none_or(|end| page <= end)
    }

    /// Same window with a different lower bound. Not validated: a bumped
    /// start may legitimately exceed `end`, which empties the window for
    /// known page numbers.
    pub(crate) fn with_start(self, start: u32) -> Self {
        Self { start, ..self }
    }
}

impl Default for PageRange {
    fn default() -> Self {
        Self {
            start: 1,
            end: None,
        }
    }
}

/// A URL kept by the pagination resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPage {
    pub url: String,

    /// Extracted page number; `None` when no pattern recognized the URL
    pub page: Option<u32>,
}

/// Ordered, duplicate-free output of one resolution call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedPageSet {
    pages: Vec<ResolvedPage>,
}

impl ResolvedPageSet {
    pub(crate) fn push(&mut self, url: String, page: Option<u32>) {
        self.pages.push(ResolvedPage { url, page });
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedPage> {
        self.pages.iter()
    }

    /// URLs in resolution order.
    pub fn urls(&self) -> Vec<&str> {
        self.pages.iter().map(|p| p.url.as_str()).collect()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.pages.iter().any(|p| p.url == url)
    }

    /// Page number recorded for `url`, if the URL is present and its page
    /// number is known.
    pub fn page_of(&self, url: &str) -> Option<u32> {
        self.pages
            .iter()
            .find(|p| p.url == url)
            .and_then(|p| p.page)
    }
}

impl<'a> IntoIterator for &'a ResolvedPageSet {
    type Item = &'a ResolvedPage;
    type IntoIter = std::slice::Iter<'a, ResolvedPage>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_rejects_zero_start() {
        assert!(PageRange::new(0, None).is_err());
    }

    #[test]
    fn test_range_rejects_end_before_start() {
        assert!(PageRange::new(4, Some(2)).is_err());
        assert!(PageRange::new(2, Some(2)).is_ok());
    }

    #[test]
    fn test_range_contains() {
        let bounded = PageRange::new(2, Some(4)).unwrap();
        assert!(!bounded.contains(1));
        assert!(bounded.contains(2));
        assert!(bounded.contains(4));
        assert!(!bounded.contains(5));

        let open = PageRange::default();
        assert!(open.contains(1));
        assert!(open.contains(10_000));
    }

    #[test]
    fn test_bumped_start_can_empty_window() {
        let range = PageRange::new(1, Some(1)).unwrap().with_start(2);
        assert!(!range.contains(1));
        assert!(!range.contains(2));
    }

    #[test]
    fn test_resolved_set_serializes_as_list() {
        let mut set = ResolvedPageSet::default();
        set.push("https://a.edu/?page=2".into(), Some(2));
        set.push("https://a.edu/more".into(), None);

        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"url": "https://a.edu/?page=2", "page": 2},
                {"url": "https://a.edu/more", "page": null}
            ])
        );
        assert_eq!(set.page_of("https://a.edu/?page=2"), Some(2));
        assert_eq!(set.page_of("https://a.edu/more"), None);
    }
}
