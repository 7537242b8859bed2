// src/services/page_number.rs

//! Page number extraction from URLs.
//!
//! Patterns are evaluated in catalog order and the first one that yields a
//! parseable number wins. Structured markers (query parameters, `/page/N`)
//! come before filename forms, and a bare trailing number comes last because
//! it is just as often an article or record id.

use std::sync::LazyLock;

use regex::Regex;

use crate::utils::url::{has_query, last_segment, path_of, query_keys};

/// Query parameter names that mark a URL as paginated.
pub const PAGINATION_QUERY_KEYS: &[&str] = &[
    "page",
    "p",
    "pg",
    "paged",
    "pagenum",
    "page_num",
    "pageno",
    "page_no",
    "pagenumber",
    "seite",
    "pagina",
    "pagine",
    "sayfa",
    "strona",
];

/// Filenames that serve a directory's default (first) page.
const INDEX_FILENAMES: &[&str] = &[
    "index.html",
    "index.htm",
    "index.php",
    "index.asp",
    "index.aspx",
    "index.jsp",
    "default.asp",
    "default.aspx",
    "default.htm",
    "default.html",
];

/// One entry of the pattern catalog.
#[derive(Debug)]
pub struct PagePattern {
    /// Short label used in debug logs and tests
    pub name: &'static str,

    /// Pattern whose first capture group holds the page digits
    regex: Regex,
}

impl PagePattern {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).expect("page pattern catalog must compile"),
        }
    }

    /// Page number captured by this pattern, if it matches and the digits
    /// fit in a `u32`.
    fn extract(&self, url: &str) -> Option<u32> {
        let caps = self.regex.captures(url)?;
        caps.get(1)?.as_str().parse().ok()
    }
}

/// Ordered catalog, highest priority first.
static CATALOG: LazyLock<Vec<PagePattern>> = LazyLock::new(|| {
    vec![
        // Query parameters
        PagePattern::new("query_page", r"(?i)[?&;]page=(\d+)"),
        PagePattern::new("query_p", r"(?i)[?&;]p=(\d+)"),
        PagePattern::new("query_pg", r"(?i)[?&;]pg=(\d+)"),
        PagePattern::new("query_paged", r"(?i)[?&;]paged=(\d+)"),
        PagePattern::new(
            "query_pagenum",
            r"(?i)[?&;](?:pagenum|page_num|pageno|page_no|pagenumber)=(\d+)",
        ),
        PagePattern::new(
            "query_localized",
            r"(?i)[?&;](?:seite|pagina|pagine|sayfa|strona)=(\d+)",
        ),
        // Path segments
        PagePattern::new("path_page", r"(?i)/page/(\d+)(?:[/?#]|$)"),
        PagePattern::new("path_p", r"(?i)/p/(\d+)(?:[/?#]|$)"),
        PagePattern::new(
            "path_localized",
            r"(?i)/(?:seite|pagina|strona)/(\d+)(?:[/?#]|$)",
        ),
        // Filename and suffix forms
        PagePattern::new(
            "suffix_page",
            r"(?i)[-_]page[-_]?(\d+)(?:\.[a-z]+)?/?(?:[?#]|$)",
        ),
        PagePattern::new(
            "filename_page",
            r"(?i)/page(\d+)\.(?:html?|php|aspx?)(?:[?#]|$)",
        ),
        // Bare trailing number, least specific
        PagePattern::new("trailing_number", r"/(\d+)/?(?:[?#].*)?$"),
    ]
});

/// The ordered pattern catalog.
pub fn catalog() -> &'static [PagePattern] {
    &CATALOG
}

/// Extract a page number from a URL.
///
/// Returns `None` when no pattern in the catalog recognizes the URL. A
/// pattern whose captured digits overflow is skipped, not treated as a
/// failure.
///
/// # Examples
/// ```
/// use pagesift::services::extract_page_number;
///
/// assert_eq!(extract_page_number("https://site.edu/list?page=7"), Some(7));
/// assert_eq!(extract_page_number("https://site.edu/news/page/3"), Some(3));
/// assert_eq!(extract_page_number("https://site.edu/about"), None);
/// ```
pub fn extract_page_number(url: &str) -> Option<u32> {
    catalog().iter().find_map(|pattern| {
        let page = pattern.extract(url)?;
        log::trace!("page pattern '{}' matched {} -> {}", pattern.name, url, page);
        Some(page)
    })
}

/// Heuristic check for whether a URL points at the first page of a listing.
///
/// Any single signal is enough: an extracted page number of 1, a bare origin
/// or root path, a trailing `/` or index filename, or the absence of every
/// recognized pagination query parameter. A known page number other than 1
/// does not veto the other signals.
pub fn is_likely_first_page(url: &str) -> bool {
    extract_page_number(url) == Some(1)
        || is_bare_root(url)
        || ends_like_directory_index(url)
        || !has_pagination_query(url)
}

/// Whether the URL carries any recognized pagination query parameter.
pub fn has_pagination_query(url: &str) -> bool {
    query_keys(url)
        .iter()
        .any(|key| PAGINATION_QUERY_KEYS.contains(&key.as_str()))
}

fn is_bare_root(url: &str) -> bool {
    let path = path_of(url);
    matches!(path.as_str(), "" | "/") && !has_query(url)
}

fn ends_like_directory_index(url: &str) -> bool {
    if path_of(url).ends_with('/') {
        return true;
    }
    last_segment(url).is_some_and(|segment| {
        INDEX_FILENAMES.contains(&segment.to_lowercase().as_str())
    })
}
