// src/utils/url.rs

//! URL inspection utilities.
//!
//! Candidate URLs come from a classifier and may be relative or otherwise
//! unparseable, so every helper falls back to plain string splitting when
//! `url::Url` rejects the input.

/// Path component of a URL, without query or fragment.
///
/// # Examples
/// ```
/// use pagesift::utils::url::path_of;
///
/// assert_eq!(path_of("https://example.com/a/b?x=1"), "/a/b");
/// assert_eq!(path_of("/a/b#top"), "/a/b");
/// ```
pub fn path_of(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url) {
        return parsed.path().to_string();
    }
    let end = url.find(['?', '#']).unwrap_or(url.len());
    url[..end].to_string()
}

/// Lowercased query parameter names, in order of appearance.
pub fn query_keys(url: &str) -> Vec<String> {
    if let Ok(parsed) = url::Url::parse(url) {
        return parsed
            .query_pairs()
            .map(|(key, _)| key.to_lowercase())
            .collect();
    }

    let Some(start) = url.find('?') else {
        return Vec::new();
    };
    let query = &url[start + 1..];
    let query = query.split('#').next().unwrap_or("");
    query
        .split(['&', ';'])
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split('=').next().unwrap_or("").to_lowercase())
        .collect()
}

/// Whether the URL carries a non-empty query string.
pub fn has_query(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => parsed.query().is_some_and(|q| !q.is_empty()),
        Err(_) => url
            .split_once('?')
            .is_some_and(|(_, rest)| !rest.split('#').next().unwrap_or("").is_empty()),
    }
}

/// Last non-empty path segment, if any.
pub fn last_segment(url: &str) -> Option<String> {
    path_of(url)
        .split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .map(str::to_string)
}
