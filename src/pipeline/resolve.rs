// src/pipeline/resolve.rs

//! Pagination resolution pipeline.

use crate::error::Result;
use crate::models::{Config, PageRange, ResolvedPageSet};
use crate::services::{PaginationResolver, merge_candidates, parse_classifier_response};

/// Inputs for one resolution run.
#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    /// URLs that were already fetched
    pub originals: Vec<String>,

    /// Candidate URLs given directly
    pub candidates: Vec<String>,

    /// Raw classifier answers (`{"page_urls": [...]}`), one per source page
    pub classifier_responses: Vec<String>,

    /// Overrides `pagination.start_page`
    pub start_page: Option<u32>,

    /// Overrides `pagination.end_page`
    pub end_page: Option<u32>,
}

impl ResolveRequest {
    fn page_range(&self, config: &Config) -> Result<PageRange> {
        PageRange::new(
            self.start_page.unwrap_or(config.pagination.start_page),
            self.end_page.or(config.pagination.end_page),
        )
    }
}

/// Resolve every candidate from the request into the pages worth fetching.
pub fn run_resolve(config: &Config, request: &ResolveRequest) -> Result<ResolvedPageSet> {
    let range = request.page_range(config)?;

    let parsed: Vec<Vec<String>> = request
        .classifier_responses
        .iter()
        .map(|raw| parse_classifier_response(raw))
        .collect();
    let candidates = merge_candidates(
        std::iter::once(request.candidates.clone()).chain(parsed),
    );

    log::info!(
        "Resolving {} candidates against {} original URLs (pages {}..{})",
        candidates.len(),
        request.originals.len(),
        range.start(),
        range.end().map_or_else(|| "".to_string(), |end| end.to_string())
    );

    let resolved = PaginationResolver::new(range).resolve(&candidates, &request.originals);
    log::info!("{} pages to fetch", resolved.len());
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merges_direct_and_classifier_candidates() {
        let request = ResolveRequest {
            originals: vec!["https://u.edu/dept".into()],
            candidates: vec!["https://u.edu/dept?page=2".into()],
            classifier_responses: vec![
                r#"{"page_urls": ["https://u.edu/dept?page=2", "https://u.edu/dept?page=3"]}"#
                    .into(),
                "the model rambled instead".into(),
            ],
            ..ResolveRequest::default()
        };

        let resolved = run_resolve(&Config::default(), &request).unwrap();

        assert_eq!(
            resolved.urls(),
            vec!["https://u.edu/dept?page=2", "https://u.edu/dept?page=3"]
        );
    }

    #[test]
    fn test_request_overrides_config_range() {
        let mut config = Config::default();
        config.pagination.end_page = Some(2);
        let request = ResolveRequest {
            originals: vec!["https://u.edu/dept".into()],
            candidates: vec![
                "https://u.edu/dept?page=2".into(),
                "https://u.edu/dept?page=3".into(),
            ],
            end_page: Some(3),
            ..ResolveRequest::default()
        };

        let resolved = run_resolve(&config, &request).unwrap();
        assert_eq!(resolved.len(), 2);

        let resolved = run_resolve(
            &config,
            &ResolveRequest {
                end_page: None,
                ..request
            },
        )
        .unwrap();
        assert_eq!(resolved.urls(), vec!["https://u.edu/dept?page=2"]);
    }

    #[test]
    fn test_invalid_range_is_an_error() {
        let request = ResolveRequest {
            start_page: Some(4),
            end_page: Some(2),
            ..ResolveRequest::default()
        };
        assert!(run_resolve(&Config::default(), &request).is_err());
    }
}
