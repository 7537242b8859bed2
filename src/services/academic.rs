// src/services/academic.rs

//! Speculative `first.last@domain` inference for academic profile pages.
//!
//! The address produced here was never seen on the page. Callers label it
//! [`Confidence::Inferred`](crate::models::Confidence::Inferred) and treat
//! any failure as "nothing inferred".

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use crate::error::{AppError, Result};
use crate::utils::parse_selector;

static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@([a-zA-Z0-9.-]+\.[a-zA-Z]{2,})").expect("domain pattern")
});

const MAX_NAME_WORDS: usize = 5;

/// Infer `first.last@domain` from the page's person name and the first
/// domain that appears after an `@` anywhere in the markup.
pub fn infer_email(document: &Html, raw: &str) -> Result<Option<String>> {
    let Some(name) = person_name(document)? else {
        return Ok(None);
    };
    let Some(domain) = domain_hint(raw) else {
        return Ok(None);
    };
    synthesize(&name, &domain).map(Some)
}

/// Person name from the first short `<h1>`, else from a profile `<title>`.
pub fn person_name(document: &Html) -> Result<Option<String>> {
    let h1 = parse_selector("h1")?;
    for heading in document.select(&h1) {
        let text: String = heading.text().collect();
        let text = text.trim();
        if !text.is_empty() && text.split_whitespace().count() <= MAX_NAME_WORDS {
            return Ok(Some(text.to_string()));
        }
    }

    let title = parse_selector("title")?;
    if let Some(title) = document.select(&title).next() {
        let text: String = title.text().collect();
        if text.to_lowercase().contains("profile") {
            let head = text.split('|').next().unwrap_or("");
            let words: Vec<&str> = head.split_whitespace().collect();
            if words.len() > 1 && words.len() <= MAX_NAME_WORDS {
                return Ok(Some(words.join(" ")));
            }
        }
    }

    Ok(None)
}

/// First `@domain.tld` in the raw markup.
pub fn domain_hint(raw: &str) -> Option<String> {
    DOMAIN_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Build `first.last@domain` from a display name.
///
/// Everything but ASCII letters and whitespace is stripped first, so
/// "Dr. Jane Q. Smith-Jones" becomes `dr.smithjones@domain`.
fn synthesize(name: &str, domain: &str) -> Result<String> {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    let words: Vec<&str> = cleaned.split_whitespace().collect();

    match (words.first(), words.last()) {
        (Some(first), Some(last)) if words.len() >= 2 => Ok(format!("{first}.{last}@{domain}")),
        _ => Err(AppError::inference(format!(
            "name {name:?} has fewer than two usable words"
        ))),
    }
}
