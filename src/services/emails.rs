// src/services/emails.rs

//! Email discovery over raw page markup.
//!
//! Contact addresses on directory and profile pages are often hidden from
//! naive scrapers. Each strategy below targets one hiding technique and
//! returns raw candidates; the harvester unions them and validates once.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use scraper::Html;

use crate::error::Result;
use crate::models::{Confidence, HarvestConfig, HarvestedEmails};
use crate::services::academic;
use crate::utils::parse_selector;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("email pattern")
});

static VALID_EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern")
});

/// `"user" + "@" + "domain"` in either quote style.
static SCRIPT_CONCAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"['"]([^'"]*)['"]\s*\+\s*['"]@['"]\s*\+\s*['"]([^'"]*)['"]"#)
        .expect("script concatenation pattern")
});

static ENCODED_AT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([a-zA-Z0-9._%+-]+)&#64;([a-zA-Z0-9.-]+\.[a-zA-Z]{2,})")
        .expect("encoded at pattern")
});

/// Numeric character reference; browsers accept it without the `;`.
static NUMERIC_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&#(?:[xX]([0-9a-fA-F]{1,6})|([0-9]{1,7}));?").expect("numeric reference pattern")
});

/// Canonical email shapes found anywhere in the text.
pub fn plain_text(text: &str) -> Vec<String> {
    EMAIL_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Canonical email shapes found after decoding HTML entities.
pub fn entity_decoded(html: &str) -> Vec<String> {
    let numeric = decode_numeric_refs(html);
    plain_text(&html_escape::decode_html_entities(&numeric))
}

/// Decode `&#64;`, `&#64` and `&#x40;` style references. Named entities are
/// left for `html_escape`.
fn decode_numeric_refs(html: &str) -> Cow<'_, str> {
    NUMERIC_REF_RE.replace_all(html, |caps: &Captures| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (None, Some(dec)) => dec.as_str().parse().ok(),
            (None, None) => None,
        };
        code.and_then(char::from_u32)
            .map_or_else(|| caps[0].to_string(), String::from)
    })
}

/// Addresses behind `mailto:` anchors, without scheme or query string.
pub fn mailto_links(document: &Html) -> Result<Vec<String>> {
    let selector = parse_selector(r#"a[href^="mailto:"]"#)?;

    Ok(document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| href.split_once("mailto:"))
        .map(|(_, rest)| rest.split('?').next().unwrap_or("").trim().to_string())
        .filter(|email| !email.is_empty())
        .collect())
}

/// Addresses assembled from `data-email`, or from `data-name` plus
/// `data-domain`.
pub fn data_attributes(document: &Html) -> Result<Vec<String>> {
    let selector = parse_selector("[data-email], [data-name], [data-domain]")?;
    let mut emails = Vec::new();

    for element in document.select(&selector) {
        let value = element.value();
        let email = value.attr("data-email").map(str::trim).unwrap_or("");
        let name = value.attr("data-name").map(str::trim).unwrap_or("");
        let domain = value.attr("data-domain").map(str::trim).unwrap_or("");

        if !email.is_empty() {
            emails.push(email.to_string());
        } else if !name.is_empty() && !domain.is_empty() {
            emails.push(format!("{name}@{domain}"));
        }
    }
    Ok(emails)
}

/// Addresses built in inline scripts by string concatenation.
///
/// Markup with no `<script>` element is scanned as a bare script fragment,
/// which covers snippets lifted out of event handlers.
pub fn script_concatenation(document: &Html, raw: &str) -> Result<Vec<String>> {
    let selector = parse_selector("script")?;
    let bodies: Vec<String> = document
        .select(&selector)
        .map(|script| script.text().collect())
        .collect();

    let sources: Vec<&str> = if bodies.is_empty() {
        vec![raw]
    } else {
        bodies.iter().map(String::as_str).collect()
    };

    Ok(sources
        .into_iter()
        .filter(|body| body.contains('@') || body.to_lowercase().contains("email"))
        .flat_map(|body| SCRIPT_CONCAT_RE.captures_iter(body))
        .map(|caps| format!("{}@{}", &caps[1], &caps[2]))
        .collect())
}

/// Addresses written with a literal `&#64;` in place of `@`.
pub fn encoded_at(html: &str) -> Vec<String> {
    ENCODED_AT_RE
        .captures_iter(html)
        .map(|caps| format!("{}@{}", &caps[1], &caps[2]))
        .collect()
}

/// Structural email check applied to every candidate.
pub fn is_valid_email(candidate: &str) -> bool {
    let Some(domain) = candidate.split('@').nth(1) else {
        return false;
    };
    if !domain.contains('.') {
        return false;
    }
    let len = candidate.chars().count();
    if !(5..=254).contains(&len) {
        return false;
    }
    VALID_EMAIL_RE.is_match(candidate)
}

/// Runs every strategy over a page and validates the union.
#[derive(Debug, Clone)]
pub struct EmailHarvester {
    include_inferred: bool,
}

impl EmailHarvester {
    pub fn new(config: &HarvestConfig) -> Self {
        Self {
            include_inferred: config.include_inferred,
        }
    }

    /// Harvest addresses with their confidence.
    pub fn harvest(&self, html: &str) -> HarvestedEmails {
        let document = Html::parse_document(html);

        let mut observed = Vec::new();
        observed.extend(Self::collect("plain_text", Ok(plain_text(html))));
        observed.extend(Self::collect("entity_decoded", Ok(entity_decoded(html))));
        observed.extend(Self::collect("mailto", mailto_links(&document)));
        observed.extend(Self::collect("data_attributes", data_attributes(&document)));
        observed.extend(Self::collect(
            "script_concatenation",
            script_concatenation(&document, html),
        ));
        observed.extend(Self::collect("encoded_at", Ok(encoded_at(html))));

        let mut harvest = HarvestedEmails::default();
        for candidate in observed {
            Self::admit(&mut harvest, candidate, Confidence::Observed);
        }

        if self.include_inferred {
            match academic::infer_email(&document, html) {
                Ok(Some(candidate)) => {
                    Self::admit(&mut harvest, candidate, Confidence::Inferred);
                }
                Ok(None) => {}
                Err(e) => log::debug!("Academic email inference skipped: {e}"),
            }
        }

        harvest
    }

    /// Harvest every validated address, observed or inferred.
    pub fn extract_emails(&self, html: &str) -> BTreeSet<String> {
        self.harvest(html).addresses()
    }

    fn collect(strategy: &str, result: Result<Vec<String>>) -> Vec<String> {
        match result {
            Ok(candidates) => {
                log::debug!("Email strategy {strategy}: {} candidates", candidates.len());
                candidates
            }
            Err(e) => {
                log::warn!("Email strategy {strategy} failed: {e}");
                Vec::new()
            }
        }
    }

    fn admit(harvest: &mut HarvestedEmails, candidate: String, confidence: Confidence) {
        if is_valid_email(&candidate) {
            harvest.insert(candidate, confidence);
        } else {
            log::debug!("Rejected email candidate {candidate:?}");
        }
    }
}

impl Default for EmailHarvester {
    fn default() -> Self {
        Self::new(&HarvestConfig::default())
    }
}

/// Harvest every validated address from raw HTML with default settings.
///
/// # Examples
/// ```
/// use pagesift::services::extract_emails_from_html;
///
/// let emails = extract_emails_from_html(r#"<a href="mailto:a@b.com?subject=x">x</a>"#);
/// assert_eq!(emails.into_iter().collect::<Vec<_>>(), vec!["a@b.com".to_string()]);
/// ```
pub fn extract_emails_from_html(html: &str) -> BTreeSet<String> {
    EmailHarvester::default().extract_emails(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plain_text_emails() {
        let html = r#"
            <p>Contact us at support@example.com for more information.</p>
            <p>Or email our team at team@example.org.</p>
        "#;
        let emails = extract_emails_from_html(html);
        assert!(emails.contains("support@example.com"));
        assert!(emails.contains("team@example.org"));
    }

    #[test]
    fn test_mailto_strips_query() {
        let emails = extract_emails_from_html(r#"<a href="mailto:a@b.com?subject=x">x</a>"#);
        assert_eq!(emails, set(&["a@b.com"]));
    }

    #[test]
    fn test_mailto_strategy_alone() {
        let document = Html::parse_document(
            r#"<a href="mailto:contact@example.com">Email</a>
               <a href="mailto:info@example.org?subject=Question">Ask</a>
               <a href="https://example.com">Home</a>"#,
        );
        assert_eq!(
            mailto_links(&document).unwrap(),
            vec!["contact@example.com", "info@example.org"]
        );
    }

    #[test]
    fn test_data_email_attribute() {
        let emails = extract_emails_from_html(r#"<span data-email="x@y.org"></span>"#);
        assert_eq!(emails, set(&["x@y.org"]));
    }

    #[test]
    fn test_data_name_and_domain() {
        let document = Html::parse_document(
            r#"<span data-name="contact" data-domain="example.com"></span>
               <span data-name="orphan"></span>
               <span data-email="info@example.org" data-name="ignored" data-domain="x.com"></span>"#,
        );
        assert_eq!(
            data_attributes(&document).unwrap(),
            vec!["contact@example.com", "info@example.org"]
        );
    }

    #[test]
    fn test_entity_encoded_at() {
        let emails = extract_emails_from_html("contact us at john&#64;example.com");
        assert_eq!(emails, set(&["john@example.com"]));
        assert_eq!(encoded_at("john&#64;example.com"), vec!["john@example.com"]);
    }

    #[test]
    fn test_hex_entity_needs_decoding() {
        let html = "write to jane&#x40;example.org";
        assert!(encoded_at(html).is_empty());
        assert_eq!(entity_decoded(html), vec!["jane@example.org"]);
        assert_eq!(extract_emails_from_html(html), set(&["jane@example.org"]));
    }

    #[test]
    fn test_numeric_reference_without_semicolon() {
        let html = "mail jo&commat;example.com or ann&#64example.org";
        assert!(encoded_at(html).is_empty());
        assert_eq!(
            extract_emails_from_html(html),
            set(&["ann@example.org", "jo@example.com"])
        );
    }

    #[test]
    fn test_unencodable_reference_left_alone() {
        assert_eq!(decode_numeric_refs("a&#xD800;b"), "a&#xD800;b");
        assert_eq!(decode_numeric_refs("x&#64y"), "x@y");
    }

    #[test]
    fn test_script_concatenation_fragment() {
        let emails = extract_emails_from_html(r#"var e = "u" + "@" + "d.com";"#);
        assert_eq!(emails, set(&["u@d.com"]));
    }

    #[test]
    fn test_script_concatenation_in_script_tag() {
        let html = r#"
            <script>
            var email = "user" + "@" + 'example.com';
            document.write('<a href="mailto:' + email + '">' + email + '</a>');
            </script>
        "#;
        let emails = extract_emails_from_html(html);
        assert_eq!(emails, set(&["user@example.com"]));
    }

    #[test]
    fn test_scripts_without_email_hints_are_skipped() {
        let document = Html::parse_document(r#"<script>var x = "a" + "b";</script>"#);
        assert!(script_concatenation(&document, "").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_candidates_filtered() {
        let html = r#"
            <p>This is not an email: @example.com</p>
            <p>Neither is this: john@</p>
            <p>This is valid: john.doe@example.com</p>
        "#;
        let emails = extract_emails_from_html(html);
        assert!(!emails.contains("@example.com"));
        assert!(!emails.contains("john@"));
        assert_eq!(emails, set(&["john.doe@example.com"]));
    }

    #[test]
    fn test_malformed_data_attribute_rejected() {
        let html = r#"<span data-email="not an email"></span><span data-name="a" data-domain="localhost"></span>"#;
        assert!(extract_emails_from_html(html).is_empty());
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@dept.uni.edu"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("john@"));
        assert!(!is_valid_email("john@localhost"));
        assert!(!is_valid_email("john@example.c"));
        assert!(!is_valid_email("a b@example.com"));
        assert!(!is_valid_email("a@b@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_length_bounds() {
        let long_local = "a".repeat(250);
        assert!(!is_valid_email(&format!("{long_local}@example.com")));
        assert!(is_valid_email(&format!("{}@example.com", "a".repeat(240))));
    }

    #[test]
    fn test_strategies_collapse_duplicates() {
        let html = r#"
            <a href="mailto:office@uni.edu">office@uni.edu</a>
            <span data-email="office@uni.edu"></span>
            office&#64;uni.edu
        "#;
        assert_eq!(extract_emails_from_html(html), set(&["office@uni.edu"]));
    }

    #[test]
    fn test_malformed_html_does_not_panic() {
        let html = "<div><a href=\"mailto:x@y.com\"<<span data-email='z@w.org'>></div></p></td>";
        assert_eq!(extract_emails_from_html(html), set(&["x@y.com", "z@w.org"]));
    }

    #[test]
    fn test_inferred_address_is_labeled() {
        let html = r#"
            <title>Prof. Jane Smith | University Profile</title>
            <h1>Jane Smith</h1>
            <p>Faculty Email: faculty-no-reply@xyz.edu</p>
        "#;
        let harvest = EmailHarvester::default().harvest(html);

        assert_eq!(
            harvest.confidence("faculty-no-reply@xyz.edu"),
            Some(Confidence::Observed)
        );
        assert_eq!(
            harvest.confidence("jane.smith@xyz.edu"),
            Some(Confidence::Inferred)
        );
        assert_eq!(harvest.preferred(), Some("faculty-no-reply@xyz.edu"));
    }

    #[test]
    fn test_inference_can_be_disabled() {
        let html = "<h1>Jane Smith</h1><p>office@xyz.edu</p>";
        let harvester = EmailHarvester::new(&HarvestConfig {
            include_inferred: false,
        });
        assert_eq!(harvester.extract_emails(html), set(&["office@xyz.edu"]));
    }

    #[test]
    fn test_deterministic() {
        let html = r#"<a href="mailto:b@x.org">b</a> a@x.org <span data-email="c@x.org"></span>"#;
        assert_eq!(extract_emails_from_html(html), extract_emails_from_html(html));
    }
}
