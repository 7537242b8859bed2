// src/models/email.rs

//! Harvested email addresses and their confidence.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// How an address came to be in the harvest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Seen on the page, possibly behind obfuscation
    Observed,
    /// Synthesized from a person's name and a domain found elsewhere
    Inferred,
}

/// One validated address with its confidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestedEmail {
    pub address: String,
    pub confidence: Confidence,
}

/// Deduplicated result of harvesting one page.
///
/// An address that was both observed and inferred is recorded as observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestedEmails {
    entries: BTreeMap<String, Confidence>,
}

impl HarvestedEmails {
    pub(crate) fn insert(&mut self, address: String, confidence: Confidence) {
        self.entries
            .entry(address)
            .and_modify(|existing| *existing = (*existing).min(confidence))
            .or_insert(confidence);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, address: &str) -> bool {
        self.entries.contains_key(address)
    }

    pub fn confidence(&self, address: &str) -> Option<Confidence> {
        self.entries.get(address).copied()
    }

    /// Every address, regardless of confidence.
    pub fn addresses(&self) -> BTreeSet<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn observed(&self) -> impl Iterator<Item = &str> {
        self.with_confidence(Confidence::Observed)
    }

    pub fn inferred(&self) -> impl Iterator<Item = &str> {
        self.with_confidence(Confidence::Inferred)
    }

    /// Best single address for a record: the first observed one, else the
    /// first inferred one.
    pub fn preferred(&self) -> Option<&str> {
        self.observed().next().or_else(|| self.inferred().next())
    }

    pub fn to_vec(&self) -> Vec<HarvestedEmail> {
        self.entries
            .iter()
            .map(|(address, confidence)| HarvestedEmail {
                address: address.clone(),
                confidence: *confidence,
            })
            .collect()
    }

    fn with_confidence(&self, wanted: Confidence) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |(_, c)| **c == wanted)
            .map(|(address, _)| address.as_str())
    }
}
