// src/services/listings.rs

//! Backfill of harvested emails into extracted listing records.
//!
//! The extraction collaborator returns `{"listings": [{...}, ...]}` with one
//! object per record. Its email field is often empty or `"N/A"` when the
//! address was obfuscated on the page; the harvest fills those gaps.

use serde_json::{Map, Value, json};

use crate::models::HarvestedEmails;

/// Field name the extraction schema always carries.
pub const EMAIL_FIELD: &str = "email";

/// Placeholder the extractor writes when it found no value.
const MISSING: &str = "N/A";

/// Make sure the requested field list asks the extractor for an email.
pub fn ensure_email_field(fields: &mut Vec<String>) {
    if !fields.iter().any(|f| f == EMAIL_FIELD) {
        fields.push(EMAIL_FIELD.to_string());
    }
}

/// Record shape the extractor is asked to return for the given fields:
/// `{"listings": [{"<field>": "string", ...}]}`, always including `email`.
pub fn listing_schema(fields: &[String]) -> Value {
    let mut fields = fields.to_vec();
    ensure_email_field(&mut fields);

    let listing: Map<String, Value> = fields
        .into_iter()
        .map(|field| (field, Value::String("string".to_string())))
        .collect();
    json!({ "listings": [listing] })
}

/// Whether an extracted email value counts as present. Empty and placeholder
/// values do not; other non-empty values are left alone.
fn has_email(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(email)) => !email.trim().is_empty() && email != MISSING,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(fields)) => !fields.is_empty(),
    }
}

/// Fill listings whose email is missing, empty, or `"N/A"` with the
/// harvest's preferred address. Returns how many listings were filled.
///
/// Records that are not `{"listings": [...]}` and listings that already
/// carry an email are left untouched.
pub fn fill_missing_emails(record: &mut Value, emails: &HarvestedEmails) -> usize {
    let Some(preferred) = emails.preferred() else {
        return 0;
    };
    let Some(listings) = record.get_mut("listings").and_then(Value::as_array_mut) else {
        return 0;
    };

    let mut filled = 0;
    for listing in listings.iter_mut().filter_map(Value::as_object_mut) {
        if !has_email(listing.get(EMAIL_FIELD)) {
            listing.insert(EMAIL_FIELD.to_string(), Value::String(preferred.to_string()));
            filled += 1;
        }
    }

    if filled > 0 {
        log::debug!("Filled {filled} listing emails with {preferred}");
    }
    filled
}
