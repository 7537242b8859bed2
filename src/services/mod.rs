// src/services/mod.rs

//! Service layer for pagesift.
//!
//! This module contains the decision logic for:
//! - Page number extraction (`extract_page_number`, `is_likely_first_page`)
//! - Pagination candidate resolution (`PaginationResolver`)
//! - Email discovery (`EmailHarvester`)
//! - Listing schema and email backfill (`listing_schema`, `fill_missing_emails`)

pub mod academic;
pub mod emails;
pub mod listings;
pub mod page_number;
pub mod pagination;

pub use emails::{EmailHarvester, extract_emails_from_html, is_valid_email};
pub use listings::{ensure_email_field, fill_missing_emails, listing_schema};
pub use page_number::{extract_page_number, is_likely_first_page};
pub use pagination::{PaginationResolver, merge_candidates, parse_classifier_response, resolve};
