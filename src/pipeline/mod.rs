// src/pipeline/mod.rs

//! Pipeline entry points for pagesift operations.
//!
//! - `run_resolve`: Resolve classifier candidates into pages worth fetching
//! - `run_store`: Capture raw markup for a URL
//! - `run_harvest`: Discover emails in stored or on-disk markup
//! - `run_schema`: Listing shape to request from the extractor
//! - `run_enrich`: Backfill listing emails from stored markup
//! - `run_validate`: Check configuration

pub mod harvest;
pub mod resolve;
pub mod validate;

pub use harvest::{HarvestSource, run_enrich, run_harvest, run_schema, run_store};
pub use resolve::{ResolveRequest, run_resolve};
pub use validate::run_validate;
