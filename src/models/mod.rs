// src/models/mod.rs

//! Domain models for pagesift.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod email;
mod page;

// Re-export all public types
pub use config::{Config, HarvestConfig, LoggingConfig, PaginationConfig, StorageConfig};
pub use email::{Confidence, HarvestedEmail, HarvestedEmails};
pub use page::{PageRange, ResolvedPage, ResolvedPageSet};
