// src/lib.rs

//! pagesift: pagination resolution and email harvesting for scraped pages.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
