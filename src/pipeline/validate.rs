// src/pipeline/validate.rs

use crate::error::Result;
use crate::models::Config;

/// Validate configuration and report the effective settings.
pub fn run_validate(config: &Config) -> Result<()> {
    config.validate()?;

    let range = config.pagination.page_range()?;
    log::info!("Configuration valid");
    log::info!(
        "  Pagination: start page {}, end page {}",
        range.start(),
        range
            .end()
            .map_or_else(|| "unbounded".to_string(), |end| end.to_string())
    );
    log::info!("  Inferred emails: {}", config.harvest.include_inferred);
    log::info!("  Storage: {}", config.storage.root_dir.display());
    Ok(())
}
