//! pagesift CLI
//!
//! Local entry point over the `pipeline` functions. Results go to stdout as
//! JSON; progress goes to the log.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};
use pagesift::{
    error::{AppError, Result},
    models::Config,
    pipeline::{self, HarvestSource, ResolveRequest},
    storage::LocalStorage,
};

/// pagesift - pagination and email extraction for scraped listings
#[derive(Parser, Debug)]
#[command(name = "pagesift", version, about = "Pagination and email extraction")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "storage/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve pagination candidates into pages worth fetching
    Resolve {
        /// URLs that were already fetched
        #[arg(long = "original", required = true)]
        originals: Vec<String>,

        /// Candidate URLs
        #[arg(long = "candidate")]
        candidates: Vec<String>,

        /// Files holding classifier responses (`{"page_urls": [...]}`)
        #[arg(long = "candidates-json")]
        candidates_json: Vec<PathBuf>,

        /// First page to keep (default: pagination.start_page)
        #[arg(long)]
        start: Option<u32>,

        /// Last page to keep (default: pagination.end_page)
        #[arg(long)]
        end: Option<u32>,
    },

    /// Harvest email addresses from markup
    #[command(group(ArgGroup::new("source").required(true).args(["file", "key"])))]
    Harvest {
        /// HTML file to read
        #[arg(long)]
        file: Option<PathBuf>,

        /// Key of previously stored markup
        #[arg(long)]
        key: Option<String>,
    },

    /// Store raw markup for a URL and print its key
    Store {
        #[arg(long)]
        url: String,

        #[arg(long)]
        file: PathBuf,
    },

    /// Print the listing schema to request from the extractor
    Schema {
        /// Field to extract (repeatable); `email` is always added
        #[arg(long = "field", required = true)]
        fields: Vec<String>,
    },

    /// Fill missing listing emails from stored markup
    Enrich {
        #[arg(long)]
        key: String,

        /// JSON file shaped `{"listings": [...]}`
        #[arg(long)]
        listings: PathBuf,
    },

    /// Validate configuration
    Validate,
}

/// Initialize logging from the verbosity flag or the configured level.
fn init_logging(verbose: bool, config: &Config) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging depends on the config, so load errors are reported after init.
    let loaded = Config::load(&cli.config);
    let config = loaded.as_ref().cloned().unwrap_or_default();
    init_logging(cli.verbose, &config);
    match loaded {
        Ok(_) => log::debug!("Loaded configuration from {}", cli.config.display()),
        Err(e) => log::warn!(
            "Failed to load config from {}: {}. Using defaults.",
            cli.config.display(),
            e
        ),
    }

    let storage = LocalStorage::new(&config.storage.root_dir);

    match cli.command {
        Command::Resolve {
            originals,
            candidates,
            candidates_json,
            start,
            end,
        } => {
            let mut classifier_responses = Vec::with_capacity(candidates_json.len());
            for path in &candidates_json {
                classifier_responses.push(tokio::fs::read_to_string(path).await?);
            }

            let request = ResolveRequest {
                originals,
                candidates,
                classifier_responses,
                start_page: start,
                end_page: end,
            };
            let resolved = pipeline::run_resolve(&config, &request)?;
            println!("{}", serde_json::to_string_pretty(&resolved)?);
        }

        Command::Harvest { file, key } => {
            let source = match (file, key) {
                (Some(path), _) => HarvestSource::File(path),
                (None, Some(key)) => HarvestSource::Stored(key),
                (None, None) => return Err(AppError::config("harvest needs --file or --key")),
            };
            let emails = pipeline::run_harvest(&config, &storage, &source).await?;
            println!("{}", serde_json::to_string_pretty(&emails.to_vec())?);
        }

        Command::Store { url, file } => {
            let markup = tokio::fs::read_to_string(&file).await?;
            let key = pipeline::run_store(&storage, &url, markup).await?;
            println!("{key}");
        }

        Command::Schema { fields } => {
            let schema = pipeline::run_schema(&fields);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }

        Command::Enrich { key, listings } => {
            let content = tokio::fs::read_to_string(&listings).await?;
            let record = serde_json::from_str(&content)?;
            let enriched = pipeline::run_enrich(&config, &storage, &key, record).await?;
            println!("{}", serde_json::to_string_pretty(&enriched)?);
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = pipeline::run_validate(&config) {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("All validations passed!");
        }
    }

    Ok(())
}
