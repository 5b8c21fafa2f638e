//! # Content Gate CLI (`cgate`)
//!
//! ## Usage
//!
//! ```bash
//! cgate --config ./config/cgate.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `cgate serve` | Start the HTTP server (CORS + transform + sync hook) |
//! | `cgate indexes [type]` | Print index settings as JSON |
//! | `cgate transform <type> <file>` | Print the documents a records file produces |
//! | `cgate sync <type> <file>` | Transform records and upsert them into the index |
//! | `cgate configure [type]` | Create indexes and push their attribute settings |
//! | `cgate check-origin [origin]` | Evaluate the configured origin allow-list |
//!
//! Content types: `industry`, `blog-post`, `laboratory`, `resource`,
//! `video`, `team-member`.

use clap::{Parser, Subcommand};
use content_gate::{config, cors, indexes, logging, server, sync};
use content_gate_core::ContentType;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "./config/cgate.toml";

/// Content Gate: cross-origin admission and search index sync for a
/// headless CMS.
#[derive(Parser)]
#[command(name = "cgate", version, about)]
struct Cli {
    /// Path to a TOML configuration file.
    ///
    /// Defaults to `./config/cgate.toml` when that file exists; otherwise
    /// built-in defaults plus environment variables are used.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    Serve,

    /// Print index settings (name, populate, searchable, displayed).
    Indexes {
        /// Limit output to one content type.
        content_type: Option<ContentType>,
    },

    /// Transform a JSON file of populated records and print the documents.
    ///
    /// The file may hold one record, an array of records, or a
    /// `{ "data": [...] }` envelope.
    Transform {
        content_type: ContentType,
        file: PathBuf,
    },

    /// Transform a JSON file of populated records and upsert them.
    Sync {
        content_type: ContentType,
        file: PathBuf,

        /// Show counts without contacting the search service.
        #[arg(long)]
        dry_run: bool,
    },

    /// Create indexes and apply their attribute settings.
    Configure {
        /// Limit to one content type.
        content_type: Option<ContentType>,
    },

    /// Check whether an origin would receive CORS headers.
    ///
    /// Omit the origin to see how a request without an `Origin` header is
    /// treated.
    CheckOrigin { origin: Option<String> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(|| {
        let default = Path::new(DEFAULT_CONFIG_PATH);
        default.exists().then(|| default.to_path_buf())
    });
    let cfg = config::load_config(config_path.as_deref())?;

    logging::init(&cfg.logging);

    match cli.command {
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Indexes { content_type } => {
            indexes::run_list(content_type)?;
        }
        Commands::Transform { content_type, file } => {
            sync::run_transform(content_type, &file)?;
        }
        Commands::Sync {
            content_type,
            file,
            dry_run,
        } => {
            sync::run_sync(&cfg, content_type, &file, dry_run).await?;
        }
        Commands::Configure { content_type } => {
            indexes::run_configure(&cfg, content_type).await?;
        }
        Commands::CheckOrigin { origin } => {
            cors::run_check_origin(&cfg, origin.as_deref())?;
        }
    }

    Ok(())
}
