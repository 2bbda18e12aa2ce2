//! CLI entry point for sitestore

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sitestore::commands;
use sitestore::content::FrontMatterFormat;

#[derive(Parser)]
#[command(name = "sitestore")]
#[command(version)]
#[command(about = "Load front-matter content records for a static site", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List records, newest first
    #[command(alias = "ls")]
    List,

    /// List tags with record counts
    Tags,

    /// Report malformed files and metadata warnings
    Check {
        /// Fail on warnings too
        #[arg(long)]
        strict: bool,
    },

    /// Export records as JSON
    Export {
        /// One JSON object per line instead of an array
        #[arg(short, long)]
        lines: bool,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create a new content file
    New {
        /// Title of the new record
        title: String,

        /// Front-matter format (toml, yaml)
        #[arg(short, long)]
        format: Option<FrontMatterFormat>,

        /// Tag to add; repeat for several
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Summary line
        #[arg(long)]
        description: Option<String>,

        /// File name without extension
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Re-run the check whenever content changes
    #[command(alias = "w")]
    Watch {
        /// Treat warnings as failures
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "sitestore=debug,info"
    } else {
        "sitestore=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    let site = sitestore::Site::new(&base_dir)?;

    match cli.command {
        Commands::List => commands::list::run(&site)?,

        Commands::Tags => commands::tags::run(&site)?,

        Commands::Check { strict } => commands::check::run(&site, strict)?,

        Commands::Export { lines, output } => {
            commands::export::run(&site, lines, output.as_deref())?;
        }

        Commands::New {
            title,
            format,
            tags,
            description,
            path,
        } => {
            tracing::info!("Creating new record with title: {}", title);
            let opts = commands::new::NewRecord {
                title: &title,
                format,
                tags,
                description: description.as_deref(),
                path: path.as_deref(),
            };
            let created = commands::new::create_record(&site, &opts)?;
            println!("Created: {:?}", created);
        }

        Commands::Watch { strict } => commands::watch::run(&site, strict).await?,
    }

    Ok(())
}
