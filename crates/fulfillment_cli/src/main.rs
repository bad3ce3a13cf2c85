mod commands;
mod output;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fulfillment")]
#[command(version, about = "Raw fulfillment data contracts CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Options shared by commands that read raw partitions.
#[derive(Args)]
struct RunArgs {
    /// Rule catalog file (YAML or TOML); defaults to the built-in catalog
    #[arg(short, long)]
    catalog: Option<String>,

    /// Raw data directory (overrides RAW_DATA_BASE_PATH)
    #[arg(long)]
    raw_path: Option<String>,

    /// Also process the test partition (same as VALIDATE_TEST=true)
    #[arg(long)]
    include_test: bool,

    /// Output format: text, json
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate raw partitions against the rule catalog
    Validate {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Strip violating rows and write contracted tables
    Enforce {
        #[command(flatten)]
        run: RunArgs,

        /// Contracted output directory (overrides CONTRACTED_DATA_BASE_PATH)
        #[arg(short, long)]
        output_path: Option<String>,
    },

    /// Check a rule catalog and print its summary
    Catalog {
        /// Rule catalog file (YAML or TOML); defaults to the built-in catalog
        #[arg(short, long)]
        catalog: Option<String>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    // Execute command
    match cli.command {
        Commands::Validate { run } => {
            commands::validate::execute(
                run.catalog.as_deref(),
                run.raw_path.as_deref(),
                run.include_test,
                &run.format,
            )
            .await
        }

        Commands::Enforce { run, output_path } => {
            commands::enforce::execute(
                run.catalog.as_deref(),
                run.raw_path.as_deref(),
                output_path.as_deref(),
                run.include_test,
                &run.format,
            )
            .await
        }

        Commands::Catalog { catalog, format } => {
            commands::catalog::execute(catalog.as_deref(), &format)
        }
    }
}
