//! sqljoin
//!
//! Joins a directory of SQL definition files into one script, ordered so
//! that every file comes after the files it depends on.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sqljoin_core::config::{Config, CONFIG_FILE};
use sqljoin_engine::{join_directory, SourceWalker};

/// sqljoin - order and concatenate SQL schema files by dependency
#[derive(Parser)]
#[command(name = "sqljoin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing the schema
    #[arg(short, long)]
    dir: PathBuf,

    /// Skip any file whose path contains this substring (repeatable)
    #[arg(short, long)]
    ignore: Vec<String>,

    /// Print each file's parse tree as JSON before the script
    #[arg(long)]
    json: bool,

    /// Print the resolved dependency graph to stderr
    #[arg(long)]
    graph: bool,

    /// Write the joined script to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to config file (default: sqljoin.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Load config if specified
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new(CONFIG_FILE).exists() {
        Config::from_file(Path::new(CONFIG_FILE))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    if cli.verbose {
        eprintln!("{} dialect: {:?}", "Using".cyan(), config.dialect);
    }

    let walker = SourceWalker::from_config(&cli.dir, &config).with_ignore(cli.ignore.iter().cloned());

    let print_json = cli.json;
    let joined = join_directory(&walker, &config, |parsed| {
        if !print_json {
            return;
        }
        match parsed.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => tracing::warn!(error = %e, "could not render parse tree"),
        }
    })
    .with_context(|| format!("failed to join schema in {}", cli.dir.display()))?;

    if cli.graph {
        eprint!("{}", joined.graph);
    }

    if cli.verbose {
        eprintln!(
            "{} {} files ({} dependencies)",
            "Joined".green(),
            joined.order.len(),
            joined.graph.edge_count()
        );
        for (i, unit) in joined.order.iter().enumerate() {
            eprintln!("  {}. {}", i + 1, unit);
        }
    }

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &joined.script)
                .with_context(|| format!("failed to write {}", path.display()))?;
            if cli.verbose {
                eprintln!("{} {}", "Script saved to:".green(), path.display());
            }
        }
        None => println!("{}", joined.script),
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins, otherwise `-v` selects debug
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
