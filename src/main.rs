//! # filerec CLI
//!
//! The `filerec` binary runs the recommendation HTTP server and provides
//! one-shot commands for ranking and for inspecting the corpus snapshot.
//!
//! ## Usage
//!
//! ```bash
//! filerec --config ./config/filerec.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `filerec serve` | Start the JSON HTTP server |
//! | `filerec recommend --input saved.json` | Rank once and print results |
//! | `filerec corpus` | Fetch and print the metadata snapshot |

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use filerec::cache;
use filerec::config::{self, Config};
use filerec::engine::Engine;
use filerec::metadata::{CorpusSource, HttpMetadataSource};
use filerec::models::SavedFile;
use filerec::server;

/// filerec — a cached TF-IDF recommendation service for shared study files.
#[derive(Parser)]
#[command(
    name = "filerec",
    about = "filerec — recommends study files by textual similarity to the user's saved files",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/filerec.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the JSON HTTP server.
    Serve,

    /// Rank the corpus once against a saved-files JSON file and print the
    /// recommendations.
    ///
    /// The input file holds a JSON array of saved files:
    /// `[{"_id": "...", "course": "...", "school": "..."}, ...]`.
    Recommend {
        /// Path to the saved-files JSON file.
        #[arg(long)]
        input: PathBuf,

        /// Override the configured number of results.
        #[arg(long)]
        top_k: Option<usize>,
    },

    /// Fetch the corpus snapshot from the metadata service and print it.
    ///
    /// Useful for verifying connectivity and configuration before serving.
    Corpus,
}

fn build_engine(config: &Config) -> Result<Engine> {
    let source = HttpMetadataSource::new(&config.metadata)?;
    let store = cache::create_store(&config.cache)?;
    Ok(Engine::new(config, Box::new(source), store))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Serve => {
            let engine = Arc::new(build_engine(&cfg)?);
            server::run_server(&cfg, engine).await?;
        }
        Commands::Recommend { input, top_k } => {
            if let Some(k) = top_k {
                anyhow::ensure!(k >= 1, "--top-k must be >= 1");
                cfg.ranking.top_k = k;
            }

            let content = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read input file: {}", input.display()))?;
            let saved: Vec<SavedFile> = serde_json::from_str(&content)
                .with_context(|| "Input must be a JSON array of saved files")?;

            let engine = build_engine(&cfg)?;
            let results = engine.recommend(&saved).await?;

            if results.is_empty() {
                println!("No recommendations.");
            } else {
                for (i, file) in results.iter().enumerate() {
                    println!("{}. {} / {}", i + 1, file.course, file.school);
                    println!("    id: {}", file.id);
                }
            }
        }
        Commands::Corpus => {
            let source = HttpMetadataSource::new(&cfg.metadata)?;
            let items = source.load().await?;
            println!("{} files in corpus:", items.len());
            for item in &items {
                println!("  {} — {} / {}", item.id, item.course, item.school);
            }
        }
    }

    Ok(())
}
