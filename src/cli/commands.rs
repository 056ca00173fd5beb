use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "issuesim", about = "Find previously indexed issues similar to a new one")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Index a single issue
    Index {
        /// JSON data with summary, and optional jira_key and description
        json: String,
    },
    /// Index every issue in a JSON array file
    Bulk {
        file: PathBuf,
    },
    /// Rank indexed issues by similarity to a new one
    Similar {
        summary: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        jira_key: Option<String>,
        /// Maximum number of results (defaults to ISSUESIM_TOP_K)
        #[arg(long)]
        top_k: Option<usize>,
        /// Minimum cosine similarity, 0.0 to 1.0 (defaults to ISSUESIM_MIN_SCORE)
        #[arg(long)]
        min_score: Option<f64>,
        /// Do not add the query issue to the index
        #[arg(long)]
        no_store: bool,
    },
    /// List indexed issues
    List {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show store statistics
    Stats,
}
