//! # WikiGraph CLI Module
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `health` - Check database connectivity
//! - `analytics` - Graph totals and top lists
//! - `pagerank` - Rank Articles by importance
//! - `louvain` - Detect communities
//! - `similar` - Articles similar to one Article
//! - `path` - Shortest path between two Articles
//! - `recommend` - Recommendations for one Article
//! - `query` - Run a raw Cypher statement

mod commands;

use crate::config::Settings;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wikigraph_core::WikiGraphError;
use wikigraph_core::primitives::{
    DEFAULT_PATH_DEPTH, DEFAULT_RECOMMENDATION_LIMIT, DEFAULT_TOP_N,
};

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// WikiGraph - knowledge graph query and analytics server
///
/// Serves lookups, path finding, recommendations, analytics and graph
/// algorithms over an Article/Community graph held in Neo4j.
#[derive(Parser, Debug)]
#[command(name = "wikigraph")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// TOML settings file (overrides WIKIGRAPH_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides settings)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides settings)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check database connectivity
    Health,

    /// Show graph totals, top communities and top articles
    Analytics {
        /// Number of entries in each top list
        #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,
    },

    /// Rank articles with PageRank
    Pagerank {
        #[arg(long, default_value_t = 20)]
        max_iterations: u32,

        #[arg(long, default_value_t = 0.85)]
        damping_factor: f64,

        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Detect communities with Louvain
    Louvain {
        #[arg(long, default_value_t = 10)]
        max_levels: u32,

        /// Keep intermediate community levels
        #[arg(long)]
        include_intermediate: bool,
    },

    /// Find articles similar to one article
    Similar {
        /// Source article_id property
        article_id: String,

        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Minimum similarity score
        #[arg(long, default_value_t = 0.1)]
        cutoff: f64,
    },

    /// Shortest path between two articles
    Path {
        /// Source article id
        source: i64,

        /// Target article id
        target: i64,

        #[arg(short = 'd', long, default_value_t = DEFAULT_PATH_DEPTH)]
        max_depth: u32,
    },

    /// Recommend articles related to one article
    Recommend {
        /// Source article id
        article_id: i64,

        #[arg(short, long, default_value_t = DEFAULT_RECOMMENDATION_LIMIT)]
        limit: usize,

        /// community, references or hybrid
        #[arg(short, long, default_value = "community")]
        strategy: String,
    },

    /// Execute a raw Cypher statement
    Query {
        /// Cypher text
        cypher: String,

        /// Parameters as a JSON object
        #[arg(short, long)]
        params: Option<String>,

        /// Run in a write transaction
        #[arg(short, long)]
        write: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), WikiGraphError> {
    let settings = Settings::load(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => cmd_server(settings, host, port).await,
        Some(Commands::Health) | None => cmd_health(&settings, json_mode).await,
        Some(Commands::Analytics { top_n }) => cmd_analytics(&settings, json_mode, top_n).await,
        Some(Commands::Pagerank {
            max_iterations,
            damping_factor,
            limit,
        }) => {
            cmd_pagerank(
                &settings,
                json_mode,
                max_iterations,
                damping_factor,
                limit,
            )
            .await
        }
        Some(Commands::Louvain {
            max_levels,
            include_intermediate,
        }) => cmd_louvain(&settings, json_mode, max_levels, include_intermediate).await,
        Some(Commands::Similar {
            article_id,
            limit,
            cutoff,
        }) => cmd_similar(&settings, json_mode, article_id, limit, cutoff).await,
        Some(Commands::Path {
            source,
            target,
            max_depth,
        }) => cmd_path(&settings, json_mode, source, target, max_depth).await,
        Some(Commands::Recommend {
            article_id,
            limit,
            strategy,
        }) => cmd_recommend(&settings, json_mode, article_id, limit, &strategy).await,
        Some(Commands::Query {
            cypher,
            params,
            write,
        }) => cmd_query(&settings, json_mode, &cypher, params.as_deref(), write).await,
    }
}
