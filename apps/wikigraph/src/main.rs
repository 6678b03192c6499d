//! # WikiGraph - Knowledge Graph Server
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    apps/wikigraph (THE BINARY)                │
//! │                                                              │
//! │   ┌─────────────┐    ┌─────────────┐                         │
//! │   │    CLI      │    │  HTTP API   │                         │
//! │   │   (clap)    │    │   (axum)    │                         │
//! │   └──────┬──────┘    └──────┬──────┘                         │
//! │          └────────┬─────────┘                                │
//! │                   ▼                                          │
//! │           ┌───────────────┐     ┌────────────────────────┐   │
//! │           │ GraphService  │────►│ AlgorithmOrchestrator  │   │
//! │           └───────┬───────┘     └───────────┬────────────┘   │
//! │                   ▼                         ▼                │
//! │           ┌──────────────────────────────────────┐           │
//! │           │   GraphGateway (neo4rs, Bolt pool)   │           │
//! │           └──────────────────────────────────────┘           │
//! │                                                              │
//! │        queries and scoring: wikigraph-core (THE LOGIC)       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! wikigraph server --host 0.0.0.0 --port 8000
//! wikigraph analytics -n 5
//! wikigraph path 100 500 --max-depth 6
//! wikigraph pagerank --limit 20 --json-mode
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wikigraph::cli;

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // WIKIGRAPH_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("WIKIGRAPH_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "wikigraph=debug,wikigraph_core=debug,tower_http=debug"
    } else {
        "wikigraph=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_banner() {
    println!(
        r#"
  ██╗    ██╗██╗██╗  ██╗██╗ ██████╗ ██████╗  █████╗ ██████╗ ██╗  ██╗
  ██║    ██║██║██║ ██╔╝██║██╔════╝ ██╔══██╗██╔══██╗██╔══██╗██║  ██║
  ██║ █╗ ██║██║█████╔╝ ██║██║  ███╗██████╔╝███████║██████╔╝███████║
  ██║███╗██║██║██╔═██╗ ██║██║   ██║██╔══██╗██╔══██║██╔═══╝ ██╔══██║
  ╚███╔███╔╝██║██║  ██╗██║╚██████╔╝██║  ██║██║  ██║██║     ██║  ██║
   ╚══╝╚══╝ ╚═╝╚═╝  ╚═╝╚═╝ ╚═════╝ ╚═╝  ╚═╝╚═╝  ╚═╝╚═╝     ╚═╝  ╚═╝

  Knowledge Graph Server v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
