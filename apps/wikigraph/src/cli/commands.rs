//! # CLI Command Implementations
//!
//! Every command connects a [`GraphService`] from the resolved settings,
//! runs one operation, prints text or JSON, and closes the service.

use crate::api;
use crate::config::Settings;
use crate::service::{DatabaseState, GraphService};
use serde::Serialize;
use std::sync::Arc;
use wikigraph_core::{
    LouvainParams, PageRankParams, Params, SimilarityParams, Strategy, WikiGraphError,
};

// =============================================================================
// HELPERS
// =============================================================================

fn print_json<T: Serialize>(value: &T) -> Result<(), WikiGraphError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| WikiGraphError::Io(format!("Cannot render JSON: {}", e)))?;
    println!("{}", text);
    Ok(())
}

/// Parse `--params` as a JSON object.
fn parse_params(raw: Option<&str>) -> Result<Params, WikiGraphError> {
    match raw {
        None => Ok(Params::new()),
        Some(text) => serde_json::from_str::<Params>(text).map_err(|e| {
            WikiGraphError::Validation(format!("--params must be a JSON object: {}", e))
        }),
    }
}

/// Connect, run, close; the service is closed on error too.
async fn with_service<T, F, Fut>(settings: &Settings, run: F) -> Result<T, WikiGraphError>
where
    F: FnOnce(Arc<GraphService>) -> Fut,
    Fut: Future<Output = Result<T, WikiGraphError>>,
{
    let service = Arc::new(GraphService::connect(settings).await?);
    let outcome = run(service.clone()).await;
    service.close().await;
    outcome
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

pub async fn cmd_server(
    mut settings: Settings,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), WikiGraphError> {
    if let Some(host) = host {
        settings.server.host = host;
    }
    if let Some(port) = port {
        settings.server.port = port;
    }

    let service = Arc::new(GraphService::connect(&settings).await?);

    println!("WikiGraph Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:       {}", settings.server.host);
    println!("  Port:       {}", settings.server.port);
    println!("  Neo4j:      {}", settings.neo4j.uri);
    println!(
        "  Algorithms: {}",
        if settings.algorithms.native_enabled {
            "native with fallback"
        } else {
            "fallback only"
        }
    );
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(service, &settings.server).await
}

// =============================================================================
// HEALTH COMMAND
// =============================================================================

pub async fn cmd_health(settings: &Settings, json_mode: bool) -> Result<(), WikiGraphError> {
    let health = with_service(settings, |service| async move { Ok(service.health().await) }).await?;

    if json_mode {
        return print_json(&health);
    }
    let database = match health.database {
        DatabaseState::Connected => "connected",
        DatabaseState::Disconnected => "disconnected",
    };
    println!("WikiGraph Health");
    println!("================");
    println!("Neo4j:    {}", settings.neo4j.uri);
    println!("Database: {}", database);
    Ok(())
}

// =============================================================================
// ANALYTICS COMMAND
// =============================================================================

pub async fn cmd_analytics(
    settings: &Settings,
    json_mode: bool,
    top_n: usize,
) -> Result<(), WikiGraphError> {
    let analytics =
        with_service(settings, |service| async move { service.analytics(top_n).await }).await?;

    if json_mode {
        return print_json(&analytics);
    }

    println!("WikiGraph Analytics");
    println!("===================");
    println!("Articles:    {}", analytics.total_articles);
    println!("Communities: {}", analytics.total_communities);
    println!("Edges:       {}", analytics.total_edges);
    println!("Avg degree:  {:.2}", analytics.avg_degree);
    println!();
    println!("Top communities:");
    for community in &analytics.top_communities {
        println!(
            "  #{:<8} {} articles, {} internal edges",
            community.community_id, community.article_count, community.internal_edges
        );
    }
    println!();
    println!("Top articles:");
    for article in &analytics.top_articles {
        println!("  #{:<8} degree {}", article.article_id, article.degree);
    }
    Ok(())
}

// =============================================================================
// ALGORITHM COMMANDS
// =============================================================================

pub async fn cmd_pagerank(
    settings: &Settings,
    json_mode: bool,
    max_iterations: u32,
    damping_factor: f64,
    limit: usize,
) -> Result<(), WikiGraphError> {
    let params = PageRankParams {
        max_iterations,
        damping_factor,
        limit,
    };
    params.validate()?;
    let report =
        with_service(settings, |service| async move { service.run_pagerank(params).await }).await?;

    if json_mode {
        return print_json(&report);
    }
    println!(
        "PageRank ({}) over {} nodes in {:.1} ms",
        report.algorithm, report.total_nodes, report.execution_time_ms
    );
    for entry in &report.results {
        println!(
            "  {:>3}. {:<40} {:.6}",
            entry.rank,
            entry.article_title.as_deref().unwrap_or("-"),
            entry.score
        );
    }
    Ok(())
}

pub async fn cmd_louvain(
    settings: &Settings,
    json_mode: bool,
    max_levels: u32,
    include_intermediate: bool,
) -> Result<(), WikiGraphError> {
    let params = LouvainParams {
        max_levels,
        include_intermediate_communities: include_intermediate,
    };
    params.validate()?;
    let report =
        with_service(settings, |service| async move { service.run_louvain(params).await }).await?;

    if json_mode {
        return print_json(&report);
    }
    println!(
        "Louvain ({}): {} communities, modularity {:.4}, {:.1} ms",
        report.algorithm, report.total_communities, report.modularity, report.execution_time_ms
    );
    for community in &report.communities {
        println!(
            "  #{:<8} size {:<6} modularity {:.4}",
            community.community_id, community.size, community.modularity
        );
    }
    Ok(())
}

pub async fn cmd_similar(
    settings: &Settings,
    json_mode: bool,
    article_id: String,
    limit: usize,
    cutoff: f64,
) -> Result<(), WikiGraphError> {
    let params = SimilarityParams {
        article_id,
        limit,
        similarity_cutoff: cutoff,
    };
    params.validate()?;
    let report =
        with_service(settings, |service| async move { service.run_similarity(params).await })
            .await?;

    if json_mode {
        return print_json(&report);
    }
    println!(
        "Similar to {} ({}) via {}",
        report.source_article_id, report.source_article_title, report.algorithm
    );
    if report.similar_articles.is_empty() {
        println!("  (none)");
    }
    for article in &report.similar_articles {
        println!(
            "  {:<40} {:.3} ({} common)",
            article.article_title.as_deref().unwrap_or("-"),
            article.similarity_score,
            article.common_neighbors
        );
    }
    Ok(())
}

// =============================================================================
// QUERY COMMANDS
// =============================================================================

pub async fn cmd_path(
    settings: &Settings,
    json_mode: bool,
    source: i64,
    target: i64,
    max_depth: u32,
) -> Result<(), WikiGraphError> {
    let result = with_service(settings, |service| async move {
        service.shortest_path(source, target, max_depth).await
    })
    .await?;

    if json_mode {
        return print_json(&result);
    }
    if !result.exists {
        println!("No path from {} to {} within {} hops", source, target, max_depth);
        return Ok(());
    }
    let hops: Vec<String> = result.path.iter().map(|node| node.id.to_string()).collect();
    println!("Path ({} hops): {}", result.length, hops.join(" -> "));
    Ok(())
}

pub async fn cmd_recommend(
    settings: &Settings,
    json_mode: bool,
    article_id: i64,
    limit: usize,
    strategy: &str,
) -> Result<(), WikiGraphError> {
    let strategy: Strategy = strategy.parse()?;
    let recommendations = with_service(settings, |service| async move {
        service.recommend(article_id, limit, strategy).await
    })
    .await?;

    if json_mode {
        return print_json(&serde_json::json!({
            "source_id": article_id,
            "recommendations": recommendations,
            "count": recommendations.len(),
        }));
    }
    println!("Recommendations for {} ({})", article_id, strategy);
    for rec in &recommendations {
        println!("  #{:<8} {:.3}  {}", rec.id, rec.score, rec.reason);
    }
    Ok(())
}

pub async fn cmd_query(
    settings: &Settings,
    json_mode: bool,
    cypher: &str,
    params: Option<&str>,
    write: bool,
) -> Result<(), WikiGraphError> {
    let params = parse_params(params)?;
    let rows = with_service(settings, |service| async move {
        if write {
            service.raw_write(cypher, params).await
        } else {
            service.raw_read(cypher, params).await
        }
    })
    .await?;

    if json_mode {
        return print_json(&serde_json::json!({ "data": rows, "count": rows.len() }));
    }
    for row in &rows {
        println!("{}", serde_json::Value::Object(row.clone()));
    }
    println!("({} rows)", rows.len());
    Ok(())
}
