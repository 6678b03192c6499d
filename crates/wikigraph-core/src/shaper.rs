//! # Result Shaper
//!
//! Last step before a result leaves the service: ranks, timings and the
//! fixed envelope every algorithm report carries (algorithm name, population
//! context, ordered results, `execution_time_ms`).

use crate::projection::AlgorithmKind;
use crate::types::{
    LouvainOutcome, LouvainReport, PageRankEntry, PageRankOutcome, PageRankReport,
    RecommendedArticle, ScoredArticle, SimilarArticle, SimilarityReport, SourceArticle,
};
use std::time::Duration;

/// Title reported when the similarity source does not exist.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Duration in fractional milliseconds.
#[must_use]
pub fn elapsed_ms(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}

/// Number results 1, 2, 3… in their current order.
#[must_use]
pub fn attach_ranks(articles: Vec<ScoredArticle>) -> Vec<PageRankEntry> {
    articles
        .into_iter()
        .enumerate()
        .map(|(index, article)| PageRankEntry {
            article_id: article.article_id,
            article_title: article.article_title,
            score: article.score,
            rank: index + 1,
        })
        .collect()
}

#[must_use]
pub fn pagerank_report(outcome: PageRankOutcome, elapsed: Duration) -> PageRankReport {
    PageRankReport {
        algorithm: AlgorithmKind::PageRank.display_name().to_string(),
        total_nodes: outcome.total_nodes,
        results: attach_ranks(outcome.articles),
        execution_time_ms: elapsed_ms(elapsed),
    }
}

#[must_use]
pub fn louvain_report(outcome: LouvainOutcome, elapsed: Duration) -> LouvainReport {
    LouvainReport {
        algorithm: AlgorithmKind::Louvain.display_name().to_string(),
        total_communities: outcome.communities.len(),
        modularity: outcome.modularity,
        communities: outcome.communities,
        execution_time_ms: elapsed_ms(elapsed),
    }
}

#[must_use]
pub fn similarity_report(
    source: SourceArticle,
    similar_articles: Vec<SimilarArticle>,
    elapsed: Duration,
) -> SimilarityReport {
    SimilarityReport {
        algorithm: AlgorithmKind::NodeSimilarity.display_name().to_string(),
        source_article_title: source
            .article_title
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        source_article_id: source.article_id,
        count: similar_articles.len(),
        similar_articles,
        execution_time_ms: elapsed_ms(elapsed),
    }
}

/// The report for a source Article that does not exist: no results, zero
/// time, title `"Unknown"`.
#[must_use]
pub fn similarity_missing_source(article_id: &str) -> SimilarityReport {
    SimilarityReport {
        algorithm: AlgorithmKind::NodeSimilarity.display_name().to_string(),
        source_article_id: article_id.to_string(),
        source_article_title: UNKNOWN_TITLE.to_string(),
        similar_articles: Vec::new(),
        count: 0,
        execution_time_ms: 0.0,
    }
}

/// Drop the source Article and anything past `limit`.
#[must_use]
pub fn finalize_recommendations(
    source_id: i64,
    recommendations: Vec<RecommendedArticle>,
    limit: usize,
) -> Vec<RecommendedArticle> {
    recommendations
        .into_iter()
        .filter(|r| r.id != source_id)
        .take(limit)
        .collect()
}
