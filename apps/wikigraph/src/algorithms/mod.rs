//! # Algorithm Orchestrator
//!
//! Runs PageRank, Louvain and Node Similarity with a native-first,
//! fallback-second policy.
//!
//! ```text
//! request ──► validate ──► native engine ──Ok──► shaper ──► report
//!                              │
//!                              └─Err──► traversal fallback ──► shaper
//! ```
//!
//! Both paths implement [`GraphAlgorithm`] and return the same outcome types,
//! so callers cannot tell which one answered except through the logs.

pub mod fallback;
pub mod native;

pub use fallback::FallbackAlgorithms;
pub use native::NativeAlgorithms;

use crate::gateway::GraphGateway;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use wikigraph_core::{
    AlgorithmKind, AlgorithmPath, LouvainOutcome, LouvainParams, LouvainReport, PageRankOutcome,
    PageRankParams, PageRankReport, ProjectionStage, SimilarArticle, SimilarityParams, SimilarityReport,
    SourceArticle, WikiGraphError, catalog, decode_first, shaper,
};

/// One way of computing the three graph algorithms.
#[async_trait]
pub trait GraphAlgorithm: Send + Sync {
    fn path(&self) -> AlgorithmPath;

    async fn pagerank(&self, params: &PageRankParams) -> Result<PageRankOutcome, WikiGraphError>;

    async fn louvain(&self, params: &LouvainParams) -> Result<LouvainOutcome, WikiGraphError>;

    /// Articles similar to `source`, best first.
    async fn similarity(
        &self,
        params: &SimilarityParams,
        source: &SourceArticle,
    ) -> Result<Vec<SimilarArticle>, WikiGraphError>;
}

// =============================================================================
// ORCHESTRATOR
// =============================================================================

pub struct AlgorithmOrchestrator {
    gateway: Arc<GraphGateway>,
    native: Option<Arc<dyn GraphAlgorithm>>,
    fallback: Arc<dyn GraphAlgorithm>,
}

impl AlgorithmOrchestrator {
    /// Standard wiring. With `native_enabled = false` every request goes
    /// straight to the fallback path.
    #[must_use]
    pub fn new(gateway: Arc<GraphGateway>, native_enabled: bool) -> Self {
        let native: Option<Arc<dyn GraphAlgorithm>> = native_enabled
            .then(|| Arc::new(NativeAlgorithms::new(gateway.clone())) as Arc<dyn GraphAlgorithm>);
        let fallback: Arc<dyn GraphAlgorithm> = Arc::new(FallbackAlgorithms::new(gateway.clone()));
        Self {
            gateway,
            native,
            fallback,
        }
    }

    /// Custom wiring.
    #[must_use]
    pub fn with_implementations(
        gateway: Arc<GraphGateway>,
        native: Option<Arc<dyn GraphAlgorithm>>,
        fallback: Arc<dyn GraphAlgorithm>,
    ) -> Self {
        Self {
            gateway,
            native,
            fallback,
        }
    }

    /// Drop projections left behind by invocations that never finished.
    ///
    /// Only meaningful before the first request; a no-op when the native
    /// engine is disabled.
    pub async fn reclaim_projections(&self) -> usize {
        if self.native.is_none() {
            return 0;
        }
        native::reclaim_stale_projections(&self.gateway).await
    }

    pub async fn pagerank(&self, params: PageRankParams) -> Result<PageRankReport, WikiGraphError> {
        params.validate()?;
        let started = Instant::now();
        let outcome = self
            .with_fallback(AlgorithmKind::PageRank, move |algorithm| async move {
                algorithm.pagerank(&params).await
            })
            .await?;
        Ok(shaper::pagerank_report(outcome, started.elapsed()))
    }

    pub async fn louvain(&self, params: LouvainParams) -> Result<LouvainReport, WikiGraphError> {
        params.validate()?;
        let started = Instant::now();
        let outcome = self
            .with_fallback(AlgorithmKind::Louvain, move |algorithm| async move {
                algorithm.louvain(&params).await
            })
            .await?;
        Ok(shaper::louvain_report(outcome, started.elapsed()))
    }

    /// Node Similarity for one source Article.
    ///
    /// A source that does not exist short-circuits to an empty report before
    /// any projection is attempted.
    pub async fn similarity(
        &self,
        params: SimilarityParams,
    ) -> Result<SimilarityReport, WikiGraphError> {
        params.validate()?;
        let started = Instant::now();

        let records = self
            .gateway
            .execute_read(&catalog::similarity_source(&params.article_id))
            .await?;
        let Some(source) = decode_first::<SourceArticle>(records)? else {
            tracing::info!(article_id = %params.article_id, "Similarity source not found");
            return Ok(shaper::similarity_missing_source(&params.article_id));
        };

        let similar = self
            .with_fallback(AlgorithmKind::NodeSimilarity, |algorithm| {
                let params = params.clone();
                let source = source.clone();
                async move { algorithm.similarity(&params, &source).await }
            })
            .await?;
        Ok(shaper::similarity_report(source, similar, started.elapsed()))
    }

    async fn with_fallback<T, F, Fut>(&self, kind: AlgorithmKind, call: F) -> Result<T, WikiGraphError>
    where
        F: Fn(Arc<dyn GraphAlgorithm>) -> Fut,
        Fut: Future<Output = Result<T, WikiGraphError>>,
    {
        if let Some(native) = &self.native {
            match call(native.clone()).await {
                Ok(outcome) => {
                    tracing::debug!(algorithm = %kind, path = %native.path(), "Algorithm completed");
                    return Ok(outcome);
                }
                Err(e) => {
                    tracing::warn!(
                        algorithm = %kind,
                        stage = %ProjectionStage::Fallback,
                        error = %e,
                        "Native algorithm unavailable, using fallback"
                    );
                }
            }
        }

        let outcome = call(self.fallback.clone()).await?;
        tracing::debug!(algorithm = %kind, path = %self.fallback.path(), "Algorithm completed");
        Ok(outcome)
    }
}
