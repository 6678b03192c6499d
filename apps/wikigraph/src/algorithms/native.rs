//! Native algorithm path on the engine's graph data science procedures.
//!
//! Each call projects Article / REFERS_TO into a uniquely named in-memory
//! graph, streams the algorithm over it, and drops it again. Every failure
//! is reported as [`WikiGraphError::AlgorithmUnavailable`] so the
//! orchestrator can fall back.

use super::GraphAlgorithm;
use crate::gateway::GraphGateway;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;
use wikigraph_core::gds::{self, ListedProjection, NativeSimilarRow, ProjectionInfo};
use wikigraph_core::{
    AlgorithmKind, AlgorithmPath, CommunitySize, CypherQuery, LouvainOutcome, LouvainParams,
    PageRankOutcome, PageRankParams, ProjectionName, ProjectionStage, Record, ScoredArticle,
    SimilarArticle, SimilarityParams, SourceArticle, WikiGraphError, decode_all, decode_first,
};

fn unavailable(e: WikiGraphError) -> WikiGraphError {
    match e {
        WikiGraphError::AlgorithmUnavailable(_) => e,
        other => WikiGraphError::AlgorithmUnavailable(other.to_string()),
    }
}

// =============================================================================
// PROJECTION GUARD
// =============================================================================

/// An in-memory projection that exists for the lifetime of the guard.
///
/// The guard is created as soon as the engine accepts the projection, so
/// every later failure still reaches teardown. Call
/// [`ProjectionGuard::release`] on every path. If the guard is dropped while
/// its stage still holds a projection (the request future was abandoned),
/// the drop is scheduled on the current runtime instead.
struct ProjectionGuard {
    gateway: Arc<GraphGateway>,
    name: ProjectionName,
    stage: ProjectionStage,
}

impl ProjectionGuard {
    async fn acquire(
        gateway: &Arc<GraphGateway>,
        kind: AlgorithmKind,
    ) -> Result<(Self, ProjectionInfo), WikiGraphError> {
        let token = Uuid::new_v4().simple().to_string();
        let name = ProjectionName::unique(kind, &token);

        trace_stage(&name, ProjectionStage::Creating);
        let records = gateway
            .execute_read(&gds::project(&name))
            .await
            .map_err(unavailable)?;
        let guard = Self {
            gateway: gateway.clone(),
            name,
            stage: ProjectionStage::Creating,
        };

        let info = match decode_first::<ProjectionInfo>(records) {
            Ok(Some(info)) => info,
            Ok(None) => {
                let e = WikiGraphError::AlgorithmUnavailable(format!(
                    "projection {} returned no row",
                    guard.name
                ));
                guard.release().await;
                return Err(e);
            }
            Err(e) => {
                guard.release().await;
                return Err(unavailable(e));
            }
        };

        tracing::debug!(
            projection = %guard.name,
            nodes = info.node_count,
            relationships = info.relationship_count,
            "Projection created"
        );
        Ok((guard, info))
    }

    fn name(&self) -> &ProjectionName {
        &self.name
    }

    fn advance(&mut self, stage: ProjectionStage) {
        self.stage = stage;
        trace_stage(&self.name, stage);
    }

    /// Run one algorithm stream against the projection.
    async fn stream(&mut self, query: &CypherQuery) -> Result<Vec<Record>, WikiGraphError> {
        self.advance(ProjectionStage::Running);
        let records = self.gateway.execute_read(query).await.map_err(unavailable)?;
        self.advance(ProjectionStage::Collecting);
        Ok(records)
    }

    /// Drop the projection. Failures are logged, never returned.
    async fn release(mut self) {
        self.advance(ProjectionStage::Teardown);
        if let Err(e) = self
            .gateway
            .execute_read(&gds::drop_projection(&self.name))
            .await
        {
            tracing::warn!(projection = %self.name, error = %e, "Projection teardown failed");
        }
        self.advance(ProjectionStage::Done);
    }
}

impl Drop for ProjectionGuard {
    fn drop(&mut self) {
        if !self.stage.holds_projection() {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(projection = %self.name, "Projection leaked: no runtime for teardown");
            return;
        };
        let gateway = self.gateway.clone();
        let query = gds::drop_projection(&self.name);
        let name = self.name.clone();
        runtime.spawn(async move {
            if let Err(e) = gateway.execute_read(&query).await {
                tracing::warn!(projection = %name, error = %e, "Deferred projection teardown failed");
            }
        });
    }
}

fn trace_stage(name: &ProjectionName, stage: ProjectionStage) {
    tracing::trace!(projection = %name, stage = %stage, "Projection stage");
}

// =============================================================================
// STALE PROJECTIONS
// =============================================================================

/// Drop every projection in the engine's catalog that carries one of the
/// service's name prefixes.
///
/// Projections outlive their invocation only when a process died mid-call.
/// Run this once at server startup, before any request is served; it must
/// not run alongside live invocations. Returns the number of projections
/// dropped. A missing engine reads as nothing to reclaim.
pub async fn reclaim_stale_projections(gateway: &GraphGateway) -> usize {
    let listed = match gateway.execute_read(&gds::list_projections()).await {
        Ok(records) => records,
        Err(e) => {
            tracing::debug!(error = %e, "Projection catalog unavailable, nothing to reclaim");
            return 0;
        }
    };
    let listed = match decode_all::<ListedProjection>(listed) {
        Ok(listed) => listed,
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable projection catalog");
            return 0;
        }
    };

    let mut dropped = 0;
    for name in listed
        .iter()
        .filter_map(|entry| ProjectionName::parse(&entry.graph_name))
    {
        trace_stage(&name, ProjectionStage::Dropping);
        match gateway.execute_read(&gds::drop_projection(&name)).await {
            Ok(_) => dropped += 1,
            Err(e) => tracing::warn!(projection = %name, error = %e, "Stale projection drop failed"),
        }
    }
    if dropped > 0 {
        tracing::info!(dropped, "Reclaimed stale projections");
    }
    dropped
}

// =============================================================================
// NATIVE ALGORITHMS
// =============================================================================

pub struct NativeAlgorithms {
    gateway: Arc<GraphGateway>,
}

impl NativeAlgorithms {
    #[must_use]
    pub fn new(gateway: Arc<GraphGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl GraphAlgorithm for NativeAlgorithms {
    fn path(&self) -> AlgorithmPath {
        AlgorithmPath::Native
    }

    async fn pagerank(&self, params: &PageRankParams) -> Result<PageRankOutcome, WikiGraphError> {
        let (mut guard, info) =
            ProjectionGuard::acquire(&self.gateway, AlgorithmKind::PageRank).await?;
        let total_nodes = info.node_count;
        let query = gds::pagerank_stream(guard.name(), params);
        let result = guard
            .stream(&query)
            .await
            .and_then(|records| decode_all::<ScoredArticle>(records).map_err(unavailable));
        guard.release().await;

        Ok(PageRankOutcome {
            total_nodes,
            articles: result?,
        })
    }

    async fn louvain(&self, params: &LouvainParams) -> Result<LouvainOutcome, WikiGraphError> {
        let (mut guard, _) = ProjectionGuard::acquire(&self.gateway, AlgorithmKind::Louvain).await?;
        let query = gds::louvain_stream(guard.name(), params);
        let result = guard
            .stream(&query)
            .await
            .and_then(|records| decode_all::<CommunitySize>(records).map_err(unavailable));
        guard.release().await;

        Ok(gds::louvain_summary(result?))
    }

    async fn similarity(
        &self,
        params: &SimilarityParams,
        _source: &SourceArticle,
    ) -> Result<Vec<SimilarArticle>, WikiGraphError> {
        let (mut guard, _) =
            ProjectionGuard::acquire(&self.gateway, AlgorithmKind::NodeSimilarity).await?;
        let query = gds::similarity_stream(guard.name(), params);
        let result = guard
            .stream(&query)
            .await
            .and_then(|records| decode_all::<NativeSimilarRow>(records).map_err(unavailable));
        guard.release().await;

        Ok(result?.into_iter().map(SimilarArticle::from).collect())
    }
}
