//! Fallback algorithm path: plain traversal queries plus the pure
//! computations in [`wikigraph_core::fallback`].

use super::GraphAlgorithm;
use crate::gateway::GraphGateway;
use async_trait::async_trait;
use std::sync::Arc;
use wikigraph_core::fallback::{self, DegreeRow, MembershipRow, NeighborhoodRow};
use wikigraph_core::{
    AlgorithmPath, LouvainOutcome, LouvainParams, PageRankOutcome, PageRankParams, SimilarArticle,
    SimilarityParams, SourceArticle, WikiGraphError, decode_all,
};

pub struct FallbackAlgorithms {
    gateway: Arc<GraphGateway>,
}

impl FallbackAlgorithms {
    #[must_use]
    pub fn new(gateway: Arc<GraphGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl GraphAlgorithm for FallbackAlgorithms {
    fn path(&self) -> AlgorithmPath {
        AlgorithmPath::Fallback
    }

    async fn pagerank(&self, params: &PageRankParams) -> Result<PageRankOutcome, WikiGraphError> {
        let records = self.gateway.execute_read(&fallback::degree_listing()).await?;
        let rows: Vec<DegreeRow> = decode_all(records)?;
        Ok(fallback::degree_centrality(rows, params.limit))
    }

    /// Reports the stored partition; the Louvain parameters do not apply.
    async fn louvain(&self, _params: &LouvainParams) -> Result<LouvainOutcome, WikiGraphError> {
        let records = self
            .gateway
            .execute_read(&fallback::community_membership())
            .await?;
        let rows: Vec<MembershipRow> = decode_all(records)?;
        Ok(fallback::community_labels(rows))
    }

    async fn similarity(
        &self,
        params: &SimilarityParams,
        source: &SourceArticle,
    ) -> Result<Vec<SimilarArticle>, WikiGraphError> {
        let records = self
            .gateway
            .execute_read(&fallback::neighborhood(&source.article_id))
            .await?;
        let rows: Vec<NeighborhoodRow> = decode_all(records)?;
        Ok(fallback::jaccard_similar(
            &rows,
            params.similarity_cutoff,
            params.limit,
        ))
    }
}
