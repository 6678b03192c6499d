//! # Projections
//!
//! Naming and lifecycle vocabulary for the ephemeral in-memory graphs the
//! native algorithm engine runs on.
//!
//! A projection lives for exactly one algorithm invocation. Its name is the
//! algorithm's prefix plus a caller-supplied unique token, so two concurrent
//! invocations of the same algorithm never touch each other's projection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three native algorithms the service drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmKind {
    PageRank,
    Louvain,
    NodeSimilarity,
}

impl AlgorithmKind {
    /// Name reported in the `algorithm` field of a report.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::PageRank => "PageRank",
            Self::Louvain => "Louvain",
            Self::NodeSimilarity => "Node Similarity",
        }
    }

    /// Projection name prefix.
    #[must_use]
    pub const fn projection_prefix(self) -> &'static str {
        match self {
            Self::PageRank => "articles-pagerank",
            Self::Louvain => "articles-louvain",
            Self::NodeSimilarity => "articles-similarity",
        }
    }

    /// Whether the projection treats REFERS_TO as undirected.
    #[must_use]
    pub const fn undirected(self) -> bool {
        matches!(self, Self::Louvain)
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Name of one projection in the engine's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectionName {
    kind: AlgorithmKind,
    name: String,
}

impl ProjectionName {
    /// `<prefix>-<token>`. The token must be unique per invocation.
    #[must_use]
    pub fn unique(kind: AlgorithmKind, token: &str) -> Self {
        Self {
            kind,
            name: format!("{}-{token}", kind.projection_prefix()),
        }
    }

    /// Recognize a catalog entry created by this service.
    ///
    /// Returns `None` for names without one of the algorithm prefixes or
    /// with an empty token, so projections owned by anyone else are never
    /// touched.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        [
            AlgorithmKind::PageRank,
            AlgorithmKind::Louvain,
            AlgorithmKind::NodeSimilarity,
        ]
        .into_iter()
        .find_map(|kind| {
            let token = name.strip_prefix(kind.projection_prefix())?.strip_prefix('-')?;
            (!token.is_empty()).then(|| Self {
                kind,
                name: name.to_string(),
            })
        })
    }

    #[must_use]
    pub fn kind(&self) -> AlgorithmKind {
        self.kind
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ProjectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Steps of one native invocation, in order.
///
/// `Dropping` is only used by the startup sweep of stale projections.
/// `Fallback` is entered from `Creating` or `Running` on any failure.
/// `Teardown` is entered whenever `Creating` succeeded, whatever happens
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProjectionStage {
    Idle,
    Dropping,
    Creating,
    Running,
    Collecting,
    Teardown,
    Done,
    Fallback,
}

impl ProjectionStage {
    /// Whether a projection may exist in the engine at this stage.
    #[must_use]
    pub const fn holds_projection(self) -> bool {
        matches!(
            self,
            Self::Creating | Self::Running | Self::Collecting | Self::Teardown
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dropping => "dropping",
            Self::Creating => "creating",
            Self::Running => "running",
            Self::Collecting => "collecting",
            Self::Teardown => "teardown",
            Self::Done => "done",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for ProjectionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
