//! # Property-Based Tests
//!
//! Invariants of the pure computations, checked with proptest.

use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::BTreeSet;
use wikigraph_core::fallback::{
    DegreeRow, MembershipRow, NeighborhoodRow, community_labels, degree_centrality,
    jaccard_similar,
};
use wikigraph_core::gds::louvain_summary;
use wikigraph_core::shaper::{attach_ranks, finalize_recommendations};
use wikigraph_core::{AnalyticsTotals, CommunitySize, RecommendedArticle};

fn degree_rows(degrees: &[i64]) -> Vec<DegreeRow> {
    degrees
        .iter()
        .enumerate()
        .map(|(i, &degree)| DegreeRow {
            article_id: Some(format!("Q{i:04}")),
            article_title: None,
            degree,
        })
        .collect()
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Fallback PageRank scores over the whole dataset sum to 1.
    #[test]
    fn centrality_scores_sum_to_one(degrees in vec(0i64..50, 1..60)) {
        let rows = degree_rows(&degrees);
        let n = rows.len();
        let outcome = degree_centrality(rows, n);

        let sum: f64 = outcome.articles.iter().map(|a| a.score).sum();
        if degrees.iter().any(|&d| d > 0) {
            prop_assert!((sum - 1.0).abs() < 1e-9);
        } else {
            prop_assert!(sum.abs() < f64::EPSILON);
        }
        prop_assert_eq!(outcome.total_nodes, n as i64);
    }

    /// Results are ordered, bounded by the limit, and within [0, 1].
    #[test]
    fn centrality_is_ordered_and_bounded(
        degrees in vec(0i64..50, 0..60),
        limit in 1usize..100,
    ) {
        let outcome = degree_centrality(degree_rows(&degrees), limit);
        prop_assert!(outcome.articles.len() <= limit);
        for pair in outcome.articles.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
            if (pair[0].score - pair[1].score).abs() < f64::EPSILON {
                prop_assert!(pair[0].article_id <= pair[1].article_id);
            }
        }
        for article in &outcome.articles {
            prop_assert!((0.0..=1.0).contains(&article.score));
        }

        let ranked = attach_ranks(outcome.articles);
        for (i, entry) in ranked.iter().enumerate() {
            prop_assert_eq!(entry.rank, i + 1);
        }
    }

    /// The stored-partition summary never reports empty communities and
    /// never counts more members than exist.
    #[test]
    fn community_labels_exclude_empty(
        raw in vec((0i64..1000, 0i64..20, proptest::option::of(0.0f64..1.0)), 0..40)
    ) {
        let total_members: i64 = raw.iter().map(|&(_, size, _)| size).sum();
        let rows: Vec<MembershipRow> = raw
            .into_iter()
            .map(|(community_id, size, density)| MembershipRow { community_id, size, density })
            .collect();

        let outcome = community_labels(rows);
        prop_assert!(outcome.communities.iter().all(|c| c.size > 0));
        let reported: i64 = outcome.communities.iter().map(|c| c.size).sum();
        prop_assert!(reported <= total_members);
        for pair in outcome.communities.windows(2) {
            prop_assert!(pair[0].size >= pair[1].size);
        }
        prop_assert!((0.0..=1.0).contains(&outcome.modularity));
    }

    /// Native Louvain proxies stay within [0, 1].
    #[test]
    fn louvain_proxies_bounded(raw in vec((0i64..1000, 1i64..500), 0..40)) {
        let sizes: Vec<CommunitySize> = raw
            .into_iter()
            .map(|(community_id, size)| CommunitySize { community_id, size })
            .collect();
        let outcome = louvain_summary(sizes);
        for community in &outcome.communities {
            prop_assert!((0.0..=1.0).contains(&community.modularity));
        }
        prop_assert!((0.0..=1.0).contains(&outcome.modularity));
    }

    /// Jaccard scores are in [0, 1], above the cutoff, sorted, bounded,
    /// and their shared-neighbour counts fit inside both sets.
    #[test]
    fn jaccard_bounds(
        source in proptest::collection::btree_set(0i64..40, 0..15),
        candidates in vec(proptest::collection::btree_set(0i64..40, 0..15), 0..20),
        cutoff in 0.0f64..1.0,
        limit in 1usize..30,
    ) {
        let rows: Vec<NeighborhoodRow> = candidates
            .iter()
            .enumerate()
            .map(|(i, set)| NeighborhoodRow {
                source_neighbors: source.iter().copied().collect(),
                article_id: Some(format!("C{i:03}")),
                article_title: None,
                candidate_neighbors: set.iter().copied().collect(),
            })
            .collect();

        let similar = jaccard_similar(&rows, cutoff, limit);
        prop_assert!(similar.len() <= limit);
        for pair in similar.windows(2) {
            prop_assert!(pair[0].similarity_score >= pair[1].similarity_score);
        }
        for article in &similar {
            prop_assert!(article.similarity_score >= cutoff);
            prop_assert!(article.similarity_score <= 1.0);
            prop_assert!(article.common_neighbors as usize <= source.len());
        }
    }

    /// Undirected traversal counts halve back to the edge count.
    #[test]
    fn analytics_edge_halving_round_trips(
        articles in 0i64..100_000,
        communities in 0i64..1000,
        edges in 0i64..1_000_000,
    ) {
        let totals = AnalyticsTotals::from_raw(articles, communities, edges * 2);
        prop_assert_eq!(totals.total_edges, edges);
        if articles > 0 {
            let expected = (2 * edges) as f64 / articles as f64;
            prop_assert!((totals.avg_degree - expected).abs() < 1e-9);
        } else {
            prop_assert!(totals.avg_degree.abs() < f64::EPSILON);
        }
    }

    /// Recommendations never contain their source and respect the limit.
    #[test]
    fn recommendations_exclude_source(
        ids in vec(0i64..30, 0..60),
        source in 0i64..30,
        limit in 1usize..50,
    ) {
        let list: Vec<RecommendedArticle> = ids
            .iter()
            .map(|&id| RecommendedArticle {
                id,
                target: None,
                community_id: None,
                score: 1.0,
                reason: "Hybrid recommendation".to_string(),
            })
            .collect();
        let kept = finalize_recommendations(source, list, limit);
        prop_assert!(kept.len() <= limit);
        let kept_ids: BTreeSet<i64> = kept.iter().map(|r| r.id).collect();
        prop_assert!(!kept_ids.contains(&source));
    }
}
