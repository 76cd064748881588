//! Ranking over aggregated centrality results.

use std::cmp::Ordering;

use crate::centrality::{closeness, CentralityResult};

/// One vertex's position in a centrality ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedVertex {
    pub vertex: usize,
    pub betweenness: f64,
    pub closeness: f64,
}

/// The `k` most central vertices, most central first.
///
/// Primary key is betweenness (descending); equal betweenness falls back to
/// closeness (descending), then to vertex id (ascending), so the ordering is
/// total and identical across runs. Zero-betweenness vertices still rank;
/// with a small radius most of the graph ties at zero and the closeness
/// fallback is what separates it.
pub fn rank_vertices(result: &CentralityResult, k: usize) -> Vec<RankedVertex> {
    let closeness = closeness(result);
    let mut ranked: Vec<RankedVertex> = result
        .betweenness
        .iter()
        .zip(&closeness)
        .enumerate()
        .map(|(vertex, (&betweenness, &closeness))| RankedVertex {
            vertex,
            betweenness,
            closeness,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.betweenness
            .partial_cmp(&a.betweenness)
            .unwrap_or(Ordering::Equal)
            .then(b.closeness.partial_cmp(&a.closeness).unwrap_or(Ordering::Equal))
            .then(a.vertex.cmp(&b.vertex))
    });
    ranked.truncate(k);
    ranked
}
