//! Single-source radius-bounded shortest-path trees.
//!
//! This is a label-setting (Dijkstra) pass modified for segment-adjacency
//! duals:
//! - distances are truncated at a metric/angular radius (inclusive boundary),
//!   either one global scalar or a per-edge lookup;
//! - a candidate neighbor is rejected when it already precedes the current
//!   vertex, or when any predecessor of the current vertex has a direct edge
//!   to it. In the dual graph two segments sharing a junction and both
//!   adjacent to a third segment form a degenerate turn; a shortest path
//!   must not double back through such a triangle.
//!
//! The tree also carries the Brandes bookkeeping (path counts and predecessor
//! sets) consumed by [`crate::accumulate`].

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::NotNan;

use crate::graph::{GraphView, WeightChannel};
use crate::{Error, Result};

/// Radius cutoff applied to tentative distances. The comparison is `<=`:
/// a vertex exactly on the boundary is kept.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Radius {
    /// One scalar for the whole traversal; `f64::INFINITY` means unbounded.
    Uniform(f64),
    /// Per-edge limits, indexed by edge id. Must cover every edge.
    PerEdge(Vec<f64>),
}

impl Radius {
    /// Unbounded traversal.
    pub fn unbounded() -> Self {
        Radius::Uniform(f64::INFINITY)
    }

    #[inline]
    pub(crate) fn limit(&self, edge_id: usize) -> f64 {
        match self {
            Radius::Uniform(r) => *r,
            Radius::PerEdge(limits) => limits[edge_id],
        }
    }

    pub(crate) fn validate(&self, edge_count: usize) -> Result<()> {
        match self {
            Radius::Uniform(r) => {
                if r.is_nan() || *r <= 0.0 {
                    return Err(Error::InvalidParameter(format!(
                        "radius must be positive or infinite, got {r}"
                    )));
                }
            }
            Radius::PerEdge(limits) => {
                if limits.len() != edge_count {
                    return Err(Error::InvalidParameter(format!(
                        "per-edge radius covers {} edges, graph has {}",
                        limits.len(),
                        edge_count
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Output of one labeling pass: everything the backward accumulation and
/// path reconstruction need, and nothing shared across sources.
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    pub source: usize,
    /// Shortest distance from the source; `f64::INFINITY` when unreached or
    /// pruned by the radius.
    pub distance: Vec<f64>,
    /// Count of distinct shortest paths from the source (sigma); the source
    /// itself counts 1.
    pub sigma: Vec<f64>,
    /// Immediate predecessors on some shortest path, in discovery order.
    pub predecessors: Vec<Vec<usize>>,
    /// Vertices in settlement order (non-decreasing distance). Read this
    /// before accumulation for the reachable set.
    pub settled: Vec<usize>,
}

impl ShortestPathTree {
    /// Sum of finite distances over the reachable set. An isolated source
    /// yields 0.0.
    pub fn total_depth(&self) -> f64 {
        self.settled.iter().map(|&v| self.distance[v]).sum()
    }

    /// Number of vertices reachable within the radius, the source included.
    pub fn reach_count(&self) -> usize {
        self.settled.len()
    }

    /// Reconstruct a shortest path from the source to `destination` by
    /// following the first recorded predecessor at each step.
    ///
    /// Returns `None` when `destination` is out of range or unreached. When
    /// several shortest paths exist the first-recorded predecessor wins;
    /// settlement and edge iteration order are deterministic, so repeated
    /// calls agree.
    pub fn path_to(&self, destination: usize) -> Option<Vec<usize>> {
        if !self.distance.get(destination)?.is_finite() {
            return None;
        }
        let mut path = vec![destination];
        let mut current = destination;
        while current != self.source {
            let &prev = self.predecessors[current].first()?;
            path.push(prev);
            current = prev;
        }
        path.reverse();
        Some(path)
    }
}

/// Label a shortest-path tree from `source` over the whole graph.
pub fn shortest_path_tree<G: GraphView>(
    graph: &G,
    source: usize,
    channel: WeightChannel,
    radius: &Radius,
) -> Result<ShortestPathTree> {
    shortest_path_tree_bounded(graph, source, channel, radius, None)
}

/// Label a shortest-path tree from `source`, restricted to an eligible vertex
/// subset.
///
/// `bounded` is a precomputed list of vertices allowed to participate (for
/// example, vertices already known to lie within a coarser radius); `None`
/// means all vertices. The source is always eligible.
pub fn shortest_path_tree_bounded<G: GraphView>(
    graph: &G,
    source: usize,
    channel: WeightChannel,
    radius: &Radius,
    bounded: Option<&[usize]>,
) -> Result<ShortestPathTree> {
    let n = graph.vertex_count();
    if source >= n {
        return Err(Error::IndexOutOfBounds(source));
    }
    radius.validate(graph.edge_count())?;

    let mut eligible = vec![bounded.is_none(); n];
    if let Some(subset) = bounded {
        for &v in subset {
            if v >= n {
                return Err(Error::IndexOutOfBounds(v));
            }
            eligible[v] = true;
        }
        eligible[source] = true;
    }

    let mut distance = vec![f64::INFINITY; n];
    let mut sigma = vec![0.0_f64; n];
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut settled = Vec::new();
    let mut is_settled = vec![false; n];

    distance[source] = 0.0;
    sigma[source] = 1.0;

    // Min-heap with lazy deletion: a vertex may carry stale entries from
    // superseded relaxations; the first pop wins and the rest are skipped.
    let mut frontier: BinaryHeap<Reverse<(NotNan<f64>, usize)>> = BinaryHeap::new();
    frontier.push(Reverse((NotNan::new(0.0).unwrap(), source)));

    while let Some(Reverse((_, v))) = frontier.pop() {
        if is_settled[v] {
            continue;
        }
        is_settled[v] = true;
        settled.push(v);

        for &edge_id in graph.incident_edges(v) {
            let edge = graph.edge(edge_id);
            let w = edge.other_vertex(v);
            if w == v || !eligible[w] || is_settled[w] {
                continue;
            }
            // Degenerate-turn rule: never step onto a predecessor of v, nor
            // onto a vertex directly adjacent to one of v's predecessors.
            if predecessors[v].iter().any(|&p| p == w || graph.has_edge(p, w)) {
                continue;
            }
            let candidate = distance[v] + edge.weight(channel);
            if candidate > radius.limit(edge_id) {
                continue;
            }
            if candidate < distance[w] {
                distance[w] = candidate;
                sigma[w] = sigma[v];
                predecessors[w].clear();
                predecessors[w].push(v);
                // candidate < +inf rules out NaN here.
                frontier.push(Reverse((NotNan::new(candidate).unwrap(), w)));
            } else if candidate == distance[w] {
                // Exact tie, no epsilon: one more shortest path to w.
                sigma[w] += sigma[v];
                predecessors[w].push(v);
            }
        }
    }

    Ok(ShortestPathTree { source, distance, sigma, predecessors, settled })
}
