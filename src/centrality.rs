//! Radius-bounded centrality aggregation over all sources.
//!
//! One labeling + accumulation pass per source vertex; passes are fully
//! self-contained, so the fan-out is embarrassingly parallel. Per-source
//! partials are merged in a fixed sequential reduction in source order,
//! never through a shared mutable array, which makes the parallel path
//! bitwise identical to the sequential one.

use log::debug;

use crate::accumulate::accumulate;
use crate::graph::{GraphView, WeightChannel};
use crate::tree::{shortest_path_tree_bounded, Radius};
use crate::{Error, Result};

/// Tuning and output selection for one full computation.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CentralityConfig {
    /// Cost channel used for the whole run.
    pub channel: WeightChannel,
    /// Truncation radius (inclusive).
    pub radius: Radius,
    /// Scale betweenness by \(1/((n-1)(n-2))\); skipped when `n <= 2`.
    pub normalize: bool,
    /// Capture each source's reachable vertex list (settlement order).
    pub record_subgraphs: bool,
    /// Minimum vertex count for parallel dispatch. Below it, the sequential
    /// loop avoids paying fan-out overhead for tiny graphs. Not a
    /// correctness boundary.
    pub parallel_threshold: usize,
}

impl Default for CentralityConfig {
    fn default() -> Self {
        Self {
            channel: WeightChannel::Metric,
            radius: Radius::unbounded(),
            normalize: false,
            record_subgraphs: false,
            parallel_threshold: 30,
        }
    }
}

/// Aggregated outputs, indexed by vertex id.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CentralityResult {
    /// Brandes betweenness, summed over all sources (raw unless
    /// [`CentralityConfig::normalize`] was set).
    pub betweenness: Vec<f64>,
    /// Per-source sum of finite shortest distances.
    pub total_depth: Vec<f64>,
    /// Per-source count of vertices reachable within the radius, the source
    /// included.
    pub node_count: Vec<usize>,
    /// Per-source reachable vertex lists, when requested.
    pub subgraphs: Option<Vec<Vec<usize>>>,
}

/// One source's pass, ready for merging.
struct SourcePass {
    depth: f64,
    count: usize,
    reached: Option<Vec<usize>>,
    contributions: Vec<(usize, f64)>,
}

/// Compute betweenness, total depth, and reachable counts for every source
/// vertex.
pub fn centrality<G: GraphView + Sync>(
    graph: &G,
    config: &CentralityConfig,
) -> Result<CentralityResult> {
    run(graph, config, None)
}

/// Like [`centrality`], restricting each source to a precomputed eligible
/// vertex subset.
///
/// `bounded[s]` lists the vertices allowed to participate in source `s`'s
/// tree; its length must equal the vertex count.
pub fn centrality_bounded<G: GraphView + Sync>(
    graph: &G,
    config: &CentralityConfig,
    bounded: &[Vec<usize>],
) -> Result<CentralityResult> {
    if bounded.len() != graph.vertex_count() {
        return Err(Error::InvalidParameter(format!(
            "bounded subsets cover {} sources, graph has {} vertices",
            bounded.len(),
            graph.vertex_count()
        )));
    }
    run(graph, config, Some(bounded))
}

fn run<G: GraphView + Sync>(
    graph: &G,
    config: &CentralityConfig,
    bounded: Option<&[Vec<usize>]>,
) -> Result<CentralityResult> {
    let n = graph.vertex_count();
    config.radius.validate(graph.edge_count())?;
    if n == 0 {
        return Ok(CentralityResult {
            betweenness: Vec::new(),
            total_depth: Vec::new(),
            node_count: Vec::new(),
            subgraphs: config.record_subgraphs.then(Vec::new),
        });
    }

    let passes = collect_passes(graph, config, bounded, n)?;

    // Deterministic merge: source order, single thread.
    let mut betweenness = vec![0.0_f64; n];
    let mut total_depth = vec![0.0_f64; n];
    let mut node_count = vec![0_usize; n];
    let mut subgraphs = config.record_subgraphs.then(|| Vec::with_capacity(n));
    for (source, pass) in passes.into_iter().enumerate() {
        total_depth[source] = pass.depth;
        node_count[source] = pass.count;
        if let (Some(all), Some(reached)) = (subgraphs.as_mut(), pass.reached) {
            all.push(reached);
        }
        for (vertex, contribution) in pass.contributions {
            betweenness[vertex] += contribution;
        }
    }

    if config.normalize && n > 2 {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        for b in &mut betweenness {
            *b *= scale;
        }
    }

    Ok(CentralityResult { betweenness, total_depth, node_count, subgraphs })
}

fn collect_passes<G: GraphView + Sync>(
    graph: &G,
    config: &CentralityConfig,
    bounded: Option<&[Vec<usize>]>,
    n: usize,
) -> Result<Vec<SourcePass>> {
    #[cfg(feature = "parallel")]
    if n >= config.parallel_threshold {
        use rayon::prelude::*;

        debug!("dispatching {n} centrality sources in parallel");
        return (0..n)
            .into_par_iter()
            .map(|source| source_pass(graph, source, config, bounded))
            .collect();
    }

    debug!("running {n} centrality sources sequentially");
    (0..n)
        .map(|source| source_pass(graph, source, config, bounded))
        .collect()
}

fn source_pass<G: GraphView>(
    graph: &G,
    source: usize,
    config: &CentralityConfig,
    bounded: Option<&[Vec<usize>]>,
) -> Result<SourcePass> {
    let subset = bounded.map(|b| b[source].as_slice());
    let tree =
        shortest_path_tree_bounded(graph, source, config.channel, &config.radius, subset)?;
    let depth = tree.total_depth();
    let count = tree.reach_count();
    // Snapshot the reachable set before accumulation consumes the tree.
    let reached = config.record_subgraphs.then(|| tree.settled.clone());
    let contributions = accumulate(&tree);
    Ok(SourcePass { depth, count, reached, contributions })
}

/// Closeness from an aggregated result: `1 / total_depth`, scaled by
/// `(reachable - 1) / (n - 1)` so sources that only reach part of the graph
/// stay comparable. Sources with no finite depth (isolated, or radius 0
/// reach) score 0.0.
pub fn closeness(result: &CentralityResult) -> Vec<f64> {
    let n = result.total_depth.len();
    if n <= 1 {
        return vec![0.0; n];
    }
    result
        .total_depth
        .iter()
        .zip(&result.node_count)
        .map(|(&depth, &count)| {
            if depth > 0.0 && count > 1 {
                ((count - 1) as f64 / (n - 1) as f64) / depth
            } else {
                0.0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, SegmentGraph};

    fn unit_graph(n: usize, pairs: &[(usize, usize)]) -> SegmentGraph {
        let edges = pairs
            .iter()
            .map(|&(a, b)| Edge::new(a, b, 1.0, 1.0, 1.0))
            .collect();
        SegmentGraph::from_edges(n, edges).unwrap()
    }

    #[test]
    fn test_path_graph_betweenness_baseline() {
        // 0-1-2-3: ordered pairs through vertex 1 are (0,2),(0,3),(2,0),(3,0).
        let g = unit_graph(4, &[(0, 1), (1, 2), (2, 3)]);
        let res = centrality(&g, &CentralityConfig::default()).unwrap();
        assert_eq!(res.betweenness, vec![0.0, 4.0, 4.0, 0.0]);
        assert_eq!(res.total_depth, vec![6.0, 4.0, 4.0, 6.0]);
        assert_eq!(res.node_count, vec![4, 4, 4, 4]);
        assert!(res.subgraphs.is_none());
    }

    #[test]
    fn test_normalized_betweenness() {
        let g = unit_graph(4, &[(0, 1), (1, 2), (2, 3)]);
        let config = CentralityConfig { normalize: true, ..Default::default() };
        let res = centrality(&g, &config).unwrap();
        // Scale 1/((4-1)(4-2)) = 1/6.
        assert!((res.betweenness[1] - 4.0 / 6.0).abs() < 1e-12);
        assert_eq!(res.betweenness[0], 0.0);
    }

    #[test]
    fn test_normalization_skipped_for_tiny_graphs() {
        let g = unit_graph(2, &[(0, 1)]);
        let config = CentralityConfig { normalize: true, ..Default::default() };
        let res = centrality(&g, &config).unwrap();
        assert_eq!(res.betweenness, vec![0.0, 0.0]);
    }

    #[test]
    fn test_four_cycle_splits_evenly() {
        // Each source contributes 0.5 to each of its two neighbors.
        let g = unit_graph(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let res = centrality(&g, &CentralityConfig::default()).unwrap();
        assert_eq!(res.betweenness, vec![1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_triangle_rule_shapes_aggregate_counts() {
        // With the chord present, 0→1→2 style detours are pruned, so every
        // pair resolves to its direct edge and betweenness is all zero.
        let g = unit_graph(3, &[(0, 1), (1, 2), (0, 2)]);
        let res = centrality(&g, &CentralityConfig::default()).unwrap();
        assert_eq!(res.betweenness, vec![0.0, 0.0, 0.0]);
        assert_eq!(res.node_count, vec![3, 3, 3]);
    }

    #[test]
    fn test_radius_truncates_depth_and_count() {
        // Ring of 6, radius 1: each source reaches itself + 2 neighbors.
        let g = unit_graph(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)]);
        let config = CentralityConfig { radius: Radius::Uniform(1.0), ..Default::default() };
        let res = centrality(&g, &config).unwrap();
        assert_eq!(res.node_count, vec![3; 6]);
        assert_eq!(res.total_depth, vec![2.0; 6]);
        assert_eq!(res.betweenness, vec![0.0; 6]);
    }

    #[test]
    fn test_disconnected_component_is_not_an_error() {
        let g = unit_graph(5, &[(0, 1), (1, 2)]);
        let res = centrality(&g, &CentralityConfig::default()).unwrap();
        assert_eq!(res.node_count, vec![3, 3, 3, 1, 1]);
        assert_eq!(res.total_depth[3], 0.0);
        assert_eq!(res.betweenness[3], 0.0);
    }

    #[test]
    fn test_subgraph_capture() {
        let g = unit_graph(3, &[(0, 1), (1, 2)]);
        let config = CentralityConfig {
            radius: Radius::Uniform(1.0),
            record_subgraphs: true,
            ..Default::default()
        };
        let res = centrality(&g, &config).unwrap();
        let subs = res.subgraphs.unwrap();
        assert_eq!(subs[0], vec![0, 1]);
        assert_eq!(subs[1], vec![1, 0, 2]);
        assert_eq!(subs[2], vec![2, 1]);
    }

    #[test]
    fn test_bounded_sources_respect_their_subsets() {
        let g = unit_graph(3, &[(0, 1), (1, 2)]);
        let bounded = vec![vec![0, 1], vec![0, 1, 2], vec![1, 2]];
        let res = centrality_bounded(&g, &CentralityConfig::default(), &bounded).unwrap();
        assert_eq!(res.node_count, vec![2, 3, 2]);
    }

    #[test]
    fn test_bounded_length_mismatch_is_rejected() {
        let g = unit_graph(3, &[(0, 1), (1, 2)]);
        let err =
            centrality_bounded(&g, &CentralityConfig::default(), &[vec![0]]).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_invalid_radius_is_rejected() {
        let g = unit_graph(2, &[(0, 1)]);
        let config = CentralityConfig { radius: Radius::Uniform(0.0), ..Default::default() };
        assert!(matches!(
            centrality(&g, &config).unwrap_err(),
            Error::InvalidParameter(_)
        ));
    }

    #[test]
    fn test_empty_graph() {
        let g = unit_graph(0, &[]);
        let res = centrality(&g, &CentralityConfig::default()).unwrap();
        assert!(res.betweenness.is_empty());
        assert!(res.node_count.is_empty());
    }

    #[test]
    fn test_parallel_threshold_does_not_change_results() {
        let g = unit_graph(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)]);
        let force_seq =
            CentralityConfig { parallel_threshold: usize::MAX, ..Default::default() };
        let force_par = CentralityConfig { parallel_threshold: 0, ..Default::default() };
        let a = centrality(&g, &force_seq).unwrap();
        let b = centrality(&g, &force_par).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_closeness_scales_by_reachable_fraction() {
        let g = unit_graph(5, &[(0, 1), (1, 2)]);
        let res = centrality(&g, &CentralityConfig::default()).unwrap();
        let close = closeness(&res);
        // Source 0 reaches 2 of the 4 other vertices at depth 3.
        assert!((close[0] - (2.0 / 4.0) / 3.0).abs() < 1e-12);
        assert_eq!(close[3], 0.0);
    }

    #[test]
    fn test_closeness_single_vertex() {
        let g = unit_graph(1, &[]);
        let res = centrality(&g, &CentralityConfig::default()).unwrap();
        assert_eq!(closeness(&res), vec![0.0]);
    }
}
