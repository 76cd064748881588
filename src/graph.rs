//! Segment-graph views.
//!
//! The engine never builds or mutates graphs; it consumes a read-only
//! adjacency view produced by an upstream network-construction step. Edge
//! weights are not validated here; non-finite or negative weights propagate
//! as non-finite traversal costs and are the producer's responsibility.

use std::collections::BTreeMap;

use crate::{Error, Result};

/// Selects which of the three edge cost channels drives a traversal.
///
/// Fixed for an entire computation; mixing channels within one run is not
/// supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeightChannel {
    /// Physical segment-to-segment length.
    #[default]
    Metric,
    /// Angular deviation (turn cost) between adjacent segments.
    Angular,
    /// Caller-defined third cost basis.
    Custom,
}

/// An undirected adjacency between two segments, with one scalar cost per
/// channel.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub metric: f64,
    pub angular: f64,
    pub custom: f64,
}

impl Edge {
    pub fn new(a: usize, b: usize, metric: f64, angular: f64, custom: f64) -> Self {
        Self { a, b, metric, angular, custom }
    }

    /// The far endpoint given one endpoint.
    ///
    /// `vertex` must be one of the edge's endpoints (debug-asserted). A
    /// self-loop returns `vertex` itself; traversal skips those.
    #[inline]
    pub fn other_vertex(&self, vertex: usize) -> usize {
        debug_assert!(
            vertex == self.a || vertex == self.b,
            "vertex {vertex} is not an endpoint of this edge"
        );
        if vertex == self.a {
            self.b
        } else {
            self.a
        }
    }

    #[inline]
    pub fn weight(&self, channel: WeightChannel) -> f64 {
        match channel {
            WeightChannel::Metric => self.metric,
            WeightChannel::Angular => self.angular,
            WeightChannel::Custom => self.custom,
        }
    }
}

/// Read-only adjacency capability set consumed by the traversal and
/// aggregation passes.
///
/// Vertices are dense ids `0..vertex_count()`; edges are dense ids
/// `0..edge_count()`. `has_edge` must answer for any vertex pair (it backs
/// the predecessor-triangle rejection rule, which probes pairs that were
/// never relaxed together).
pub trait GraphView {
    fn vertex_count(&self) -> usize;
    fn edge_count(&self) -> usize;
    fn edge(&self, id: usize) -> &Edge;
    /// Ids of the edges incident to `vertex`.
    fn incident_edges(&self, vertex: usize) -> &[usize];
    fn has_edge(&self, a: usize, b: usize) -> bool;
}

/// Dense integer-indexed segment graph.
///
/// Construction builds per-vertex incidence lists plus sorted neighbor lists
/// so `has_edge` is a binary search rather than an edge scan.
#[derive(Debug, Clone)]
pub struct SegmentGraph {
    vertex_count: usize,
    edges: Vec<Edge>,
    incidence: Vec<Vec<usize>>,
    neighbors: Vec<Vec<usize>>,
}

impl SegmentGraph {
    /// Build a graph from `vertex_count` vertices and an edge list.
    ///
    /// Fails with [`Error::IndexOutOfBounds`] when an edge endpoint is not a
    /// valid vertex id. Parallel edges are kept as distinct edges; isolated
    /// vertices are fine.
    pub fn from_edges(vertex_count: usize, edges: Vec<Edge>) -> Result<Self> {
        let mut incidence = vec![Vec::new(); vertex_count];
        let mut neighbors = vec![Vec::new(); vertex_count];
        for (id, edge) in edges.iter().enumerate() {
            if edge.a >= vertex_count {
                return Err(Error::IndexOutOfBounds(edge.a));
            }
            if edge.b >= vertex_count {
                return Err(Error::IndexOutOfBounds(edge.b));
            }
            incidence[edge.a].push(id);
            neighbors[edge.a].push(edge.b);
            if edge.a != edge.b {
                incidence[edge.b].push(id);
                neighbors[edge.b].push(edge.a);
            }
        }
        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }
        Ok(Self { vertex_count, edges, incidence, neighbors })
    }

    /// Build from a `petgraph` graph, extracting the three cost channels from
    /// each edge payload. Edge direction is ignored; traversal is undirected.
    #[cfg(feature = "petgraph")]
    pub fn from_petgraph<N, E, Ty, Ix>(
        graph: &petgraph::Graph<N, E, Ty, Ix>,
        mut channels: impl FnMut(&E) -> (f64, f64, f64),
    ) -> Self
    where
        Ty: petgraph::EdgeType,
        Ix: petgraph::graph::IndexType,
    {
        use petgraph::visit::EdgeRef;

        let edges = graph
            .edge_references()
            .map(|e| {
                let (metric, angular, custom) = channels(e.weight());
                Edge::new(e.source().index(), e.target().index(), metric, angular, custom)
            })
            .collect();
        // Endpoints come from the graph itself, so from_edges cannot fail.
        Self::from_edges(graph.node_count(), edges)
            .unwrap_or_else(|_| unreachable!("petgraph endpoints are always in range"))
    }
}

impl GraphView for SegmentGraph {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    #[inline]
    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    fn edge(&self, id: usize) -> &Edge {
        &self.edges[id]
    }

    #[inline]
    fn incident_edges(&self, vertex: usize) -> &[usize] {
        &self.incidence[vertex]
    }

    #[inline]
    fn has_edge(&self, a: usize, b: usize) -> bool {
        a < self.vertex_count && self.neighbors[a].binary_search(&b).is_ok()
    }
}

/// Segment graph over arbitrary totally-ordered vertex keys.
///
/// Keys are densified into `0..n-1` at construction; the traversal and
/// aggregation passes only ever see dense indices, so keyed and integer
/// callers share one engine. Index assignment follows the order of the
/// supplied vertex list.
#[derive(Debug, Clone)]
pub struct KeyedGraph<K: Ord + Clone> {
    graph: SegmentGraph,
    keys: Vec<K>,
    index: BTreeMap<K, usize>,
}

impl<K: Ord + Clone> KeyedGraph<K> {
    /// Build from an explicit vertex list and edges referencing those keys.
    ///
    /// Duplicate vertex keys and edges naming unknown keys are
    /// [`Error::InvalidParameter`].
    pub fn from_parts(vertices: Vec<K>, edges: &[(K, K, f64, f64, f64)]) -> Result<Self>
    where
        K: std::fmt::Debug,
    {
        let mut index = BTreeMap::new();
        for (i, key) in vertices.iter().enumerate() {
            if index.insert(key.clone(), i).is_some() {
                return Err(Error::InvalidParameter(format!("duplicate vertex key {key:?}")));
            }
        }
        let mut dense = Vec::with_capacity(edges.len());
        for (a, b, metric, angular, custom) in edges {
            let &ia = index
                .get(a)
                .ok_or_else(|| Error::InvalidParameter(format!("unknown vertex key {a:?}")))?;
            let &ib = index
                .get(b)
                .ok_or_else(|| Error::InvalidParameter(format!("unknown vertex key {b:?}")))?;
            dense.push(Edge::new(ia, ib, *metric, *angular, *custom));
        }
        let graph = SegmentGraph::from_edges(vertices.len(), dense)?;
        Ok(Self { graph, keys: vertices, index })
    }

    /// Dense index of a key, if present.
    pub fn index_of(&self, key: &K) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Key at a dense index.
    pub fn key_of(&self, index: usize) -> Option<&K> {
        self.keys.get(index)
    }

    /// Key table in index order; output arrays align with this.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// The underlying dense view.
    pub fn as_dense(&self) -> &SegmentGraph {
        &self.graph
    }
}

impl<K: Ord + Clone> GraphView for KeyedGraph<K> {
    fn vertex_count(&self) -> usize {
        self.graph.vertex_count()
    }

    fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn edge(&self, id: usize) -> &Edge {
        self.graph.edge(id)
    }

    fn incident_edges(&self, vertex: usize) -> &[usize] {
        self.graph.incident_edges(vertex)
    }

    fn has_edge(&self, a: usize, b: usize) -> bool {
        self.graph.has_edge(a, b)
    }
}
