//! `syntaxops`: radius-bounded space-syntax centralities over segment graphs.
//!
//! A segment graph is the dual of a street network: street segments are the
//! vertices, segment adjacencies are the edges, and each edge carries three
//! independent cost channels (metric length, angular deviation, and a generic
//! third channel). This crate computes per-vertex betweenness, total depth
//! (closeness), reachable-vertex counts, and optional reachable subgraphs,
//! all truncated to a maximum radius from each source.
//!
//! Public invariants (must not drift):
//! - **Node order**: outputs are indexed by vertex id \(0..n-1\) consistent
//!   with the input graph view (keyed graphs densify their keys at
//!   construction and expose the key table).
//! - **Determinism**: identical inputs + configs produce identical outputs,
//!   including under the `parallel` feature (per-source partials are merged
//!   in a fixed sequential reduction, never through a shared accumulator).
//! - **No silent normalization**: betweenness is raw Brandes sums unless
//!   [`CentralityConfig::normalize`] is set; closeness scaling is a separate,
//!   explicit call.
//!
//! Swappable (allowed to change without breaking the contract):
//! - iteration strategy (serial vs parallel)
//! - frontier/heap internals (so long as label-setting semantics hold)
//! - internal data structures (so long as invariants hold)

pub mod accumulate;
pub mod centrality;
pub mod graph;
pub mod rank;
pub mod tree;

pub use accumulate::accumulate;
pub use centrality::{
    centrality, centrality_bounded, closeness, CentralityConfig, CentralityResult,
};
pub use graph::{Edge, GraphView, KeyedGraph, SegmentGraph, WeightChannel};
pub use rank::{rank_vertices, RankedVertex};
pub use tree::{shortest_path_tree, shortest_path_tree_bounded, Radius, ShortestPathTree};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("index out of bounds: {0}")]
    IndexOutOfBounds(usize),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, Error>;
