//! Brandes backward dependency accumulation.

use crate::tree::ShortestPathTree;

/// Fold a labeled tree into the source's partial betweenness contributions.
///
/// Walks the settled stack in reverse settlement order, so every vertex is
/// processed after all of its successors in the shortest-path DAG. Returns
/// sparse `(vertex, contribution)` pairs; the source is excluded and only
/// settled vertices appear. Entries follow reverse settlement order, which is
/// deterministic for a given tree.
pub fn accumulate(tree: &ShortestPathTree) -> Vec<(usize, f64)> {
    let mut delta = vec![0.0_f64; tree.distance.len()];
    let mut contributions = Vec::with_capacity(tree.settled.len().saturating_sub(1));

    for &w in tree.settled.iter().rev() {
        // A settled vertex without a path count is a labeling defect.
        debug_assert!(tree.sigma[w] > 0.0, "settled vertex {w} has sigma 0");
        let coeff = (1.0 + delta[w]) / tree.sigma[w];
        for &v in &tree.predecessors[w] {
            delta[v] += tree.sigma[v] * coeff;
        }
        if w != tree.source {
            contributions.push((w, delta[w]));
        }
    }

    contributions
}
