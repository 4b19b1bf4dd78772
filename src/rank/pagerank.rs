//! PageRank over the crawled link graph

use crate::index::DocId;

/// Damping factor
pub const DAMPING: f64 = 0.85;

/// L1 convergence tolerance
const TOLERANCE: f64 = 1e-6;

/// Iteration cap; guarantees termination when the tolerance is never met
const MAX_ITERATIONS: usize = 100;

/// Computes PageRank scores by power iteration
///
/// `graph[i]` lists the outbound targets of page `i`, restricted to the
/// indexed set with self-loops already removed. Dangling pages (no outbound
/// links) distribute their rank mass uniformly across all pages, so the
/// scores always sum to 1. Iteration stops when the L1 delta between rounds
/// drops below tolerance or after the iteration cap, whichever comes first.
pub fn pagerank(graph: &[Vec<DocId>]) -> Vec<f64> {
    let n = graph.len();
    if n == 0 {
        return Vec::new();
    }

    let uniform = 1.0 / n as f64;
    let mut ranks = vec![uniform; n];

    for _ in 0..MAX_ITERATIONS {
        let dangling_mass: f64 = graph
            .iter()
            .zip(&ranks)
            .filter(|(out, _)| out.is_empty())
            .map(|(_, rank)| rank)
            .sum();

        let base = (1.0 - DAMPING) / n as f64 + DAMPING * dangling_mass / n as f64;
        let mut next = vec![base; n];

        for (source, out) in graph.iter().enumerate() {
            if out.is_empty() {
                continue;
            }
            let share = DAMPING * ranks[source] / out.len() as f64;
            for &target in out {
                next[target] += share;
            }
        }

        let delta: f64 = next
            .iter()
            .zip(&ranks)
            .map(|(a, b)| (a - b).abs())
            .sum();
        ranks = next;

        if delta < TOLERANCE {
            break;
        }
    }

    ranks
}
