//! Uniform resampling of closed polygons to an exact vertex count.
//!
//! Two cases, depending on the input vertex count `P` and target `N`:
//!
//! 1. **Contraction** (`P > N`): drop the vertices with the shortest
//!    outgoing edges until `N` remain, keeping traversal order.
//! 2. **Subdivision** (`P <= N`): give every edge a share of the `N`
//!    samples proportional to its length (at least one each), correct the
//!    rounding drift so the shares sum to `N`, then interpolate along
//!    each edge.

pub mod canonical;

use kurbo::Point;

use crate::geom::{ascending_edge_order, contract_shortest_edges, edge_lengths};

/// Resample a closed polygon to exactly `target` vertices.
///
/// Output follows the input traversal direction. Empty input or a zero
/// target yields an empty sequence.
pub fn resample(points: &[Point], target: usize) -> Vec<Point> {
    if points.is_empty() || target == 0 {
        return Vec::new();
    }
    if points.len() > target {
        return contract_shortest_edges(points, target);
    }

    let n = points.len();
    let counts = allot_edge_samples(&edge_lengths(points), target);
    let mut samples = Vec::with_capacity(target);
    for (i, &m) in counts.iter().enumerate() {
        let start = points[i];
        let end = points[(i + 1) % n];
        // k = m is the next edge's k = 0, so it is never emitted here.
        samples.extend((0..m).map(|k| start.lerp(end, k as f64 / m as f64)));
    }
    samples
}

/// Number of samples each edge receives when subdividing to `target`.
///
/// Every edge gets at least one sample and the counts sum to `target`
/// whenever `target >= lengths.len()`. Zero-perimeter input is treated as
/// equal-length edges.
pub fn allot_edge_samples(lengths: &[f64], target: usize) -> Vec<usize> {
    if lengths.is_empty() {
        return Vec::new();
    }
    let perimeter: f64 = lengths.iter().sum();
    let uniform;
    let lengths = if perimeter > 0.0 && perimeter.is_finite() {
        lengths
    } else {
        uniform = vec![1.0; lengths.len()];
        &uniform[..]
    };
    let perimeter: f64 = lengths.iter().sum();

    let mut counts: Vec<usize> = lengths
        .iter()
        .map(|&len| ((len * target as f64 / perimeter).round_ties_even() as usize).max(1))
        .collect();

    // Rounding leaves the total off by a few samples.
    let order = ascending_edge_order(lengths);
    let total: usize = counts.iter().sum();
    if total > target {
        let mut excess = total - target;
        for &edge in order.iter().rev() {
            if excess == 0 {
                break;
            }
            if counts[edge] > excess {
                counts[edge] -= excess;
                excess = 0;
            } else {
                excess -= counts[edge] - 1;
                counts[edge] = 1;
            }
        }
    } else if total < target {
        if let Some(&longest) = order.last() {
            counts[longest] += target - total;
        }
    }
    counts
}
