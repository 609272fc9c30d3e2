//! Correspondence between dense resampled vertices and keypoints.
//!
//! Each keypoint is assigned to exactly one dense vertex by minimum-cost
//! bipartite matching on Euclidean distance. Matched vertices are snapped
//! onto their keypoint and re-weighted, restoring the sharp corners that
//! uniform resampling smooths away.

use kurbo::Point;
use pathfinding::kuhn_munkres::kuhn_munkres_min;
use pathfinding::matrix::Matrix;

use crate::PolygonTarget;

/// Fixed-point scale for distances handed to the integer Hungarian solver.
/// Sub-micro-unit differences are treated as ties.
const COST_SCALE: f64 = 1e6;

/// Upper bound on any total the solver accumulates from the scaled costs.
const COST_BUDGET: f64 = (1u64 << 62) as f64;

/// Optimal assignment between `dense` and `keypoints`.
///
/// Returns `(dense_index, keypoint_index)` pairs sorted by dense index.
/// `min(dense.len(), keypoints.len())` pairs are produced.
///
/// Costs are exact to a micro-unit while coordinates stay within about
/// 1e10 units; beyond that the scale shrinks so the integer sums cannot
/// overflow. Non-finite distances cost as much as the farthest pair.
pub fn assign(dense: &[Point], keypoints: &[Point]) -> Vec<(usize, usize)> {
    if dense.is_empty() || keypoints.is_empty() {
        return Vec::new();
    }

    // The solver wants no more rows than columns.
    let keypoints_as_rows = keypoints.len() <= dense.len();
    let (rows, cols) = if keypoints_as_rows {
        (keypoints, dense)
    } else {
        (dense, keypoints)
    };

    let farthest = rows
        .iter()
        .flat_map(|r| cols.iter().map(move |c| r.distance(*c)))
        .filter(|d| d.is_finite())
        .fold(0.0, f64::max);
    let scale = cost_scale(farthest, rows.len() + cols.len());
    let matrix = Matrix::from_fn(rows.len(), cols.len(), |(r, c)| {
        let d = rows[r].distance(cols[c]);
        let d = if d.is_finite() { d } else { farthest };
        (d * scale).round() as i64
    });
    let (_, assignment) = kuhn_munkres_min(&matrix);

    let mut pairs: Vec<(usize, usize)> = assignment
        .into_iter()
        .enumerate()
        .map(|(row, col)| if keypoints_as_rows { (col, row) } else { (row, col) })
        .collect();
    pairs.sort_unstable();
    pairs
}

/// Distance-to-integer scale that keeps `terms` summed costs in budget.
fn cost_scale(farthest: f64, terms: usize) -> f64 {
    if farthest <= 0.0 {
        return COST_SCALE;
    }
    COST_SCALE.min(COST_BUDGET / (farthest * terms as f64))
}

/// Snap matched dense vertices onto their keypoints.
///
/// Matched indices get `keypoint_weight`; every other index keeps 1.
pub fn inject_keypoints(dense: Vec<Point>, keypoints: &[Point], keypoint_weight: f64) -> PolygonTarget {
    let pairs = assign(&dense, keypoints);
    let mut points = dense;
    let mut weights = vec![1.0; points.len()];
    for (r, c) in pairs {
        points[r] = keypoints[c];
        weights[r] = keypoint_weight;
    }
    PolygonTarget { points, weights }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn nearest_pairs_are_chosen() {
        let dense = pts(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (10.0, 5.0)]);
        let kps = pts(&[(9.8, 0.3), (0.2, 0.1)]);
        assert_eq!(assign(&dense, &kps), vec![(0, 1), (2, 0)]);
    }

    #[test]
    fn global_optimum_beats_greedy() {
        // Greedy takes the cheapest pair (1.5, 0)-(2, 0) first and ends at
        // 3.5 in total; the optimum is 2.5.
        let dense = pts(&[(0.0, 0.0), (2.0, 0.0)]);
        let kps = pts(&[(1.5, 0.0), (3.0, 0.0)]);
        assert_eq!(assign(&dense, &kps), vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn more_keypoints_than_dense() {
        let dense = pts(&[(0.0, 0.0), (10.0, 0.0)]);
        let kps = pts(&[(10.0, 1.0), (5.0, 5.0), (0.0, 1.0)]);
        assert_eq!(assign(&dense, &kps), vec![(0, 2), (1, 0)]);
    }

    #[test]
    fn weights_mark_exactly_the_matched_indices() {
        let dense = pts(&[(0.0, 0.0), (0.0, 5.0), (0.0, 10.0), (5.0, 10.0), (10.0, 10.0), (10.0, 5.0)]);
        let kps = pts(&[(0.1, 10.2), (9.9, 9.9)]);
        let target = inject_keypoints(dense, &kps, 3.0);
        assert_eq!(target.weights, vec![1.0, 1.0, 3.0, 1.0, 3.0, 1.0]);
        assert_eq!(target.points[2], Point::new(0.1, 10.2));
        assert_eq!(target.points[4], Point::new(9.9, 9.9));
        assert_eq!(target.points[0], Point::new(0.0, 0.0));
    }

    #[test]
    fn no_keypoints_leaves_dense_untouched() {
        let dense = pts(&[(0.0, 0.0), (0.0, 5.0), (5.0, 5.0)]);
        let target = inject_keypoints(dense.clone(), &[], 4.0);
        assert_eq!(target.points, dense);
        assert_eq!(target.weights, vec![1.0; 3]);
    }

    #[test]
    fn huge_coordinates_still_match_nearest() {
        let dense = pts(&[(0.0, 0.0), (1e15, 0.0)]);
        let kps = pts(&[(1e15, 10.0), (0.0, 10.0)]);
        assert_eq!(assign(&dense, &kps), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn ordinary_coordinates_keep_full_scale() {
        assert_eq!(cost_scale(1e3, 200), COST_SCALE);
        assert_eq!(cost_scale(0.0, 4), COST_SCALE);
        let shrunk = cost_scale(1e15, 4);
        assert!(shrunk < COST_SCALE);
        assert!(shrunk * 1e15 * 4.0 <= COST_BUDGET * (1.0 + 1e-12));
    }

    #[test]
    fn non_finite_keypoint_does_not_panic() {
        let dense = pts(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]);
        let kps = pts(&[(f64::NAN, 0.0), (9.0, 0.0)]);
        let pairs = assign(&dense, &kps);
        assert_eq!(pairs.len(), 2);
        assert!(pairs.contains(&(2, 1)));
    }
}
