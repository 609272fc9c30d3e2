//! Shared geometry utilities for closed polygons.
//!
//! Polygons are implicitly closed vertex lists: the edge from the last
//! vertex back to the first is part of the boundary and the first vertex
//! is never repeated at the end.

use kurbo::{Point, Rect};

/// Signed area via the shoelace formula.
///
/// Positive = counter-clockwise, negative = clockwise (y-up convention).
pub fn signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    (0..n)
        .map(|i| {
            let cur = points[i];
            let next = points[(i + 1) % n];
            cur.x * next.y - next.x * cur.y
        })
        .sum::<f64>()
        / 2.0
}

/// Unsigned shoelace area. Never negative, whatever the winding.
pub fn polygon_area(points: &[Point]) -> f64 {
    signed_area(points).abs()
}

pub fn is_ccw(points: &[Point]) -> bool {
    signed_area(points) > 0.0
}

/// Reverse the vertex order of counter-clockwise polygons.
///
/// Clockwise (and degenerate zero-area) input is returned unchanged, so
/// applying this twice is the same as applying it once.
pub fn to_clockwise(mut points: Vec<Point>) -> Vec<Point> {
    if is_ccw(&points) {
        points.reverse();
    }
    points
}

/// Axis-aligned bounds of a vertex list.
pub fn bounds(points: &[Point]) -> Option<Rect> {
    let first = *points.first()?;
    Some(
        points
            .iter()
            .fold(Rect::from_points(first, first), |r, &p| r.union_pt(p)),
    )
}

/// Length of each outgoing edge: `lengths[i] = |p[i+1 mod n] - p[i]|`.
pub fn edge_lengths(points: &[Point]) -> Vec<f64> {
    let n = points.len();
    (0..n)
        .map(|i| points[i].distance(points[(i + 1) % n]))
        .collect()
}

/// Edge indices sorted by ascending length.
///
/// The sort is stable, so equal lengths keep their traversal order.
pub fn ascending_edge_order(lengths: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..lengths.len()).collect();
    order.sort_by(|&a, &b| lengths[a].total_cmp(&lengths[b]));
    order
}

/// Keep the `keep` vertices with the longest outgoing edges, in traversal order.
///
/// Vertices whose outgoing edge is shortest are dropped first.
pub fn contract_shortest_edges(points: &[Point], keep: usize) -> Vec<Point> {
    if keep >= points.len() {
        return points.to_vec();
    }
    let order = ascending_edge_order(&edge_lengths(points));
    let mut kept: Vec<usize> = order[points.len() - keep..].to_vec();
    kept.sort_unstable();
    kept.into_iter().map(|i| points[i]).collect()
}

/// Rotate a cyclic sequence so `start` becomes index 0.
///
/// Built by splitting at `start` and concatenating the tail and head.
pub fn rotate_to_start(points: &[Point], start: usize) -> Vec<Point> {
    if points.is_empty() {
        return Vec::new();
    }
    let (head, tail) = points.split_at(start % points.len());
    tail.iter().chain(head).copied().collect()
}

/// Index of the vertex closest to `target`; the first one wins ties.
pub fn nearest_index(points: &[Point], target: Point) -> Option<usize> {
    points
        .iter()
        .map(|p| p.distance_squared(target))
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
            Some((_, bd)) if bd <= d => best,
            _ => Some((i, d)),
        })
        .map(|(i, _)| i)
}
