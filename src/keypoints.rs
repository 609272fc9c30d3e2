//! Keypoint extraction: a sparse, high-fidelity vertex set per polygon.
//!
//! 1. Douglas-Peucker simplification of the closed ring
//! 2. Start at the top-most vertex (left-most among ties)
//! 3. Shortest-edge contraction down to the threshold `T`
//! 4. Zero padding to exactly `T` entries with a 1/0 weight mask

use geo::{Coord, LineString, Simplify};
use kurbo::Point;

use crate::config::AnnotationConfig;
use crate::geom::{contract_shortest_edges, rotate_to_start};

/// Keypoints padded to a fixed size.
#[derive(Debug, Clone, PartialEq)]
pub struct Keypoints {
    /// `T` entries; the first `len()` are real, the rest are the origin.
    pub points: Vec<Point>,
    /// 1 for real entries, 0 for padding.
    pub weights: Vec<f64>,
    len: usize,
}

impl Keypoints {
    /// Number of real (non-padding) keypoints.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The real keypoints, without padding.
    pub fn real(&self) -> &[Point] {
        &self.points[..self.len]
    }
}

/// Extract padded keypoints from a closed polygon.
pub fn extract(points: &[Point], config: &AnnotationConfig) -> Keypoints {
    let cap = config.keypoint_threshold();
    let mut simplified = simplify_ring(points, config.simplify_tolerance);
    if simplified.len() < 3 {
        simplified = points.to_vec();
    }

    let start = topmost_index(&simplified);
    let mut ring = rotate_to_start(&simplified, start);
    if ring.len() > cap {
        ring = contract_shortest_edges(&ring, cap);
    }
    pad(ring, cap)
}

/// Douglas-Peucker on the closed ring, without the repeated closing vertex.
fn simplify_ring(points: &[Point], epsilon: f64) -> Vec<Point> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    let ring: LineString<f64> = points
        .iter()
        .chain(std::iter::once(&first))
        .map(|p| Coord { x: p.x, y: p.y })
        .collect();
    let mut out: Vec<Point> = ring
        .simplify(&epsilon)
        .into_inner()
        .into_iter()
        .map(|c| Point::new(c.x, c.y))
        .collect();
    if out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    out
}

/// Vertex with minimum y; minimum x breaks ties.
fn topmost_index(points: &[Point]) -> usize {
    points
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn pad(mut ring: Vec<Point>, cap: usize) -> Keypoints {
    ring.truncate(cap);
    let len = ring.len();
    let mut weights = vec![1.0; len];
    ring.resize(cap, Point::ZERO);
    weights.resize(cap, 0.0);
    Keypoints {
        points: ring,
        weights,
        len,
    }
}
