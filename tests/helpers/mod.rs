// Shared fixtures for the integration tests.

#![allow(dead_code)]

use polyprep::kurbo::Point;
use polyprep::{InstanceAnnotation, PolygonTarget, Segmentation};

/// Irregular star-like polygon with `n` vertices, deterministic per `seed`.
///
/// Radii wobble between 60% and 100% of `r` so edges have uneven lengths.
pub fn wobbly_polygon(n: usize, r: f64, seed: u32) -> Vec<f64> {
    (0..n)
        .flat_map(|i| {
            let a = i as f64 * std::f64::consts::TAU / n as f64;
            let wobble = ((i as u32).wrapping_mul(2654435761).wrapping_add(seed) % 1000) as f64;
            let radius = r * (0.6 + 0.4 * wobble / 1000.0);
            [100.0 + radius * a.cos(), 100.0 + radius * a.sin()]
        })
        .collect()
}

pub fn flat_to_points(flat: &[f64]) -> Vec<Point> {
    flat.chunks_exact(2).map(|xy| Point::new(xy[0], xy[1])).collect()
}

pub fn bbox_of(flat: &[f64]) -> [f64; 4] {
    let pts = flat_to_points(flat);
    let xs = pts.iter().map(|p| p.x);
    let ys = pts.iter().map(|p| p.y);
    [
        xs.clone().fold(f64::MAX, f64::min),
        ys.clone().fold(f64::MAX, f64::min),
        xs.fold(f64::MIN, f64::max),
        ys.fold(f64::MIN, f64::max),
    ]
}

pub fn instance(parts: Vec<Vec<f64>>) -> InstanceAnnotation {
    let all: Vec<f64> = parts.iter().flatten().copied().collect();
    let bbox = if all.len() >= 2 { bbox_of(&all) } else { [0.0; 4] };
    InstanceAnnotation {
        segmentation: Segmentation::Polygons(parts),
        bbox,
    }
}

/// Count of indices carrying `weight`.
pub fn weighted(target: &PolygonTarget, weight: f64) -> usize {
    target.weights.iter().filter(|&&w| w == weight).count()
}

pub fn verify_target_shape(target: &PolygonTarget, n: usize) {
    assert_eq!(target.points.len(), n, "points length");
    assert_eq!(target.weights.len(), n, "weights length");
    for p in &target.points {
        assert!(p.x.is_finite() && p.y.is_finite(), "non-finite vertex {:?}", p);
    }
}
