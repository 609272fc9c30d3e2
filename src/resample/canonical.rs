//! Canonical vertex ordering for fixed-length polygons.
//!
//! The dense resampling is started at the vertex nearest the sequence's
//! own first vertex, stride-subsampled to the final count, forced
//! clockwise, and finally rotated so index 0 is the vertex nearest the
//! top-middle of the polygon's bounding box.

use kurbo::Point;

use crate::config::AnnotationConfig;
use crate::geom::{bounds, nearest_index, rotate_to_start, to_clockwise};

use super::resample;

/// Index of the vertex closest to the sequence's first vertex.
pub fn self_closure_start(points: &[Point]) -> usize {
    points
        .first()
        .and_then(|&first| nearest_index(points, first))
        .unwrap_or(0)
}

/// Every `stride`-th vertex, starting at index 0.
pub fn stride_sample(points: &[Point], stride: usize) -> Vec<Point> {
    points.iter().step_by(stride.max(1)).copied().collect()
}

/// Rotate so the vertex nearest `((xmin + xmax) / 2, ymin)` comes first.
pub fn unify_origin(points: &[Point]) -> Vec<Point> {
    let Some(rect) = bounds(points) else {
        return Vec::new();
    };
    let top_mid = Point::new((rect.x0 + rect.x1) / 2.0, rect.y0);
    let start = nearest_index(points, top_mid).unwrap_or(0);
    rotate_to_start(points, start)
}

/// Fixed-length, clockwise, canonically started polygon of
/// `config.num_points` vertices.
pub fn fixed_length_polygon(points: &[Point], config: &AnnotationConfig) -> Vec<Point> {
    let dense = resample(points, config.oversampled_points());
    let start = self_closure_start(&dense);
    let sparse = stride_sample(&rotate_to_start(&dense, start), config.spline_num);
    unify_origin(&to_clockwise(sparse))
}
