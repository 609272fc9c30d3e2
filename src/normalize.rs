//! Polygon normalization: flat coordinates → valid closed polygons.
//!
//! Malformed parts (odd coordinate count, fewer than three vertices) are
//! dropped everywhere. Fixed-length targets also filter tiny parts; an
//! instance that loses every part is replaced by its bounding-box
//! rectangle.

use kurbo::Point;

use crate::config::AnnotationConfig;
use crate::geom::{bounds, polygon_area};

/// Reshape a flat `[x0, y0, x1, y1, ...]` list into points.
///
/// Returns `None` for odd-length input or fewer than three vertices.
/// A trailing vertex equal to the first is dropped.
pub fn parse_polygon(flat: &[f64]) -> Option<Vec<Point>> {
    if flat.len() % 2 != 0 {
        return None;
    }
    let mut points: Vec<Point> = flat
        .chunks_exact(2)
        .map(|xy| Point::new(xy[0], xy[1]))
        .collect();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    (points.len() >= 3).then_some(points)
}

/// Whether a polygon is too small to supervise on.
///
/// Tiny = bounding box narrower or shorter than `min_extent`, or shoelace
/// area not above `min_area`.
pub fn is_tiny(points: &[Point], config: &AnnotationConfig) -> bool {
    let Some(rect) = bounds(points) else {
        return true;
    };
    rect.width() < config.min_extent
        || rect.height() < config.min_extent
        || polygon_area(points) <= config.min_area
}

/// Rectangle from `[xmin, ymin, xmax, ymax]`: top-left, bottom-left,
/// bottom-right, top-right.
pub fn bbox_rectangle(bbox: [f64; 4]) -> Vec<Point> {
    let [xmin, ymin, xmax, ymax] = bbox;
    vec![
        Point::new(xmin, ymin),
        Point::new(xmin, ymax),
        Point::new(xmax, ymax),
        Point::new(xmax, ymin),
    ]
}

/// Valid, non-tiny parts of one instance, never empty.
pub fn valid_polygons(
    parts: &[Vec<f64>],
    bbox: [f64; 4],
    config: &AnnotationConfig,
) -> Vec<Vec<Point>> {
    let polygons: Vec<Vec<Point>> = parts
        .iter()
        .filter_map(|flat| parse_polygon(flat))
        .filter(|poly| !is_tiny(poly, config))
        .collect();
    if polygons.is_empty() {
        tracing::debug!(?bbox, "no usable polygon parts, falling back to bbox");
        return vec![bbox_rectangle(bbox)];
    }
    polygons
}

/// Well-formed parts of one instance, tiny ones included.
///
/// Keypoint-only targets keep a building's true outline however small it
/// is. The bounding-box rectangle stands in only when no part parses.
pub fn parsed_polygons(parts: &[Vec<f64>], bbox: [f64; 4]) -> Vec<Vec<Point>> {
    let polygons: Vec<Vec<Point>> = parts.iter().filter_map(|flat| parse_polygon(flat)).collect();
    if polygons.is_empty() {
        tracing::debug!(?bbox, "no well-formed polygon parts, falling back to bbox");
        return vec![bbox_rectangle(bbox)];
    }
    polygons
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(&[0.0, 0.0, 1.0, 1.0] ; "two points")]
    #[test_case(&[0.0, 0.0, 1.0, 1.0, 2.0] ; "odd length")]
    #[test_case(&[0.0, 0.0, 5.0, 5.0, 0.0, 0.0] ; "closed two points")]
    #[test_case(&[] ; "empty")]
    fn malformed_is_rejected(flat: &[f64]) {
        assert_eq!(parse_polygon(flat), None);
    }

    #[test]
    fn trailing_duplicate_dropped() {
        let poly = parse_polygon(&[0.0, 0.0, 0.0, 4.0, 4.0, 4.0, 0.0, 0.0]).unwrap();
        assert_eq!(poly.len(), 3);
    }

    #[test_case(&[0.0, 0.0, 0.0, 10.0, 10.0, 10.0, 10.0, 0.0], false ; "square")]
    #[test_case(&[0.0, 0.0, 0.0, 10.0, 0.5, 10.0, 0.5, 0.0], true ; "too narrow")]
    #[test_case(&[0.0, 0.0, 0.0, 2.0, 2.0, 2.0, 2.0, 0.0], true ; "area four")]
    #[test_case(&[0.0, 0.0, 0.0, 5.0, 1.0, 5.0, 1.0, 0.0], true ; "area exactly five")]
    fn tiny_filter(flat: &[f64], tiny: bool) {
        let poly = parse_polygon(flat).unwrap();
        assert_eq!(is_tiny(&poly, &AnnotationConfig::default()), tiny);
    }

    #[test]
    fn degenerate_instance_falls_back_to_bbox() {
        let parts = vec![vec![0.0, 0.0, 1.0, 1.0], vec![0.0, 0.0, 0.0, 2.0, 2.0, 2.0, 2.0, 0.0]];
        let polys = valid_polygons(&parts, [3.0, 4.0, 13.0, 24.0], &AnnotationConfig::default());
        assert_eq!(
            polys,
            vec![vec![
                Point::new(3.0, 4.0),
                Point::new(3.0, 24.0),
                Point::new(13.0, 24.0),
                Point::new(13.0, 4.0),
            ]]
        );
    }

    #[test]
    fn only_valid_parts_survive() {
        let parts = vec![
            vec![0.0, 0.0, 1.0, 1.0],
            vec![0.0, 0.0, 0.0, 10.0, 10.0, 10.0, 10.0, 0.0],
        ];
        let polys = valid_polygons(&parts, [0.0, 0.0, 10.0, 10.0], &AnnotationConfig::default());
        assert_eq!(polys.len(), 1);
        assert_eq!(polys[0].len(), 4);
    }

    #[test]
    fn parsing_alone_keeps_tiny_parts() {
        let parts = vec![vec![0.0, 0.0, 3.0, 0.0, 0.0, 3.0], vec![1.0, 2.0, 3.0]];
        let polys = parsed_polygons(&parts, [0.0, 0.0, 3.0, 3.0]);
        assert_eq!(
            polys,
            vec![vec![Point::new(0.0, 0.0), Point::new(3.0, 0.0), Point::new(0.0, 3.0)]]
        );
        assert_eq!(parsed_polygons(&[], [1.0, 1.0, 2.0, 2.0]).len(), 1);
    }
}
