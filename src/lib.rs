//! polyprep: building-footprint polygons → fixed-length regression targets.
//!
//! Turns per-object polygon annotations into training targets for
//! polygon-regression segmentation models: an ordered, fixed-length vertex
//! sequence per polygon, per-vertex weights that mark the original corner
//! vertices, and an optional summed occupancy mask per image.
//!
//! # Example
//!
//! ```
//! use polyprep::{prepare_image, AnnotationConfig, ImageAnnotation, InstanceAnnotation, Segmentation};
//!
//! let image = ImageAnnotation {
//!     height: 64,
//!     width: 64,
//!     instances: vec![InstanceAnnotation {
//!         segmentation: Segmentation::Polygons(vec![vec![
//!             10.0, 10.0, 10.0, 40.0, 50.0, 40.0, 50.0, 10.0,
//!         ]]),
//!         bbox: [10.0, 10.0, 50.0, 40.0],
//!     }],
//! };
//! let config = AnnotationConfig {
//!     num_points: 32,
//!     key_points_weight: 5.0,
//!     ..AnnotationConfig::default()
//! };
//! let prepared = prepare_image(&image, &config)?;
//! let target = &prepared.instances[0].parts[0];
//! assert_eq!(target.points.len(), 32);
//! assert_eq!(target.weights.iter().filter(|&&w| w == 5.0).count(), 4);
//! # Ok::<(), polyprep::PrepError>(())
//! ```

#![forbid(unsafe_code)]

mod annotation;
mod config;
mod geom;
mod keypoints;
mod matching;
mod normalize;
mod resample;

pub mod error;
pub mod mask;

// Re-export kurbo so downstream users get the same Point type
// used by PolygonTarget.points.
pub use kurbo;

pub use annotation::{ImageAnnotation, InstanceAnnotation, Segmentation};
pub use config::AnnotationConfig;
pub use error::PrepError;
pub use geom::{polygon_area, signed_area, to_clockwise};
pub use keypoints::{extract as extract_keypoints, Keypoints};
pub use mask::{rasterize_instances, MaskRaster, Rle};
pub use matching::{assign, inject_keypoints};
pub use normalize::{bbox_rectangle, parse_polygon, parsed_polygons, valid_polygons};
pub use resample::canonical::{fixed_length_polygon, unify_origin};
pub use resample::{allot_edge_samples, resample};

use kurbo::Point;
use rayon::prelude::*;

/// One polygon's regression target: vertices and their weights, always
/// the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonTarget {
    pub points: Vec<Point>,
    pub weights: Vec<f64>,
}

/// Targets for one instance, one entry per valid polygon part.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceTargets {
    pub parts: Vec<PolygonTarget>,
}

/// Everything derived from one image's annotations.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    /// One entry per input instance, in input order.
    pub instances: Vec<InstanceTargets>,
    /// Summed occupancy raster, when `with_mask` is set.
    pub mask: Option<MaskRaster>,
    /// Instances that kept more than one polygon part.
    pub multi_part_instances: usize,
}

/// Targets for a single instance.
///
/// Fixed-length mode: each non-tiny part is resampled to `num_points`
/// canonical vertices and its keypoints are injected by optimal matching.
/// Otherwise each well-formed part, however small, yields its zero-padded
/// keypoints.
pub fn prepare_instance(instance: &InstanceAnnotation, config: &AnnotationConfig) -> InstanceTargets {
    let parts = instance.segmentation.polygons().unwrap_or_default();
    if parts.is_empty() {
        tracing::debug!(bbox = ?instance.bbox, "instance has no polygon parts");
    }

    if !config.fixed_length() {
        let parts = normalize::parsed_polygons(parts, instance.bbox)
            .iter()
            .map(|poly| {
                let keypoints = keypoints::extract(poly, config);
                PolygonTarget {
                    points: keypoints.points,
                    weights: keypoints.weights,
                }
            })
            .collect();
        return InstanceTargets { parts };
    }

    let parts = normalize::valid_polygons(parts, instance.bbox, config)
        .iter()
        .map(|poly| {
            let keypoints = keypoints::extract(poly, config);
            let dense = resample::canonical::fixed_length_polygon(poly, config);
            matching::inject_keypoints(dense, keypoints.real(), config.key_points_weight)
        })
        .collect();
    InstanceTargets { parts }
}

/// Targets (and optionally the occupancy mask) for one image.
///
/// Only an invalid configuration is an error; degenerate annotations are
/// repaired or dropped.
pub fn prepare_image(
    image: &ImageAnnotation,
    config: &AnnotationConfig,
) -> Result<PreparedImage, PrepError> {
    config.validate()?;

    let instances = image
        .instances
        .iter()
        .map(|instance| prepare_instance(instance, config))
        .collect::<Vec<_>>();

    let multi_part_instances = instances.iter().filter(|t| t.parts.len() > 1).count();
    if multi_part_instances > 0 {
        tracing::debug!(multi_part_instances, "instances with several polygon parts");
    }

    let mask = config
        .with_mask
        .then(|| mask::rasterize_instances(&image.instances, image.height, image.width));

    tracing::debug!(
        instances = instances.len(),
        height = image.height,
        width = image.width,
        with_mask = mask.is_some(),
        "prepared image annotations"
    );

    Ok(PreparedImage {
        instances,
        mask,
        multi_part_instances,
    })
}

/// [`prepare_image`] over a batch, in parallel, preserving input order.
pub fn prepare_images(
    images: &[ImageAnnotation],
    config: &AnnotationConfig,
) -> Result<Vec<PreparedImage>, PrepError> {
    config.validate()?;
    images
        .par_iter()
        .map(|image| prepare_image(image, config))
        .collect()
}
