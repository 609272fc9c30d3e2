use serde::{Deserialize, Serialize};

use crate::error::PrepError;

/// All target-preparation parameters in one struct.
/// Serializable so training presets can be stored next to the model config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    // -- Fixed-length targets --
    /// Vertices per output polygon. 0 disables fixed-length mode and
    /// emits the simplified keypoints only.
    pub num_points: usize,
    /// Oversampling stride. Polygons are first resampled to
    /// `spline_num * num_points` vertices, then every `spline_num`-th
    /// vertex is kept.
    pub spline_num: usize,
    /// Weight assigned to vertices matched to a keypoint. Unmatched
    /// vertices carry weight 1.
    pub key_points_weight: f64,

    // -- Filtering --
    /// Minimum bounding-box width and height of a kept polygon.
    pub min_extent: f64,
    /// Polygons with shoelace area at or below this are discarded.
    pub min_area: f64,

    // -- Keypoints --
    /// Douglas-Peucker tolerance for keypoint extraction.
    pub simplify_tolerance: f64,
    /// Keypoint array size used when `num_points == 0`.
    pub keypoint_cap: usize,

    // -- Raster --
    /// Also rasterize every instance into a summed occupancy mask.
    pub with_mask: bool,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            num_points: 0,
            spline_num: 10,
            key_points_weight: 1.0,
            min_extent: 1.0,
            min_area: 5.0,
            simplify_tolerance: 0.5,
            keypoint_cap: 64,
            with_mask: false,
        }
    }
}

impl AnnotationConfig {
    /// Whether instances produce `num_points`-long vertex sequences.
    pub fn fixed_length(&self) -> bool {
        self.num_points > 0
    }

    /// Size of the zero-padded keypoint array (`T`).
    pub fn keypoint_threshold(&self) -> usize {
        if self.fixed_length() {
            self.num_points
        } else {
            self.keypoint_cap
        }
    }

    /// Working resolution for the dense resampling pass.
    pub fn oversampled_points(&self) -> usize {
        self.spline_num * self.num_points
    }

    pub fn validate(&self) -> Result<(), PrepError> {
        if self.fixed_length() && self.spline_num == 0 {
            return Err(PrepError::InvalidConfig(
                "spline_num must be positive when num_points > 0".into(),
            ));
        }
        if !self.fixed_length() && self.keypoint_cap == 0 {
            return Err(PrepError::InvalidConfig(
                "keypoint_cap must be positive when num_points == 0".into(),
            ));
        }
        if !self.key_points_weight.is_finite() {
            return Err(PrepError::InvalidConfig(format!(
                "key_points_weight must be finite, got {}",
                self.key_points_weight
            )));
        }
        if self.simplify_tolerance < 0.0 || self.min_extent < 0.0 || self.min_area < 0.0 {
            return Err(PrepError::InvalidConfig(
                "tolerances and thresholds must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        let config = AnnotationConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.fixed_length());
        assert_eq!(config.keypoint_threshold(), 64);
    }

    #[test]
    fn threshold_follows_num_points() {
        let config = AnnotationConfig {
            num_points: 32,
            ..AnnotationConfig::default()
        };
        assert_eq!(config.keypoint_threshold(), 32);
        assert_eq!(config.oversampled_points(), 320);
    }

    #[test]
    fn zero_stride_rejected_in_fixed_mode() {
        let config = AnnotationConfig {
            num_points: 16,
            spline_num: 0,
            ..AnnotationConfig::default()
        };
        assert!(matches!(config.validate(), Err(PrepError::InvalidConfig(_))));
    }

    #[test]
    fn nan_weight_rejected() {
        let config = AnnotationConfig {
            key_points_weight: f64::NAN,
            ..AnnotationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: AnnotationConfig =
            serde_json::from_str(r#"{"num_points": 64, "key_points_weight": 5}"#).unwrap();
        assert_eq!(config.num_points, 64);
        assert_eq!(config.key_points_weight, 5.0);
        assert_eq!(config.spline_num, 10);
    }
}
