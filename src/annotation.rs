//! Per-image annotation inputs as handed over by the dataset loader.
//!
//! Shapes follow COCO instance segmentation: a segmentation is either a
//! list of flat polygons, an uncompressed RLE, or a compressed RLE string.

use serde::{Deserialize, Serialize};

/// One object's segmentation in any of the accepted input forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segmentation {
    /// Flat `[x0, y0, x1, y1, ...]` lists; several parts form one object.
    Polygons(Vec<Vec<f64>>),
    /// Column-major run lengths, starting with a background run.
    UncompressedRle { size: [u32; 2], counts: Vec<u32> },
    /// COCO's compact string encoding of the run lengths.
    CompressedRle { size: [u32; 2], counts: String },
}

impl Segmentation {
    /// Polygon parts, or `None` for run-length forms.
    pub fn polygons(&self) -> Option<&[Vec<f64>]> {
        match self {
            Segmentation::Polygons(parts) => Some(parts),
            _ => None,
        }
    }
}

/// One building footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceAnnotation {
    pub segmentation: Segmentation,
    /// `[xmin, ymin, xmax, ymax]`.
    pub bbox: [f64; 4],
}

/// All footprints of one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAnnotation {
    pub height: u32,
    pub width: u32,
    pub instances: Vec<InstanceAnnotation>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserializes_every_segmentation_form() {
        let json = r#"[
            [[0, 0, 0, 10, 10, 10, 10, 0]],
            {"size": [4, 4], "counts": [5, 3, 8]},
            {"size": [4, 4], "counts": "538"}
        ]"#;
        let forms: Vec<Segmentation> = serde_json::from_str(json).unwrap();
        assert_eq!(
            forms[0],
            Segmentation::Polygons(vec![vec![0.0, 0.0, 0.0, 10.0, 10.0, 10.0, 10.0, 0.0]])
        );
        assert_eq!(
            forms[1],
            Segmentation::UncompressedRle {
                size: [4, 4],
                counts: vec![5, 3, 8]
            }
        );
        assert!(matches!(forms[2], Segmentation::CompressedRle { .. }));
        assert!(forms[1].polygons().is_none());
    }

    #[test]
    fn image_round_trips_through_json() {
        let image = ImageAnnotation {
            height: 32,
            width: 32,
            instances: vec![InstanceAnnotation {
                segmentation: Segmentation::Polygons(vec![vec![1.0, 1.0, 1.0, 9.0, 9.0, 9.0]]),
                bbox: [1.0, 1.0, 9.0, 9.0],
            }],
        };
        let text = serde_json::to_string(&image).unwrap();
        let back: ImageAnnotation = serde_json::from_str(&text).unwrap();
        assert_eq!(back, image);
    }
}
