//! Occupancy raster: every instance decoded and summed into one mask.

pub mod rle;

use image::{ImageBuffer, Luma};

use crate::annotation::{InstanceAnnotation, Segmentation};
use crate::error::PrepError;

pub use rle::Rle;

/// `height x width` float raster. Overlapping instances add up, so a
/// pixel holds the number of instances covering it.
pub type MaskRaster = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Run-length mask of one segmentation, whatever its input form.
///
/// Polygons are rasterized at `h x w`; RLE forms keep their own size.
pub fn instance_rle(segmentation: &Segmentation, h: u32, w: u32) -> Result<Rle, PrepError> {
    match segmentation {
        Segmentation::Polygons(parts) => Ok(Rle::from_polygons(parts, h, w)),
        Segmentation::UncompressedRle { size, counts } => Ok(Rle {
            h: size[0],
            w: size[1],
            counts: counts.clone(),
        }),
        Segmentation::CompressedRle { size, counts } => {
            Rle::from_compressed(counts, size[0], size[1])
        }
    }
}

/// Sum of all instance masks.
///
/// A malformed instance or one whose size differs from `h x w` voids
/// the whole raster: an all-zero mask is returned and a warning logged.
pub fn rasterize_instances(instances: &[InstanceAnnotation], h: u32, w: u32) -> MaskRaster {
    match try_rasterize(instances, h, w) {
        Ok(raster) => raster,
        Err(err) => {
            tracing::warn!(%err, h, w, "discarding occupancy mask");
            MaskRaster::new(w, h)
        }
    }
}

fn try_rasterize(instances: &[InstanceAnnotation], h: u32, w: u32) -> Result<MaskRaster, PrepError> {
    let mut total = MaskRaster::new(w, h);
    for instance in instances {
        let mask = instance_rle(&instance.segmentation, h, w)?.decode()?;
        if mask.dimensions() != total.dimensions() {
            return Err(PrepError::ShapeMismatch {
                expected: (h, w),
                actual: (mask.height(), mask.width()),
            });
        }
        for (acc, px) in total.pixels_mut().zip(mask.pixels()) {
            acc.0[0] += px.0[0];
        }
    }
    Ok(total)
}
