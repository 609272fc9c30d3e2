//! COCO-compatible run-length masks.
//!
//! Runs are column-major (pixel `(x, y)` is at index `y + h * x`) and
//! alternate background/foreground, starting with background. Polygon
//! rasterization uses the toolkit's scan-line rules so masks agree
//! pixel-for-pixel with masks produced by the reference tooling:
//!
//! 1. Upsample vertices 5x and trace every boundary step on the fine grid
//! 2. Keep the crossings that land on pixel-column centres
//! 3. Sort the crossings and turn their gaps into run lengths

use image::Luma;

use super::MaskRaster;
use crate::error::PrepError;

/// Boundary upsampling factor used by the reference rasterizer.
const UPSAMPLE: f64 = 5.0;

/// A run-length encoded binary mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rle {
    pub h: u32,
    pub w: u32,
    pub counts: Vec<u32>,
}

impl Rle {
    /// All-background mask.
    pub fn empty(h: u32, w: u32) -> Self {
        let mut counts = Vec::new();
        push_run(&mut counts, u64::from(h) * u64::from(w));
        Rle { h, w, counts }
    }

    /// Encode a column-major mask.
    pub fn encode(mask: &[bool], h: u32, w: u32) -> Self {
        let mut counts = Vec::new();
        let mut current = false;
        let mut run = 0u64;
        for &v in mask {
            if v != current {
                push_run(&mut counts, run);
                run = 0;
                current = v;
            }
            run += 1;
        }
        push_run(&mut counts, run);
        Rle { h, w, counts }
    }

    /// Rasterize one flat `[x0, y0, x1, y1, ...]` polygon.
    pub fn from_polygon(xy: &[f64], h: u32, w: u32) -> Self {
        let k = xy.len() / 2;
        if k < 3 || h == 0 || w == 0 {
            return Rle::empty(h, w);
        }

        // ── Dense boundary on the upsampled grid ──────────────
        let upsample = |v: f64| (UPSAMPLE * v + 0.5) as i64;
        let mut x: Vec<i64> = (0..k).map(|j| upsample(xy[2 * j])).collect();
        let mut y: Vec<i64> = (0..k).map(|j| upsample(xy[2 * j + 1])).collect();
        x.push(x[0]);
        y.push(y[0]);

        let mut u: Vec<i64> = Vec::new();
        let mut v: Vec<i64> = Vec::new();
        for j in 0..k {
            let (mut xs, mut xe, mut ys, mut ye) = (x[j], x[j + 1], y[j], y[j + 1]);
            let dx = (xe - xs).abs();
            let dy = (ys - ye).abs();
            let flip = (dx >= dy && xs > xe) || (dx < dy && ys > ye);
            if flip {
                std::mem::swap(&mut xs, &mut xe);
                std::mem::swap(&mut ys, &mut ye);
            }
            let slope = match (dx, dy) {
                (0, 0) => 0.0,
                _ if dx >= dy => (ye - ys) as f64 / dx as f64,
                _ => (xe - xs) as f64 / dy as f64,
            };
            if dx >= dy {
                for d in 0..=dx {
                    let t = if flip { dx - d } else { d };
                    u.push(t + xs);
                    v.push((ys as f64 + slope * t as f64 + 0.5) as i64);
                }
            } else {
                for d in 0..=dy {
                    let t = if flip { dy - d } else { d };
                    v.push(t + ys);
                    u.push((xs as f64 + slope * t as f64 + 0.5) as i64);
                }
            }
        }

        // ── Column-centre crossings, downsampled ──────────────
        let (hf, wf) = (h as f64, w as f64);
        let mut starts: Vec<u64> = Vec::new();
        for j in 1..u.len() {
            if u[j] == u[j - 1] {
                continue;
            }
            let xd = if u[j] < u[j - 1] { u[j] } else { u[j] - 1 };
            let xd = (xd as f64 + 0.5) / UPSAMPLE - 0.5;
            if xd.floor() != xd || xd < 0.0 || xd > wf - 1.0 {
                continue;
            }
            let yd = v[j].min(v[j - 1]) as f64;
            let yd = ((yd + 0.5) / UPSAMPLE - 0.5).clamp(0.0, hf).ceil();
            starts.push(xd as u64 * u64::from(h) + yd as u64);
        }

        // ── Crossings → run lengths ───────────────────────────
        starts.push(u64::from(h) * u64::from(w));
        starts.sort_unstable();
        let mut prev = 0;
        for s in starts.iter_mut() {
            let at = *s;
            *s -= prev;
            prev = at;
        }
        let mut runs: Vec<u64> = vec![starts[0]];
        let mut j = 1;
        while j < starts.len() {
            if starts[j] > 0 {
                runs.push(starts[j]);
                j += 1;
            } else {
                // Zero-length run: fold the following run into the last one.
                j += 1;
                if let (Some(next), Some(last)) = (starts.get(j), runs.last_mut()) {
                    *last += *next;
                    j += 1;
                }
            }
        }
        let mut counts = Vec::with_capacity(runs.len());
        for run in runs {
            push_run(&mut counts, run);
        }
        Rle { h, w, counts }
    }

    /// Union of all parts of a multi-part polygon.
    pub fn from_polygons(parts: &[Vec<f64>], h: u32, w: u32) -> Self {
        let rles: Vec<Rle> = parts.iter().map(|p| Rle::from_polygon(p, h, w)).collect();
        Rle::union(&rles, h, w)
    }

    /// Union of masks of the same size.
    pub fn union(rles: &[Rle], h: u32, w: u32) -> Self {
        match rles {
            [] => Rle::empty(h, w),
            [single] => single.clone(),
            _ => {
                let mut mask = vec![false; h as usize * w as usize];
                for rle in rles {
                    for (slot, on) in mask.iter_mut().zip(rle.column_major()) {
                        *slot |= on;
                    }
                }
                Rle::encode(&mask, h, w)
            }
        }
    }

    /// Number of foreground pixels.
    pub fn area(&self) -> u64 {
        self.counts.iter().skip(1).step_by(2).map(|&c| u64::from(c)).sum()
    }

    /// Check that the runs cover exactly `h * w` pixels.
    pub fn validate(&self) -> Result<(), PrepError> {
        let expected = u64::from(self.h) * u64::from(self.w);
        let actual: u64 = self.counts.iter().map(|&c| u64::from(c)).sum();
        if actual != expected {
            return Err(PrepError::RleLength {
                h: self.h,
                w: self.w,
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Decode into an `h x w` raster of 0.0 / 1.0.
    pub fn decode(&self) -> Result<MaskRaster, PrepError> {
        self.validate()?;
        let mut raster = MaskRaster::new(self.w, self.h);
        if self.h == 0 {
            return Ok(raster);
        }
        let h = u64::from(self.h);
        for (i, on) in self.column_major().enumerate() {
            if on {
                let i = i as u64;
                raster.put_pixel((i / h) as u32, (i % h) as u32, Luma([1.0]));
            }
        }
        Ok(raster)
    }

    /// COCO's compact string form: 5-bit groups offset by `'0'`, with
    /// counts after the third stored as a delta to `counts[i - 2]`.
    pub fn to_compressed(&self) -> String {
        let mut s = String::new();
        for (i, &count) in self.counts.iter().enumerate() {
            let mut x = i64::from(count);
            if i > 2 {
                x -= i64::from(self.counts[i - 2]);
            }
            loop {
                let mut c = (x & 0x1f) as u8;
                x >>= 5;
                let more = if c & 0x10 != 0 { x != -1 } else { x != 0 };
                if more {
                    c |= 0x20;
                }
                s.push(char::from(c + 48));
                if !more {
                    break;
                }
            }
        }
        s
    }

    /// Parse the compact string form.
    pub fn from_compressed(s: &str, h: u32, w: u32) -> Result<Self, PrepError> {
        let bytes = s.as_bytes();
        let mut counts: Vec<u32> = Vec::new();
        let mut p = 0;
        while p < bytes.len() {
            let mut x: i64 = 0;
            let mut k = 0;
            loop {
                let c = match bytes.get(p) {
                    Some(&b) if (48..48 + 64).contains(&b) => i64::from(b - 48),
                    _ => return Err(PrepError::RleString(p)),
                };
                if k >= 12 {
                    return Err(PrepError::RleString(p));
                }
                x |= (c & 0x1f) << (5 * k);
                p += 1;
                k += 1;
                if c & 0x20 == 0 {
                    if c & 0x10 != 0 {
                        x |= -1i64 << (5 * k);
                    }
                    break;
                }
            }
            if counts.len() > 2 {
                x += i64::from(counts[counts.len() - 2]);
            }
            let count = u32::try_from(x).map_err(|_| PrepError::RleString(p))?;
            counts.push(count);
        }
        Ok(Rle { h, w, counts })
    }

    /// Per-pixel foreground flags in column-major order, clipped to `h * w`.
    fn column_major(&self) -> impl Iterator<Item = bool> + '_ {
        let n = self.h as usize * self.w as usize;
        self.counts
            .iter()
            .enumerate()
            .flat_map(|(i, &c)| std::iter::repeat(i % 2 == 1).take(c as usize))
            .chain(std::iter::repeat(false))
            .take(n)
    }
}

/// Append a run, splitting lengths beyond `u32::MAX` around empty runs
/// of the opposite value.
fn push_run(counts: &mut Vec<u32>, len: u64) {
    let max = u64::from(u32::MAX);
    let mut rest = len;
    while rest > max {
        counts.extend([u32::MAX, 0]);
        rest -= max;
    }
    counts.push(rest as u32);
}
