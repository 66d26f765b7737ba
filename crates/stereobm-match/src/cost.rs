//! Cost volume storage and the per-pixel matching cost
//!
//! A cost volume is one image per candidate disparity, all sharing the
//! input size. It is kept as a single flat allocation of shape
//! (levels, height, width) rather than a vector of independent images:
//! the per-level aggregation sweep then walks contiguous memory, and the
//! whole volume is released at one point.

use crate::MatchResult;
use stereobm_core::{Error, Image};

/// Flat cost volume of shape (levels, height, width)
///
/// Level `d` holds the costs of candidate disparity `d`; the volume always
/// has `max_disparity + 1` levels indexed `0..=max_disparity`. The cell
/// type is `i16` for per-pixel costs and `u32` for aggregated block costs.
#[derive(Debug, Clone)]
pub struct CostVolume<T> {
    levels: u32,
    width: u32,
    height: u32,
    data: Vec<T>,
}

impl<T: Copy + Default> CostVolume<T> {
    /// Create a zero-initialized volume.
    pub fn new(levels: u32, width: u32, height: u32) -> Self {
        let len = (levels as usize) * (width as usize) * (height as usize);
        CostVolume {
            levels,
            width,
            height,
            data: vec![T::default(); len],
        }
    }

    /// Get the number of disparity levels
    #[inline]
    pub fn levels(&self) -> u32 {
        self.levels
    }

    /// Get the plane width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the plane height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn plane_len(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Borrow the plane of disparity level `d`.
    ///
    /// # Panics
    ///
    /// Panics if `d >= levels`.
    #[inline]
    pub fn level(&self, d: u32) -> &[T] {
        let len = self.plane_len();
        let start = (d as usize) * len;
        &self.data[start..start + len]
    }

    /// Borrow the plane of disparity level `d` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `d >= levels`.
    #[inline]
    pub fn level_mut(&mut self, d: u32) -> &mut [T] {
        let len = self.plane_len();
        let start = (d as usize) * len;
        &mut self.data[start..start + len]
    }

    /// Get the cost at level `d`, pixel (x, y).
    #[inline]
    pub fn at(&self, d: u32, x: u32, y: u32) -> T {
        debug_assert!(d < self.levels && x < self.width && y < self.height);
        let idx = ((d as usize) * (self.height as usize) + (y as usize)) * (self.width as usize)
            + (x as usize);
        self.data[idx]
    }

    /// Set the cost at level `d`, pixel (x, y).
    #[inline]
    pub fn set(&mut self, d: u32, x: u32, y: u32, val: T) {
        debug_assert!(d < self.levels && x < self.width && y < self.height);
        let idx = ((d as usize) * (self.height as usize) + (y as usize)) * (self.width as usize)
            + (x as usize);
        self.data[idx] = val;
    }
}

/// Build the per-pixel cost volume from two gradient planes.
///
/// For each candidate disparity d, level d holds
/// `|left(x, y) - right(x - d, y)|` wherever `x >= d` and 0 elsewhere.
/// The inner disparity loop stops as soon as the candidate would reach
/// outside the right image.
///
/// # Errors
///
/// Returns an error if the planes differ in size or are not S16.
pub fn build_pixel_costs(
    left: &Image,
    right: &Image,
    max_disparity: i16,
) -> MatchResult<CostVolume<i16>> {
    if left.dimensions() != right.dimensions() {
        return Err(Error::DimensionMismatch {
            expected: left.dimensions(),
            actual: right.dimensions(),
        }
        .into());
    }

    let l = left.as_s16()?;
    let r = right.as_s16()?;
    let w = left.width() as usize;
    let h = left.height() as usize;
    let levels = max_disparity.max(0) as u32 + 1;

    let mut volume = CostVolume::new(levels, left.width(), left.height());
    let plane = w * h;

    for y in 0..h {
        let row_base = y * w;
        for x in 0..w {
            let lv = l[row_base + x] as i32;
            for d in 0..levels as usize {
                if x < d {
                    break;
                }
                let rv = r[row_base + x - d] as i32;
                volume.data[d * plane + row_base + x] = (lv - rv).abs() as i16;
            }
        }
    }

    Ok(volume)
}
