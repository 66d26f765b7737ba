//! Filling of unreliable disparities
//!
//! Pixels rejected by the uniqueness test can be replaced by a weighted
//! average over their reliable neighbourhood before visualisation. This is
//! a separate pass over the finished map; callers chain it after
//! [`compute_disparity_map`](crate::compute_disparity_map) when they want a
//! dense result.

use crate::select::UNRELIABLE;
use crate::{MatchError, MatchResult};
use stereobm_core::{ElemKind, Image};

/// Interpolation weights, centered on the pixel being filled
const KERNEL: [[i32; 5]; 5] = [
    [1, 2, 3, 2, 1],
    [2, 4, 6, 4, 2],
    [3, 6, 9, 6, 3],
    [2, 4, 6, 4, 2],
    [1, 2, 3, 2, 1],
];

/// Minimum number of reliable neighbours for an accepted fill
const MIN_CONTRIBUTORS: u32 = 5;

/// Minimum absolute weighted sum for an accepted fill
const MIN_WEIGHTED_SUM: i32 = 30;

/// Replace unreliable pixels by a weighted average of their neighbours.
///
/// Every pixel holding the unreliable sentinel is re-estimated from the
/// reliable pixels in its 5x5 neighbourhood; each contributes its disparity
/// scaled by the kernel weight, and the sum is normalized by the weights
/// that actually contributed. The estimate is kept only when more than 5
/// neighbours contributed and the absolute weighted sum exceeds 30;
/// otherwise the pixel stays unreliable.
///
/// The pass reads a snapshot of the input map, so a filled pixel never
/// feeds the estimate of a later one.
///
/// # Errors
///
/// Returns `MatchError::InvalidParameters` if the map is not S16.
pub fn interpolate_unreliable(disparity: &Image) -> MatchResult<Image> {
    if disparity.kind() != ElemKind::S16 {
        return Err(MatchError::InvalidParameters(format!(
            "disparity map must be s16, got {}",
            disparity.kind()
        )));
    }

    let src = disparity.as_s16()?;
    let w = disparity.width() as i64;
    let h = disparity.height() as i64;

    let mut out = disparity.to_mut();

    for y in 0..h {
        for x in 0..w {
            if src[(y * w + x) as usize] != UNRELIABLE {
                continue;
            }

            let mut sum: i32 = 0;
            let mut weight: i32 = 0;
            let mut contributors: u32 = 0;

            for (ky, kernel_row) in KERNEL.iter().enumerate() {
                let sy = y + ky as i64 - 2;
                if sy < 0 || sy >= h {
                    continue;
                }
                for (kx, &k) in kernel_row.iter().enumerate() {
                    let sx = x + kx as i64 - 2;
                    if sx < 0 || sx >= w {
                        continue;
                    }
                    let v = src[(sy * w + sx) as usize];
                    if v != UNRELIABLE {
                        sum += k * v as i32;
                        weight += k;
                        contributors += 1;
                    }
                }
            }

            if contributors > MIN_CONTRIBUTORS && sum.abs() > MIN_WEIGHTED_SUM {
                let filled = (sum as f64 / weight as f64).round() as i16;
                out.set_s16(x as u32, y as u32, filled)?;
            }
        }
    }

    Ok(out.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stereobm_core::ImageMut;

    fn map_from_fn(w: u32, h: u32, f: impl Fn(u32, u32) -> i16) -> Image {
        let mut m = ImageMut::new(w, h, ElemKind::S16).unwrap();
        for y in 0..h {
            for x in 0..w {
                m.set_s16(x, y, f(x, y)).unwrap();
            }
        }
        m.into()
    }

    #[test]
    fn test_isolated_hole_filled() {
        // Uniform disparity 8 with one unreliable pixel
        let map = map_from_fn(11, 11, |x, y| if (x, y) == (5, 5) { UNRELIABLE } else { 8 });
        let filled = interpolate_unreliable(&map).unwrap();

        // 24 reliable neighbours, every one worth 8
        assert_eq!(filled.get_s16(5, 5), Some(8));
        // Reliable pixels are untouched
        assert_eq!(filled.get_s16(0, 0), Some(8));
    }

    #[test]
    fn test_gradient_neighbourhood_averages() {
        // Disparity ramps along x; the fill lands on the ramp value
        let map = map_from_fn(11, 11, |x, y| {
            if (x, y) == (5, 5) { UNRELIABLE } else { x as i16 }
        });
        let filled = interpolate_unreliable(&map).unwrap();

        // Symmetric kernel over a symmetric ramp: exactly the center value
        assert_eq!(filled.get_s16(5, 5), Some(5));
    }

    #[test]
    fn test_sparse_neighbourhood_left_unreliable() {
        // A blob of unreliable pixels: the center sees none reliable
        let map = map_from_fn(11, 11, |x, y| {
            if (3..=7).contains(&x) && (3..=7).contains(&y) {
                UNRELIABLE
            } else {
                6
            }
        });
        let filled = interpolate_unreliable(&map).unwrap();

        assert_eq!(filled.get_s16(5, 5), Some(UNRELIABLE));
        // A corner of the blob still sees enough reliable pixels
        assert_ne!(filled.get_s16(3, 3), Some(UNRELIABLE));
    }

    #[test]
    fn test_small_weighted_sum_rejected() {
        // Neighbours all zero: plenty of contributors but |sum| = 0 <= 30
        let map = map_from_fn(11, 11, |x, y| if (x, y) == (5, 5) { UNRELIABLE } else { 0 });
        let filled = interpolate_unreliable(&map).unwrap();

        assert_eq!(filled.get_s16(5, 5), Some(UNRELIABLE));
    }

    #[test]
    fn test_border_hole() {
        // The kernel is clipped at the image corner; 8 in-bounds reliable
        // neighbours remain, which is enough
        let map = map_from_fn(11, 11, |x, y| if (x, y) == (0, 0) { UNRELIABLE } else { 9 });
        let filled = interpolate_unreliable(&map).unwrap();

        assert_eq!(filled.get_s16(0, 0), Some(9));
    }

    #[test]
    fn test_no_feedback_between_fills() {
        // Two adjacent holes: each is estimated from the original map, so
        // the left fill must not contribute to the right one. With a ramp,
        // both land on their own column values independently.
        let map = map_from_fn(13, 11, |x, y| {
            if y == 5 && (x == 5 || x == 6) {
                UNRELIABLE
            } else {
                x as i16
            }
        });
        let filled = interpolate_unreliable(&map).unwrap();

        let left = filled.get_s16(5, 5).unwrap();
        let right = filled.get_s16(6, 5).unwrap();
        assert!((left - 5).abs() <= 1, "left fill {left}");
        assert!((right - 6).abs() <= 1, "right fill {right}");
    }

    #[test]
    fn test_rejects_wrong_kind() {
        let img = Image::new(8, 8, ElemKind::U8).unwrap();
        assert!(interpolate_unreliable(&img).is_err());
    }
}
