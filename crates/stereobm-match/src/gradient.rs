//! Horizontal-gradient prefilter
//!
//! Differentiating both frames horizontally before matching suppresses the
//! per-camera brightness and gain mismatches that would otherwise dominate
//! absolute-difference costs.

use crate::MatchResult;
use stereobm_core::{ElemKind, Image, ImageMut};

/// Apply the horizontal Sobel operator to an 8-bit grayscale image.
///
/// Convolves with the 3x3 kernel
///
/// ```text
/// [ -1  0  1 ]
/// [ -2  0  2 ]
/// [ -1  0  1 ]
/// ```
///
/// over interior pixels; the 1-pixel border is left zero. The result is
/// signed and not clamped (range -1020..=1020), stored as S16. Taking the
/// absolute value here would destroy the gradient direction that the
/// matcher relies on at edges.
///
/// # Errors
///
/// Returns a kind-mismatch error if the input is not U8.
pub fn sobel_x(src: &Image) -> MatchResult<Image> {
    let data = src.as_u8()?;
    let w = src.width() as usize;
    let h = src.height() as usize;

    let mut out = ImageMut::new(src.width(), src.height(), ElemKind::S16)?;
    let dst = out.as_s16_mut()?;

    for y in 1..h.saturating_sub(1) {
        let above = &data[(y - 1) * w..y * w];
        let row = &data[y * w..(y + 1) * w];
        let below = &data[(y + 1) * w..(y + 2) * w];
        let out_row = &mut dst[y * w..(y + 1) * w];

        for x in 1..w - 1 {
            let sum = (above[x + 1] as i32 - above[x - 1] as i32)
                + 2 * (row[x + 1] as i32 - row[x - 1] as i32)
                + (below[x + 1] as i32 - below[x - 1] as i32);
            out_row[x] = sum as i16;
        }
    }

    Ok(out.into())
}
