//! The block-matching pipeline
//!
//! `compute_disparity_map` runs the passes in sequence over fixed-shape
//! buffers: prefilter both frames, build the per-pixel cost volume,
//! aggregate it into block costs, then select a disparity per pixel. The
//! engine is single-threaded and synchronous; it runs to completion or
//! returns an error without touching the output.

use crate::aggregate::aggregate_block_costs;
use crate::cost::build_pixel_costs;
use crate::gradient::sobel_x;
use crate::params::BlockMatcherParams;
use crate::select::select_disparities;
use crate::{MatchError, MatchResult};
use stereobm_core::{ElemKind, Image, ImageMut};

/// Check the image contract before any allocation.
fn validate_inputs(left: &Image, right: &Image, out: &ImageMut) -> MatchResult<()> {
    if left.dimensions() != right.dimensions() {
        return Err(MatchError::InvalidParameters(format!(
            "left image is {}x{}, right image is {}x{}",
            left.width(),
            left.height(),
            right.width(),
            right.height()
        )));
    }
    if left.dimensions() != out.dimensions() {
        return Err(MatchError::InvalidParameters(format!(
            "input images are {}x{}, output is {}x{}",
            left.width(),
            left.height(),
            out.width(),
            out.height()
        )));
    }
    if left.kind() != ElemKind::U8 || right.kind() != ElemKind::U8 {
        return Err(MatchError::InvalidParameters(format!(
            "input images must be u8, got {} and {}",
            left.kind(),
            right.kind()
        )));
    }
    if out.kind() != ElemKind::S16 {
        return Err(MatchError::InvalidParameters(format!(
            "output image must be s16, got {}",
            out.kind()
        )));
    }
    Ok(())
}

/// Compute a dense disparity map from a rectified stereo pair.
///
/// For each pixel of the left frame, finds the horizontal offset at which
/// the best-matching block is found in the right frame and stores it in
/// `out` as S16. Pixels rejected by the uniqueness test hold
/// [`UNRELIABLE`](crate::UNRELIABLE); pixels outside the valid region hold
/// 0. Chain [`interpolate_unreliable`](crate::interpolate_unreliable) to
/// fill the rejected pixels afterwards.
///
/// The per-pixel cost volume is released as soon as the block costs are
/// built, so the peak footprint is both volumes together only during
/// aggregation.
///
/// # Errors
///
/// Returns `MatchError::InvalidParameters` when the three images disagree
/// in size, the inputs are not U8, the output is not S16, or the
/// parameters fail [`BlockMatcherParams::validate`]. Nothing is allocated
/// and the output is untouched in that case.
pub fn compute_disparity_map(
    left: &Image,
    right: &Image,
    out: &mut ImageMut,
    params: &BlockMatcherParams,
) -> MatchResult<()> {
    validate_inputs(left, right, out)?;
    params.validate(left.width(), left.height())?;

    let (left_grad, right_grad) = if params.prefilter {
        (sobel_x(left)?, sobel_x(right)?)
    } else {
        (left.widen_to_s16()?, right.widen_to_s16()?)
    };

    let pixel_costs = build_pixel_costs(&left_grad, &right_grad, params.max_disparity)?;
    let block_costs = aggregate_block_costs(&pixel_costs, params.half_block());
    drop(pixel_costs);

    out.clear();
    select_disparities(&block_costs, params, out)
}
