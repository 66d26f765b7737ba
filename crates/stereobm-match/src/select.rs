//! Winner-take-all disparity selection
//!
//! Scans the block-cost volume per pixel, keeps the cheapest candidate,
//! vets it with the uniqueness test and refines it by fitting a parabola
//! through the three costs around the winner.

use crate::cost::CostVolume;
use crate::params::BlockMatcherParams;
use crate::{MatchError, MatchResult};
use stereobm_core::{ElemKind, ImageMut};

/// Sentinel stored for pixels whose match failed the uniqueness test
pub const UNRELIABLE: i16 = -1;

/// Pick the disparity of one pixel, or None when the match is not unique.
///
/// `d_limit` is inclusive. Ties break toward the smaller disparity because
/// the forward scan only replaces the minimum on a strictly cheaper cost.
fn choose(blocks: &CostVolume<u32>, x: u32, y: u32, d_limit: u32, uniqueness: u32) -> Option<i16> {
    let mut best = 0u32;
    let mut min_cost = blocks.at(0, x, y);
    for d in 1..=d_limit {
        let c = blocks.at(d, x, y);
        if c < min_cost {
            min_cost = c;
            best = d;
        }
    }

    if uniqueness > 0 {
        let threshold = min_cost as f64 * (1.0 + uniqueness as f64 / 100.0);
        for d in 0..=d_limit {
            if d.abs_diff(best) > 1 && (blocks.at(d, x, y) as f64) < threshold {
                return None;
            }
        }
    }

    // Parabolic refinement needs both neighbouring costs
    if best > 0 && best < d_limit {
        let prev = blocks.at(best - 1, x, y) as f64;
        let center = min_cost as f64;
        let next = blocks.at(best + 1, x, y) as f64;
        let denom = prev - 2.0 * center + next;
        if denom != 0.0 {
            let refined = best as f64 - 0.5 * (next - prev) / denom;
            return Some(refined.round() as i16);
        }
    }

    Some(best as i16)
}

/// Select the disparity of every pixel of the valid region.
///
/// The valid region is h <= y < H-h, max_disparity <= x < W-h; pixels with
/// x < h are additionally skipped since their window would cross the left
/// edge. Within it, each candidate range is clipped per pixel to
/// `min(max_disparity, x - h)` so the matched window never reaches outside
/// the right image. Skipped pixels keep whatever value `out` already holds.
///
/// # Errors
///
/// Returns `MatchError::InvalidParameters` when `out` is not an S16 plane
/// of the volume's size.
pub fn select_disparities(
    blocks: &CostVolume<u32>,
    params: &BlockMatcherParams,
    out: &mut ImageMut,
) -> MatchResult<()> {
    if out.kind() != ElemKind::S16 {
        return Err(MatchError::InvalidParameters(format!(
            "disparity output must be s16, got {}",
            out.kind()
        )));
    }
    if out.dimensions() != (blocks.width(), blocks.height()) {
        return Err(MatchError::InvalidParameters(format!(
            "disparity output is {}x{}, cost volume is {}x{}",
            out.width(),
            out.height(),
            blocks.width(),
            blocks.height()
        )));
    }

    let w = blocks.width();
    let h = blocks.height();
    let half = params.half_block();
    let d_max = params.max_disparity.max(0) as u32;
    let uniqueness = params.uniqueness_threshold;

    if w <= half || h <= half {
        return Ok(());
    }

    for y in half..(h - half) {
        for x in d_max..(w - half) {
            if x < half {
                continue;
            }
            let d_limit = d_max.min(x - half);
            let disp = choose(blocks, x, y, d_limit, uniqueness).unwrap_or(UNRELIABLE);
            out.set_s16(x, y, disp)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(block_size: u32, max_disparity: i16, uniqueness_threshold: u32) -> BlockMatcherParams {
        BlockMatcherParams {
            block_size,
            max_disparity,
            uniqueness_threshold,
            prefilter: true,
        }
    }

    /// Volume whose costs at every pixel follow `f(d)`
    fn volume_from_profile(levels: u32, w: u32, h: u32, f: impl Fn(u32) -> u32) -> CostVolume<u32> {
        let mut v = CostVolume::new(levels, w, h);
        for d in 0..levels {
            let c = f(d);
            for y in 0..h {
                for x in 0..w {
                    v.set(d, x, y, c);
                }
            }
        }
        v
    }

    #[test]
    fn test_winner_take_all_minimum() {
        let v = volume_from_profile(9, 20, 9, |d| 500 + 100 * (d as i32 - 6).unsigned_abs());
        let mut out = ImageMut::new(20, 9, ElemKind::S16).unwrap();

        select_disparities(&v, &params(5, 8, 0), &mut out).unwrap();

        // Symmetric profile around d = 6: parabola correction is zero
        assert_eq!(out.get_s16(10, 4), Some(6));
    }

    #[test]
    fn test_ties_break_low() {
        let v = volume_from_profile(5, 16, 7, |_| 42);
        let mut out = ImageMut::new(16, 7, ElemKind::S16).unwrap();

        select_disparities(&v, &params(3, 4, 0), &mut out).unwrap();

        // All candidates cost the same; the forward scan keeps d = 0
        assert_eq!(out.get_s16(8, 3), Some(0));
    }

    #[test]
    fn test_subpixel_parabola() {
        // (prev, center, next) = (100, 80, 110) around best = 5:
        // 5 - 0.5 * (110 - 100) / (100 - 160 + 110) = 4.9, rounded to 5
        let v = volume_from_profile(9, 24, 9, |d| match d {
            4 => 100,
            5 => 80,
            6 => 110,
            _ => 400,
        });
        let mut out = ImageMut::new(24, 9, ElemKind::S16).unwrap();

        select_disparities(&v, &params(5, 8, 0), &mut out).unwrap();
        assert_eq!(out.get_s16(12, 4), Some(5));
    }

    #[test]
    fn test_subpixel_pulls_to_neighbour() {
        // Heavily skewed parabola: 7 - 0.5 * (20 - 300) / (300 - 40 + 20)
        // = 7.5, rounding away from the integer winner
        let v = volume_from_profile(11, 28, 9, |d| match d {
            6 => 300,
            7 => 20,
            8 => 20,
            _ => 500,
        });
        let mut out = ImageMut::new(28, 9, ElemKind::S16).unwrap();

        select_disparities(&v, &params(5, 10, 0), &mut out).unwrap();
        assert_eq!(out.get_s16(14, 4), Some(8));
    }

    #[test]
    fn test_no_refinement_at_range_edges() {
        // Winner sits on the end of the candidate range: the parabola has
        // no outer neighbour and the integer winner is kept
        let v = volume_from_profile(7, 24, 9, |d| match d {
            4 => 90,
            5 => 80,
            6 => 70,
            _ => 500,
        });
        let mut out = ImageMut::new(24, 9, ElemKind::S16).unwrap();

        select_disparities(&v, &params(5, 6, 0), &mut out).unwrap();
        assert_eq!(out.get_s16(12, 4), Some(6));

        // Same at the low end
        let v = volume_from_profile(7, 24, 9, |d| 70 + d * 10);
        select_disparities(&v, &params(5, 6, 0), &mut out).unwrap();
        assert_eq!(out.get_s16(12, 4), Some(0));
    }

    #[test]
    fn test_uniqueness_marks_unreliable() {
        // Two distant near-minima: 100 at d = 2 and 104 at d = 7
        let v = volume_from_profile(9, 24, 9, |d| match d {
            2 => 100,
            7 => 104,
            _ => 300,
        });
        let mut out = ImageMut::new(24, 9, ElemKind::S16).unwrap();

        // 104 < 100 * 1.15: not unique
        select_disparities(&v, &params(5, 8, 15), &mut out).unwrap();
        assert_eq!(out.get_s16(12, 4), Some(UNRELIABLE));

        // threshold 0 disables the test
        select_disparities(&v, &params(5, 8, 0), &mut out).unwrap();
        assert_eq!(out.get_s16(12, 4), Some(2));

        // a 3% margin accepts the winner
        select_disparities(&v, &params(5, 8, 3), &mut out).unwrap();
        assert_eq!(out.get_s16(12, 4), Some(2));
    }

    #[test]
    fn test_uniqueness_ignores_adjacent_candidates() {
        // The parabola neighbours may be arbitrarily close without
        // tripping the test
        let v = volume_from_profile(9, 24, 9, |d| match d {
            4 => 101,
            5 => 100,
            6 => 102,
            _ => 300,
        });
        let mut out = ImageMut::new(24, 9, ElemKind::S16).unwrap();

        select_disparities(&v, &params(5, 8, 15), &mut out).unwrap();
        assert_ne!(out.get_s16(12, 4), Some(UNRELIABLE));
    }

    #[test]
    fn test_d_limit_clipped_near_left_border() {
        // Costs decrease with d, so an unclipped scan would pick d_max;
        // inside the band max_disparity <= x < max_disparity + h the limit
        // is x - h instead
        let v = volume_from_profile(9, 24, 9, |d| 100 - d);
        let mut out = ImageMut::new(24, 9, ElemKind::S16).unwrap();

        select_disparities(&v, &params(5, 8, 0), &mut out).unwrap();

        assert_eq!(out.get_s16(8, 4), Some(6));
        assert_eq!(out.get_s16(9, 4), Some(7));
        // Far enough right the full range is searched
        assert_eq!(out.get_s16(20, 4), Some(8));
    }

    #[test]
    fn test_left_of_window_skipped_when_disparity_range_small() {
        // max_disparity 0 admits x >= 0, but x < h still cannot host a
        // window; those pixels keep their previous value
        let v = volume_from_profile(1, 16, 9, |_| 5);
        let mut out = ImageMut::new(16, 9, ElemKind::S16).unwrap();
        out.set_s16(1, 4, 99).unwrap();

        select_disparities(&v, &params(5, 0, 0), &mut out).unwrap();

        assert_eq!(out.get_s16(1, 4), Some(99));
        assert_eq!(out.get_s16(5, 4), Some(0));
    }

    #[test]
    fn test_region_outside_selection_untouched() {
        let v = volume_from_profile(5, 16, 9, |d| 10 + d);
        let mut out = ImageMut::new(16, 9, ElemKind::S16).unwrap();
        out.set_s16(0, 0, 99).unwrap();
        out.set_s16(15, 8, 99).unwrap();

        select_disparities(&v, &params(5, 4, 0), &mut out).unwrap();

        assert_eq!(out.get_s16(0, 0), Some(99));
        assert_eq!(out.get_s16(15, 8), Some(99));
    }

    #[test]
    fn test_rejects_wrong_output() {
        let v = volume_from_profile(5, 16, 9, |_| 1);
        let mut wrong_kind = ImageMut::new(16, 9, ElemKind::U8).unwrap();
        assert!(select_disparities(&v, &params(5, 4, 0), &mut wrong_kind).is_err());

        let mut wrong_size = ImageMut::new(16, 8, ElemKind::S16).unwrap();
        assert!(select_disparities(&v, &params(5, 4, 0), &mut wrong_size).is_err());
    }
}
