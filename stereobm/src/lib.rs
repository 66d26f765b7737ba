//! stereobm - Block-matching stereo disparity for Rust
//!
//! Computes a dense disparity map from a rectified stereo image pair by
//! block matching over a horizontal-gradient cost volume, with
//! winner-take-all selection, a uniqueness test, and parabolic sub-pixel
//! refinement.
//!
//! # Overview
//!
//! The pipeline is a straight-line sequence of passes:
//!
//! - Sobel-X prefilter of both frames
//! - Per-pixel absolute-difference cost volume
//! - Running-window aggregation into block costs
//! - Per-pixel disparity selection
//! - Optional interpolation of unreliable pixels
//!
//! # Example
//!
//! ```
//! use stereobm::{BlockMatcherParams, ElemKind, Image, ImageMut, compute_disparity_map};
//!
//! let left = Image::new(64, 48, ElemKind::U8).unwrap();
//! let right = Image::new(64, 48, ElemKind::U8).unwrap();
//! let mut disparity = ImageMut::new(64, 48, ElemKind::S16).unwrap();
//!
//! let params = BlockMatcherParams::default();
//! compute_disparity_map(&left, &right, &mut disparity, &params).unwrap();
//! ```

// Re-export core types
pub use stereobm_core::*;

// Re-export the matcher surface
pub use stereobm_match::{
    BlockMatcherParams, MatchError, MatchResult, UNRELIABLE, compute_disparity_map,
    interpolate_unreliable, sobel_x,
};
