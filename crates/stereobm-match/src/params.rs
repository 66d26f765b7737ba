//! Matcher parameters

use crate::{MatchError, MatchResult};

/// Parameters of the block matcher
///
/// `block_size` is the full window side (2·h + 1); `max_disparity` is the
/// largest candidate offset searched, so the cost volume holds
/// `max_disparity + 1` levels. `uniqueness_threshold` is the minimum margin
/// in percent by which the winning cost must beat every non-neighbouring
/// candidate; 0 disables the test and no pixel is ever marked unreliable.
#[derive(Debug, Clone)]
pub struct BlockMatcherParams {
    /// Full block side length; must be odd and at most min(width, height)
    pub block_size: u32,
    /// Largest candidate disparity, inclusive; must be >= 0
    pub max_disparity: i16,
    /// Uniqueness margin in percent; 0 disables the test
    pub uniqueness_threshold: u32,
    /// Apply the horizontal-gradient prefilter before matching
    pub prefilter: bool,
}

impl Default for BlockMatcherParams {
    fn default() -> Self {
        Self {
            block_size: 11,
            max_disparity: 64,
            uniqueness_threshold: 15,
            prefilter: true,
        }
    }
}

impl BlockMatcherParams {
    /// Get the block half-size h, where block_size = 2h + 1
    #[inline]
    pub fn half_block(&self) -> u32 {
        self.block_size / 2
    }

    /// Check the parameters against an image size.
    ///
    /// # Errors
    ///
    /// Returns `MatchError::InvalidParameters` when `block_size` is even or
    /// zero, larger than the image, or `max_disparity` is negative.
    pub fn validate(&self, width: u32, height: u32) -> MatchResult<()> {
        if self.block_size == 0 || self.block_size.is_multiple_of(2) {
            return Err(MatchError::InvalidParameters(format!(
                "block_size must be odd and >= 1, got {}",
                self.block_size
            )));
        }
        if self.block_size > width.min(height) {
            return Err(MatchError::InvalidParameters(format!(
                "block_size {} exceeds image size {}x{}",
                self.block_size, width, height
            )));
        }
        if self.max_disparity < 0 {
            return Err(MatchError::InvalidParameters(format!(
                "max_disparity must be >= 0, got {}",
                self.max_disparity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = BlockMatcherParams::default();
        assert_eq!(params.block_size, 11);
        assert_eq!(params.half_block(), 5);
        assert_eq!(params.max_disparity, 64);
        assert_eq!(params.uniqueness_threshold, 15);
        assert!(params.prefilter);
        assert!(params.validate(640, 480).is_ok());
    }

    #[test]
    fn test_rejects_even_or_zero_block() {
        let mut params = BlockMatcherParams::default();
        params.block_size = 0;
        assert!(params.validate(64, 64).is_err());
        params.block_size = 8;
        assert!(params.validate(64, 64).is_err());
    }

    #[test]
    fn test_rejects_oversized_block() {
        let params = BlockMatcherParams {
            block_size: 17,
            ..Default::default()
        };
        assert!(params.validate(16, 64).is_err());
        assert!(params.validate(64, 16).is_err());
        assert!(params.validate(17, 17).is_ok());
    }

    #[test]
    fn test_rejects_negative_disparity() {
        let params = BlockMatcherParams {
            max_disparity: -1,
            ..Default::default()
        };
        assert!(params.validate(64, 64).is_err());
    }

    #[test]
    fn test_minimal_block_accepted() {
        let params = BlockMatcherParams {
            block_size: 1,
            ..Default::default()
        };
        assert_eq!(params.half_block(), 0);
        assert!(params.validate(64, 64).is_ok());
    }
}
