//! Element kind conversion functions

use super::{ElemKind, Image, ImageMut};
use crate::error::Result;

impl Image {
    /// Widen an 8-bit image to signed 16-bit, preserving values.
    ///
    /// Used as the matching input when the gradient prefilter is disabled,
    /// so that both prefiltered and raw inputs feed the cost builder with
    /// the same element kind.
    ///
    /// # Errors
    ///
    /// Returns `Error::KindMismatch` if the image is not U8.
    pub fn widen_to_s16(&self) -> Result<Image> {
        let src = self.as_u8()?;

        let mut out = ImageMut::new(self.width(), self.height(), ElemKind::S16)?;
        let dst = out.as_s16_mut()?;
        for (d, &s) in dst.iter_mut().zip(src.iter()) {
            *d = s as i16;
        }

        Ok(out.into())
    }
}
