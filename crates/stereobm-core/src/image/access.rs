//! Pixel access functions
//!
//! Low-level functions for getting and setting individual pixels and for
//! borrowing whole planes or rows as typed slices. Every accessor is
//! specialized per element kind; asking a plane for the wrong kind is a
//! checked error on the slice paths and a panic on the per-pixel paths, so
//! storage can never be silently misinterpreted.

use super::{ElemKind, Image, ImageMut, PlaneBuf};
use crate::error::{Error, Result};

macro_rules! plane_accessors {
    ($kind:ident, $ty:ty, $as_fn:ident, $as_mut_fn:ident, $row_fn:ident, $row_mut_fn:ident,
     $get_fn:ident, $get_unchecked_fn:ident, $set_fn:ident, $set_unchecked_fn:ident) => {
        impl Image {
            /// Borrow the whole plane as a typed slice.
            ///
            /// # Errors
            ///
            /// Returns `Error::KindMismatch` if the image holds a different
            /// element kind.
            #[inline]
            pub fn $as_fn(&self) -> Result<&[$ty]> {
                match &self.inner.buf {
                    PlaneBuf::$kind(v) => Ok(v),
                    other => Err(Error::KindMismatch {
                        expected: ElemKind::$kind,
                        actual: other.kind(),
                    }),
                }
            }

            /// Borrow one row as a typed slice.
            ///
            /// # Panics
            ///
            /// Panics if `y >= height` or the element kind does not match.
            #[inline]
            pub fn $row_fn(&self, y: u32) -> &[$ty] {
                let w = self.inner.width as usize;
                let start = (y as usize) * w;
                &self.$as_fn().unwrap()[start..start + w]
            }

            /// Get a pixel value at (x, y), or None if out of bounds.
            ///
            /// # Panics
            ///
            /// Panics if the element kind does not match.
            pub fn $get_fn(&self, x: u32, y: u32) -> Option<$ty> {
                if x >= self.width() || y >= self.height() {
                    return None;
                }
                Some(self.$get_unchecked_fn(x, y))
            }

            /// Get a pixel value without bounds checking.
            ///
            /// # Panics
            ///
            /// Panics if (x, y) is out of bounds or the element kind does
            /// not match.
            #[inline]
            pub fn $get_unchecked_fn(&self, x: u32, y: u32) -> $ty {
                let w = self.inner.width as usize;
                self.$as_fn().unwrap()[(y as usize) * w + (x as usize)]
            }
        }

        impl ImageMut {
            /// Borrow the whole plane as a typed slice.
            ///
            /// # Errors
            ///
            /// Returns `Error::KindMismatch` if the image holds a different
            /// element kind.
            #[inline]
            pub fn $as_fn(&self) -> Result<&[$ty]> {
                match &self.inner.buf {
                    PlaneBuf::$kind(v) => Ok(v),
                    other => Err(Error::KindMismatch {
                        expected: ElemKind::$kind,
                        actual: other.kind(),
                    }),
                }
            }

            /// Borrow the whole plane as a mutable typed slice.
            ///
            /// # Errors
            ///
            /// Returns `Error::KindMismatch` if the image holds a different
            /// element kind.
            #[inline]
            pub fn $as_mut_fn(&mut self) -> Result<&mut [$ty]> {
                match &mut self.inner.buf {
                    PlaneBuf::$kind(v) => Ok(v),
                    other => Err(Error::KindMismatch {
                        expected: ElemKind::$kind,
                        actual: other.kind(),
                    }),
                }
            }

            /// Borrow one row as a mutable typed slice.
            ///
            /// # Panics
            ///
            /// Panics if `y >= height` or the element kind does not match.
            #[inline]
            pub fn $row_mut_fn(&mut self, y: u32) -> &mut [$ty] {
                let w = self.inner.width as usize;
                let start = (y as usize) * w;
                &mut self.$as_mut_fn().unwrap()[start..start + w]
            }

            /// Get a pixel value at (x, y), or None if out of bounds.
            ///
            /// # Panics
            ///
            /// Panics if the element kind does not match.
            pub fn $get_fn(&self, x: u32, y: u32) -> Option<$ty> {
                if x >= self.width() || y >= self.height() {
                    return None;
                }
                Some(self.$get_unchecked_fn(x, y))
            }

            /// Get a pixel value without bounds checking.
            ///
            /// # Panics
            ///
            /// Panics if (x, y) is out of bounds or the element kind does
            /// not match.
            #[inline]
            pub fn $get_unchecked_fn(&self, x: u32, y: u32) -> $ty {
                let w = self.inner.width as usize;
                self.$as_fn().unwrap()[(y as usize) * w + (x as usize)]
            }

            /// Set a pixel value at (x, y).
            ///
            /// # Errors
            ///
            /// Returns `Error::IndexOutOfBounds` if the coordinates are out
            /// of bounds, `Error::KindMismatch` on the wrong element kind.
            pub fn $set_fn(&mut self, x: u32, y: u32, val: $ty) -> Result<()> {
                let width = self.width();
                let height = self.height();

                if x >= width {
                    return Err(Error::IndexOutOfBounds {
                        index: x as usize,
                        len: width as usize,
                    });
                }
                if y >= height {
                    return Err(Error::IndexOutOfBounds {
                        index: y as usize,
                        len: height as usize,
                    });
                }

                let w = width as usize;
                self.$as_mut_fn()?[(y as usize) * w + (x as usize)] = val;
                Ok(())
            }

            /// Set a pixel value without bounds checking.
            ///
            /// # Panics
            ///
            /// Panics if (x, y) is out of bounds or the element kind does
            /// not match.
            #[inline]
            pub fn $set_unchecked_fn(&mut self, x: u32, y: u32, val: $ty) {
                let w = self.inner.width as usize;
                self.$as_mut_fn().unwrap()[(y as usize) * w + (x as usize)] = val;
            }
        }
    };
}

plane_accessors!(
    U8, u8, as_u8, as_u8_mut, row_u8, row_u8_mut, get_u8, get_u8_unchecked, set_u8,
    set_u8_unchecked
);
plane_accessors!(
    S16, i16, as_s16, as_s16_mut, row_s16, row_s16_mut, get_s16, get_s16_unchecked, set_s16,
    set_s16_unchecked
);
plane_accessors!(
    U32, u32, as_u32, as_u32_mut, row_u32, row_u32_mut, get_u32, get_u32_unchecked, set_u32,
    set_u32_unchecked
);
