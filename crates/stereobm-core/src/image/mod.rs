//! The image container shared by every matcher pass
//!
//! An `Image` is a dense row-major 2-D plane tagged with an element kind.
//! The same container carries 8-bit camera frames, signed 16-bit gradient
//! and disparity planes, and unsigned 32-bit block-cost planes; the kind tag
//! keeps the accessors honest about which interpretation is in use.

mod access;
mod convert;

use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// Element kind of an image plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElemKind {
    /// Unsigned 8-bit (grayscale camera frame)
    U8,
    /// Signed 16-bit (gradient plane, disparity map)
    S16,
    /// Unsigned 32-bit (block-cost plane)
    U32,
}

impl ElemKind {
    /// Get the number of bits per element
    pub fn bits(self) -> u32 {
        match self {
            ElemKind::U8 => 8,
            ElemKind::S16 => 16,
            ElemKind::U32 => 32,
        }
    }

    /// Get the number of bytes per element
    pub fn bytes(self) -> usize {
        (self.bits() / 8) as usize
    }
}

impl fmt::Display for ElemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElemKind::U8 => write!(f, "u8"),
            ElemKind::S16 => write!(f, "s16"),
            ElemKind::U32 => write!(f, "u32"),
        }
    }
}

/// Color space tag
///
/// Carried on every image for callers that care; all matcher passes
/// ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorSpace {
    /// No color interpretation
    None,
    /// ITU-R BT.601 with 525-line sampling
    Bt601_525,
    /// ITU-R BT.601 with 625-line sampling
    Bt601_625,
    /// ITU-R BT.709
    #[default]
    Bt709,
}

/// Typed plane storage
///
/// One vector per element kind so that a pixel can never be reinterpreted
/// under the wrong width or signedness.
#[derive(Debug, Clone)]
enum PlaneBuf {
    U8(Vec<u8>),
    S16(Vec<i16>),
    U32(Vec<u32>),
}

impl PlaneBuf {
    fn zeroed(kind: ElemKind, len: usize) -> Self {
        match kind {
            ElemKind::U8 => PlaneBuf::U8(vec![0; len]),
            ElemKind::S16 => PlaneBuf::S16(vec![0; len]),
            ElemKind::U32 => PlaneBuf::U32(vec![0; len]),
        }
    }

    fn kind(&self) -> ElemKind {
        match self {
            PlaneBuf::U8(_) => ElemKind::U8,
            PlaneBuf::S16(_) => ElemKind::S16,
            PlaneBuf::U32(_) => ElemKind::U32,
        }
    }
}

/// Internal image data
#[derive(Debug)]
struct ImageData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Color space tag (ignored by the matcher)
    colorspace: ColorSpace,
    /// The pixel data, row-major, no padding, no stride
    buf: PlaneBuf,
}

/// Image - the shared immutable image handle
///
/// Uses reference counting via `Arc` for cheap cloning. Pixel storage is
/// dense row-major with no row padding, so an element at (x, y) lives at
/// index `y * width + x` of the typed plane.
///
/// # Examples
///
/// ```
/// use stereobm_core::{ElemKind, Image};
///
/// let img = Image::new(640, 480, ElemKind::U8).unwrap();
/// assert_eq!(img.width(), 640);
/// assert_eq!(img.height(), 480);
/// assert_eq!(img.kind(), ElemKind::U8);
/// ```
#[derive(Debug, Clone)]
pub struct Image {
    inner: Arc<ImageData>,
}

impl Image {
    /// Create a new image with the specified dimensions and element kind.
    ///
    /// The pixel data is initialized to zero.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new(width: u32, height: u32, kind: ElemKind) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let len = (width as usize) * (height as usize);
        let inner = ImageData {
            width,
            height,
            colorspace: ColorSpace::default(),
            buf: PlaneBuf::zeroed(kind, len),
        };

        Ok(Image {
            inner: Arc::new(inner),
        })
    }

    /// Get the image width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the image dimensions as (width, height)
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.inner.width, self.inner.height)
    }

    /// Get the element kind
    #[inline]
    pub fn kind(&self) -> ElemKind {
        self.inner.buf.kind()
    }

    /// Get the color space tag
    #[inline]
    pub fn colorspace(&self) -> ColorSpace {
        self.inner.colorspace
    }

    /// Get the number of strong references to this image
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Create a deep copy of this image
    ///
    /// Unlike `clone()` which shares data via `Arc`, this creates a
    /// completely independent copy.
    pub fn deep_clone(&self) -> Self {
        let inner = ImageData {
            width: self.inner.width,
            height: self.inner.height,
            colorspace: self.inner.colorspace,
            buf: self.inner.buf.clone(),
        };

        Image {
            inner: Arc::new(inner),
        }
    }

    /// Try to get mutable access to the image data
    ///
    /// This succeeds only if there is exactly one reference to the data.
    pub fn try_into_mut(self) -> std::result::Result<ImageMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(ImageMut { inner: data }),
            Err(arc) => Err(Image { inner: arc }),
        }
    }

    /// Create a mutable copy of this image
    ///
    /// This always creates a new copy that can be modified.
    pub fn to_mut(&self) -> ImageMut {
        let inner = ImageData {
            width: self.inner.width,
            height: self.inner.height,
            colorspace: self.inner.colorspace,
            buf: self.inner.buf.clone(),
        };

        ImageMut { inner }
    }
}

/// Mutable image
///
/// Exclusively owned; convertible back to a shared [`Image`] with `into()`.
#[derive(Debug)]
pub struct ImageMut {
    inner: ImageData,
}

impl ImageMut {
    /// Create a new zero-initialized mutable image.
    ///
    /// Shorthand for `Image::new(..)?.try_into_mut()`, which cannot fail on
    /// a freshly created image.
    pub fn new(width: u32, height: u32, kind: ElemKind) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let len = (width as usize) * (height as usize);
        Ok(ImageMut {
            inner: ImageData {
                width,
                height,
                colorspace: ColorSpace::default(),
                buf: PlaneBuf::zeroed(kind, len),
            },
        })
    }

    /// Get the image width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the image dimensions as (width, height)
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.inner.width, self.inner.height)
    }

    /// Get the element kind
    #[inline]
    pub fn kind(&self) -> ElemKind {
        self.inner.buf.kind()
    }

    /// Get the color space tag
    #[inline]
    pub fn colorspace(&self) -> ColorSpace {
        self.inner.colorspace
    }

    /// Set the color space tag
    pub fn set_colorspace(&mut self, colorspace: ColorSpace) {
        self.inner.colorspace = colorspace;
    }

    /// Set every pixel to `value`, truncated to the element kind.
    ///
    /// The value is cast per kind (`as u8` / `as i16` / `as u32`), so
    /// `fill(-1)` writes the all-ones bit pattern into every kind.
    pub fn fill(&mut self, value: i32) {
        match &mut self.inner.buf {
            PlaneBuf::U8(v) => v.fill(value as u8),
            PlaneBuf::S16(v) => v.fill(value as i16),
            PlaneBuf::U32(v) => v.fill(value as u32),
        }
    }

    /// Clear all pixels to zero
    pub fn clear(&mut self) {
        match &mut self.inner.buf {
            PlaneBuf::U8(v) => v.fill(0),
            PlaneBuf::S16(v) => v.fill(0),
            PlaneBuf::U32(v) => v.fill(0),
        }
    }
}

impl From<ImageMut> for Image {
    fn from(image_mut: ImageMut) -> Self {
        Image {
            inner: Arc::new(image_mut.inner),
        }
    }
}
