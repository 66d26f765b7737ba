//! stereobm-core - Core data structures for the stereobm block-matching library
//!
//! This crate provides the tagged image container shared by every pass of
//! the stereo matcher, plus the common error type. Pixel storage is dense
//! row-major with an explicit element kind (U8 / S16 / U32) so that the
//! per-kind accessors cannot silently misinterpret a plane.

mod error;
pub mod image;

pub use error::{Error, Result};
pub use image::{ColorSpace, ElemKind, Image, ImageMut};
