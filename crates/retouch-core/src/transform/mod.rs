//! Geometry operations: cropping and scaling.
//!
//! Both operations read a [`PixelBuffer`](crate::PixelBuffer) and return a new
//! one; the input is never modified.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, x grows right, y grows down
//! - Crop selections arrive in *display* coordinates (the surface the image was
//!   shown on) and are mapped into pixel space before cropping
//! - Scale factors are uniform: the same factor applies to both axes

mod crop;
mod resize;

pub use crop::{crop_region, crop_to_selection, CropScaling, DisplaySize, SelectionRect};
pub use resize::{resize, scaled_dimensions, FilterType, MAX_DIMENSION, MAX_PIXELS};
