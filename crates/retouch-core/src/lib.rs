//! Retouch Core - raster image editing engine
//!
//! This crate provides the pixel operations behind Retouch (crop, resize,
//! color-matrix filters, box blur and vertical merge) plus the editing
//! session that sequences them over a working image.
//!
//! # Module Structure
//!
//! - `buffer` - RGBA pixel buffer all operations read and write
//! - `transform` - Crop by display selection, uniform resize
//! - `color` - 4x5 color matrix engine and named presets
//! - `blur` - Fixed-radius box blur
//! - `composite` - Vertical two-image merge
//! - `session` - Original/working/secondary state machine
//! - `io` - Image source and sink boundaries
//! - `config` - Session configuration
//!
//! All operations are synchronous and never modify their input.

pub mod blur;
pub mod buffer;
pub mod color;
pub mod composite;
pub mod config;
pub mod io;
pub mod luminance;
pub mod session;
pub mod transform;

pub use blur::box_blur;
pub use buffer::{BufferError, PixelBuffer};
pub use color::{apply_color_matrix, ColorMatrix, ColorPreset};
pub use composite::merge_vertical;
pub use config::EditorConfig;
pub use io::{
    buffer_from_samples, ImageSink, ImageSource, LoadError, MemorySink, MemorySource, SaveError,
    SaveReceipt, SaveRequest,
};
pub use session::{EditOperation, EditingSession, SessionError, SessionState, SharedSession};
pub use transform::{
    crop_region, crop_to_selection, resize, scaled_dimensions, CropScaling, DisplaySize, FilterType,
    SelectionRect, MAX_DIMENSION, MAX_PIXELS,
};
