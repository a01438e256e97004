//! Editing session: the original/working/secondary image state machine.
//!
//! ## States
//!
//! - **Empty**: nothing loaded; every operation except `load_*` fails with
//!   [`SessionError::NoImageLoaded`]
//! - **Loaded**: `original` and `working` are present
//!
//! Each operation reads `working`, computes a new buffer and swaps it in.
//! Failures leave the session untouched. `original` is only written by
//! [`EditingSession::load_primary`]; [`EditingSession::reset`] copies it back
//! into `working`. `secondary` is loaded independently and only read by
//! [`EditingSession::merge`].

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blur::box_blur;
use crate::color::{apply_color_matrix, ColorMatrix, ColorPreset};
use crate::composite::merge_vertical;
use crate::config::EditorConfig;
use crate::io::{ImageSink, ImageSource, LoadError, SaveError, SaveReceipt, SaveRequest};
use crate::transform::{crop_to_selection, resize, DisplaySize, SelectionRect};
use crate::PixelBuffer;

/// Errors reported by session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The operation needs a working image and none is loaded.
    #[error("No image loaded")]
    NoImageLoaded,

    /// Merge needs a second image and none is loaded.
    #[error("No second image loaded")]
    NoSecondImage,

    /// Reset needs an original image and none is loaded.
    #[error("No original image to reset to")]
    NoOriginal,

    /// The image source failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The image sink failed.
    #[error(transparent)]
    Save(#[from] SaveError),
}

/// Whether a session has an image to edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Loaded,
}

/// One editing step, as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOperation {
    Crop {
        rect: SelectionRect,
        display: DisplaySize,
    },
    Resize {
        scale: f64,
    },
    Filter {
        preset: ColorPreset,
    },
    Brightness {
        delta: i32,
    },
    Blur {
        radius: u32,
    },
    Merge,
    Reset,
}

/// Holds the images of one editing run and applies operations to them.
#[derive(Debug, Clone, Default)]
pub struct EditingSession {
    config: EditorConfig,
    original: Option<PixelBuffer>,
    working: Option<PixelBuffer>,
    secondary: Option<PixelBuffer>,
}

impl EditingSession {
    /// Create an empty session with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session with the given configuration.
    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        if self.working.is_some() {
            SessionState::Loaded
        } else {
            SessionState::Empty
        }
    }

    /// The image as first loaded.
    pub fn original(&self) -> Option<&PixelBuffer> {
        self.original.as_ref()
    }

    /// The image with all edits so far applied.
    pub fn working(&self) -> Option<&PixelBuffer> {
        self.working.as_ref()
    }

    /// The image to merge below the working image.
    pub fn secondary(&self) -> Option<&PixelBuffer> {
        self.secondary.as_ref()
    }

    /// Start editing `image`, replacing any previous original and edits.
    #[tracing::instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn load_primary(&mut self, image: PixelBuffer) {
        self.original = Some(image.clone());
        self.working = Some(image);
        tracing::debug!("primary image loaded");
    }

    /// Set the image used by [`EditingSession::merge`].
    #[tracing::instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn load_secondary(&mut self, image: PixelBuffer) {
        self.secondary = Some(image);
        tracing::debug!("secondary image loaded");
    }

    /// Load the primary image from a source.
    ///
    /// On failure the session keeps its previous images.
    pub fn load_primary_from<S>(
        &mut self,
        source: &mut S,
        handle: &S::Handle,
    ) -> Result<(), SessionError>
    where
        S: ImageSource + ?Sized,
    {
        let image = source.load(handle).inspect_err(|err| {
            tracing::warn!(%err, "failed to load primary image");
        })?;
        self.load_primary(image);
        Ok(())
    }

    /// Load the secondary image from a source.
    pub fn load_secondary_from<S>(
        &mut self,
        source: &mut S,
        handle: &S::Handle,
    ) -> Result<(), SessionError>
    where
        S: ImageSource + ?Sized,
    {
        let image = source.load(handle).inspect_err(|err| {
            tracing::warn!(%err, "failed to load secondary image");
        })?;
        self.load_secondary(image);
        Ok(())
    }

    /// Crop to a selection made on a display surface.
    #[tracing::instrument(skip(self))]
    pub fn crop(&mut self, rect: &SelectionRect, view: DisplaySize) -> Result<(), SessionError> {
        self.replace_working("crop", |image, config| {
            crop_to_selection(image, rect, view, config.crop_scaling)
        })
    }

    /// Scale by a uniform factor using the configured filter.
    #[tracing::instrument(skip(self))]
    pub fn resize(&mut self, scale: f64) -> Result<(), SessionError> {
        self.replace_working("resize", |image, config| {
            resize(image, scale, config.resize_filter)
        })
    }

    /// Apply a named color filter.
    #[tracing::instrument(skip(self))]
    pub fn apply_filter(&mut self, preset: ColorPreset) -> Result<(), SessionError> {
        let matrix = preset.matrix();
        self.apply_matrix(&matrix)
    }

    /// Apply an arbitrary color matrix.
    pub fn apply_matrix(&mut self, matrix: &ColorMatrix) -> Result<(), SessionError> {
        self.replace_working("color_matrix", |image, _| apply_color_matrix(image, matrix))
    }

    /// Shift R, G and B by `delta`.
    pub fn adjust_brightness(&mut self, delta: i32) -> Result<(), SessionError> {
        self.apply_filter(ColorPreset::Brightness { delta })
    }

    /// Box blur with an explicit radius.
    #[tracing::instrument(skip(self))]
    pub fn blur(&mut self, radius: u32) -> Result<(), SessionError> {
        self.replace_working("blur", |image, _| box_blur(image, radius))
    }

    /// Box blur with the configured radius.
    pub fn blur_default(&mut self) -> Result<(), SessionError> {
        self.blur(self.config.blur_radius)
    }

    /// Stack the secondary image below the working image.
    #[tracing::instrument(skip(self))]
    pub fn merge(&mut self) -> Result<(), SessionError> {
        if self.working.is_none() {
            tracing::warn!("merge requested with no image loaded");
            return Err(SessionError::NoImageLoaded);
        }
        let Some(secondary) = self.secondary.take() else {
            tracing::warn!("merge requested with no second image loaded");
            return Err(SessionError::NoSecondImage);
        };
        let result = self.replace_working("merge", |image, _| merge_vertical(image, &secondary));
        self.secondary = Some(secondary);
        result
    }

    /// Discard all edits and restore the original image.
    #[tracing::instrument(skip(self))]
    pub fn reset(&mut self) -> Result<(), SessionError> {
        let Some(original) = self.original.as_ref() else {
            tracing::warn!("reset requested with no original image");
            return Err(SessionError::NoOriginal);
        };
        self.working = Some(original.clone());
        tracing::debug!("working image reset to original");
        Ok(())
    }

    /// Dispatch an [`EditOperation`].
    pub fn apply(&mut self, op: &EditOperation) -> Result<(), SessionError> {
        match op {
            EditOperation::Crop { rect, display } => self.crop(rect, *display),
            EditOperation::Resize { scale } => self.resize(*scale),
            EditOperation::Filter { preset } => self.apply_filter(*preset),
            EditOperation::Brightness { delta } => self.adjust_brightness(*delta),
            EditOperation::Blur { radius } => self.blur(*radius),
            EditOperation::Merge => self.merge(),
            EditOperation::Reset => self.reset(),
        }
    }

    /// Hand the working image to a sink.
    #[tracing::instrument(skip(self, sink))]
    pub fn save_to<K>(&self, sink: &mut K, request: &SaveRequest) -> Result<SaveReceipt, SessionError>
    where
        K: ImageSink + ?Sized,
    {
        let working = self.working.as_ref().ok_or_else(|| {
            tracing::warn!("save requested with no image loaded");
            SessionError::NoImageLoaded
        })?;
        let receipt = sink.save(working, request).inspect_err(|err| {
            tracing::warn!(%err, "failed to save image");
        })?;
        tracing::debug!(location = %receipt.location, "image saved");
        Ok(receipt)
    }

    /// Read `working`, compute its replacement and swap it in.
    fn replace_working<F>(&mut self, op: &'static str, f: F) -> Result<(), SessionError>
    where
        F: FnOnce(&PixelBuffer, &EditorConfig) -> PixelBuffer,
    {
        let Some(working) = self.working.as_ref() else {
            tracing::warn!(op, "operation requested with no image loaded");
            return Err(SessionError::NoImageLoaded);
        };
        let result = f(working, &self.config);
        tracing::debug!(
            op,
            from = ?working.dimensions(),
            to = ?result.dimensions(),
            "working image replaced"
        );
        self.working = Some(result);
        Ok(())
    }
}

/// An [`EditingSession`] that several threads can drive.
///
/// Each call holds the lock for the whole read-compute-replace sequence, so
/// operations from different threads never interleave.
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<EditingSession>>,
}

impl SharedSession {
    pub fn new(session: EditingSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Run `f` with exclusive access to the session.
    ///
    /// A panic in another holder does not lock the session out: operations
    /// are all-or-nothing, so the state left behind is still consistent.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut EditingSession) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn apply(&self, op: &EditOperation) -> Result<(), SessionError> {
        self.with_session(|session| session.apply(op))
    }

    /// A copy of the current working image.
    pub fn working_snapshot(&self) -> Option<PixelBuffer> {
        self.with_session(|session| session.working().cloned())
    }
}
