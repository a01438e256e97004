//! Boundaries to the host: where images come from and where they go.
//!
//! The engine never decodes or encodes files itself. A host supplies decoded
//! pixels through an [`ImageSource`] and persists finished images through an
//! [`ImageSink`]. Both report failures as values so a bad file or a full disk
//! never takes the editing session down with it.
//!
//! [`MemorySource`] and [`MemorySink`] keep everything in memory and serve
//! headless hosts and tests.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::buffer::BufferError;
use crate::PixelBuffer;

/// Errors raised while loading an image from a source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The handle does not refer to any image.
    #[error("Image not found: {0}")]
    NotFound(String),

    /// The data exists but could not be decoded.
    #[error("Could not decode image: {0}")]
    Undecodable(String),

    /// Decoded samples do not form a valid buffer.
    #[error("Invalid image data: {0}")]
    InvalidBuffer(#[from] BufferError),
}

/// Errors raised while persisting an image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    /// The sink refused the image.
    #[error("Save rejected: {0}")]
    Rejected(String),

    /// Writing failed.
    #[error("I/O error while saving: {0}")]
    Io(String),
}

/// Build a buffer from decoded RGBA samples.
///
/// An empty sample vector means the source had nothing to decode (a detached
/// canvas buffer, say) and is reported as [`LoadError::Undecodable`]. Any
/// other mismatch is an [`LoadError::InvalidBuffer`].
pub fn buffer_from_samples(
    width: u32,
    height: u32,
    rgba: Vec<u8>,
) -> Result<PixelBuffer, LoadError> {
    if rgba.is_empty() {
        return Err(LoadError::Undecodable(format!(
            "no pixel data for {width}x{height} image"
        )));
    }
    Ok(PixelBuffer::new(width, height, rgba)?)
}

/// Supplies decoded images for opaque handles.
pub trait ImageSource {
    /// Whatever identifies an image to this source (a path, a URI, a key).
    type Handle: ?Sized;

    /// Load and decode the image behind `handle`.
    fn load(&mut self, handle: &Self::Handle) -> Result<PixelBuffer, LoadError>;
}

/// Persists finished images.
pub trait ImageSink {
    fn save(&mut self, image: &PixelBuffer, request: &SaveRequest)
        -> Result<SaveReceipt, SaveError>;
}

/// Suggested name and description for a saved image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub name: String,
    pub description: String,
}

impl SaveRequest {
    /// Description attached to every edited image by default.
    pub const DEFAULT_DESCRIPTION: &'static str = "Manipulated Image";

    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// `IMG_<millis>` with the default description.
    pub fn timestamped(unix_millis: u64) -> Self {
        Self::new(format!("IMG_{unix_millis}"), Self::DEFAULT_DESCRIPTION)
    }

    /// [`SaveRequest::timestamped`] using the system clock.
    ///
    /// Not available on `wasm32-unknown-unknown`, where hosts should pass the
    /// JS clock to `timestamped` instead.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Self::timestamped(millis)
    }
}

/// Where a sink put an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReceipt {
    pub location: String,
}

/// An [`ImageSource`] backed by a map of named RGBA buffers.
#[derive(Debug, Default)]
pub struct MemorySource {
    entries: HashMap<String, (u32, u32, Vec<u8>)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an already-valid buffer under `name`.
    pub fn insert(&mut self, name: impl Into<String>, image: PixelBuffer) {
        let (width, height) = image.dimensions();
        self.entries
            .insert(name.into(), (width, height, image.into_raw()));
    }

    /// Register raw RGBA samples under `name`; they are validated on load.
    pub fn insert_raw(&mut self, name: impl Into<String>, width: u32, height: u32, rgba: Vec<u8>) {
        self.entries.insert(name.into(), (width, height, rgba));
    }
}

impl ImageSource for MemorySource {
    type Handle = str;

    fn load(&mut self, handle: &str) -> Result<PixelBuffer, LoadError> {
        let (width, height, rgba) = self
            .entries
            .get(handle)
            .ok_or_else(|| LoadError::NotFound(handle.to_string()))?;
        buffer_from_samples(*width, *height, rgba.clone())
    }
}

/// An [`ImageSink`] that keeps saved images in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    saved: Vec<(SaveRequest, PixelBuffer)>,
    capacity: Option<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that rejects saves once it holds `capacity` images.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            saved: Vec::new(),
            capacity: Some(capacity),
        }
    }

    /// Everything saved so far, oldest first.
    pub fn saved(&self) -> &[(SaveRequest, PixelBuffer)] {
        &self.saved
    }
}

impl ImageSink for MemorySink {
    fn save(
        &mut self,
        image: &PixelBuffer,
        request: &SaveRequest,
    ) -> Result<SaveReceipt, SaveError> {
        if self.capacity.is_some_and(|cap| self.saved.len() >= cap) {
            return Err(SaveError::Rejected(format!(
                "sink full ({} images)",
                self.saved.len()
            )));
        }
        self.saved.push((request.clone(), image.clone()));
        Ok(SaveReceipt {
            location: format!("memory://{}", request.name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_round_trip() {
        let img = PixelBuffer::filled(3, 2, [1, 2, 3, 4]).unwrap();
        let mut source = MemorySource::new();
        source.insert("a", img.clone());

        assert_eq!(source.load("a").unwrap(), img);
    }

    #[test]
    fn test_memory_source_missing_handle() {
        let mut source = MemorySource::new();
        assert_eq!(
            source.load("nope"),
            Err(LoadError::NotFound("nope".to_string()))
        );
    }

    #[test]
    fn test_memory_source_invalid_data() {
        let mut source = MemorySource::new();
        source.insert_raw("bad", 2, 2, vec![0u8; 3]);

        let err = source.load("bad").unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidBuffer(BufferError::PixelDataMismatch {
                expected: 16,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_memory_source_empty_samples() {
        let mut source = MemorySource::new();
        source.insert_raw("detached", 4, 3, Vec::new());

        assert_eq!(
            source.load("detached"),
            Err(LoadError::Undecodable(
                "no pixel data for 4x3 image".to_string()
            ))
        );
    }

    #[test]
    fn test_buffer_from_samples() {
        let img = buffer_from_samples(1, 1, vec![9, 8, 7, 255]).unwrap();
        assert_eq!(img.pixel(0, 0), [9, 8, 7, 255]);

        assert!(matches!(
            buffer_from_samples(0, 0, Vec::new()),
            Err(LoadError::Undecodable(_))
        ));
        assert!(matches!(
            buffer_from_samples(0, 5, vec![0u8; 4]),
            Err(LoadError::InvalidBuffer(_))
        ));
    }

    #[test]
    fn test_timestamped_request() {
        let req = SaveRequest::timestamped(1_700_000_000_123);
        assert_eq!(req.name, "IMG_1700000000123");
        assert_eq!(req.description, "Manipulated Image");
    }

    #[test]
    fn test_now_request_has_prefix() {
        let req = SaveRequest::now();
        assert!(req.name.starts_with("IMG_"));
        assert!(req.name["IMG_".len()..].parse::<u64>().is_ok());
    }

    #[test]
    fn test_memory_sink_records_saves() {
        let img = PixelBuffer::filled(1, 1, [5, 5, 5, 255]).unwrap();
        let mut sink = MemorySink::new();
        let receipt = sink.save(&img, &SaveRequest::new("x", "y")).unwrap();

        assert_eq!(receipt.location, "memory://x");
        assert_eq!(sink.saved().len(), 1);
        assert_eq!(sink.saved()[0].1, img);
    }

    #[test]
    fn test_memory_sink_capacity() {
        let img = PixelBuffer::filled(1, 1, [5, 5, 5, 255]).unwrap();
        let mut sink = MemorySink::with_capacity(1);
        assert!(sink.save(&img, &SaveRequest::new("a", "")).is_ok());

        let err = sink.save(&img, &SaveRequest::new("b", "")).unwrap_err();
        assert!(matches!(err, SaveError::Rejected(_)));
        assert_eq!(sink.saved().len(), 1);
    }
}
