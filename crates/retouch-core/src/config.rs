//! Session configuration.

use serde::{Deserialize, Serialize};

use crate::transform::{CropScaling, FilterType};

/// Default radius of the blur effect.
pub const DEFAULT_BLUR_RADIUS: u32 = 5;

/// Default brightness change per brighten/darken step.
pub const DEFAULT_BRIGHTNESS_STEP: i32 = 30;

/// Tunables for an [`EditingSession`](crate::EditingSession).
///
/// Every field has a default, so hosts can deserialize a partial config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Radius used by `blur_default`
    pub blur_radius: u32,
    /// Resampling filter for resize
    pub resize_filter: FilterType,
    /// How crop selections are mapped from display to pixel space
    pub crop_scaling: CropScaling,
    /// Magnitude of one brighten/darken step
    pub brightness_step: i32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            blur_radius: DEFAULT_BLUR_RADIUS,
            resize_filter: FilterType::default(),
            crop_scaling: CropScaling::default(),
            brightness_step: DEFAULT_BRIGHTNESS_STEP,
        }
    }
}
