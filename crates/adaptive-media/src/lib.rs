//! Adaptive media selection
//!
//! Pure functions that turn a latency sample and a viewport width into a
//! quality tier, an image variant, or a stream profile. Every input has a
//! valid answer; bad input degrades to the lowest-bandwidth choice.

mod select;
mod types;

pub use select::{select_image_variant, select_quality, select_stream_profile};
pub use types::{ImageFormat, ImageVariant, QualityProfile, QualityTier};
