//! Quality and variant selection

use crate::types::{ImageFormat, ImageVariant, QualityProfile, QualityTier};
use tracing::debug;

const FAST_LATENCY_MS: f64 = 500.0;
const SLOW_LATENCY_MS: f64 = 1500.0;

/// Widths the image backend can produce, ascending
const WIDTH_STEPS: [u32; 6] = [320, 640, 768, 1024, 1280, 1920];

const PREFERRED_FORMAT: ImageFormat = ImageFormat::Webp;

/// Pick a quality tier from one latency sample.
///
/// A concrete override wins. Missing, negative or non-finite samples are
/// treated as a slow network.
pub fn select_quality(measured_latency_ms: Option<f64>, user_override: QualityTier) -> QualityTier {
    if user_override != QualityTier::Auto {
        return user_override;
    }

    let latency = match measured_latency_ms {
        Some(ms) if ms.is_finite() && ms >= 0.0 => ms,
        other => {
            debug!(sample = ?other, "Unusable latency sample, using low quality");
            return QualityTier::Low;
        }
    };

    if latency < FAST_LATENCY_MS {
        QualityTier::High
    } else if latency < SLOW_LATENCY_MS {
        QualityTier::Medium
    } else {
        QualityTier::Low
    }
}

/// Map a viewport width and tier to an image request.
///
/// `Auto` and a missing or zero viewport fall back to the smallest,
/// lowest-quality variant.
pub fn select_image_variant(viewport_width: Option<u32>, tier: QualityTier) -> ImageVariant {
    let lowest = ImageVariant {
        width: WIDTH_STEPS[0],
        quality: encoder_quality(QualityTier::Low),
        format: PREFERRED_FORMAT,
    };

    let viewport = match viewport_width {
        Some(w) if w > 0 => w,
        _ => return lowest,
    };

    let (scale, quality) = match tier {
        QualityTier::Low => (0.5, encoder_quality(QualityTier::Low)),
        QualityTier::Medium => (0.75, encoder_quality(QualityTier::Medium)),
        QualityTier::High => (1.0, encoder_quality(QualityTier::High)),
        QualityTier::Auto => return lowest,
    };

    let wanted = (f64::from(viewport) * scale).ceil() as u32;
    let width = WIDTH_STEPS
        .iter()
        .copied()
        .find(|&step| step >= wanted)
        .unwrap_or(WIDTH_STEPS[WIDTH_STEPS.len() - 1]);

    ImageVariant {
        width,
        quality,
        format: PREFERRED_FORMAT,
    }
}

fn encoder_quality(tier: QualityTier) -> u8 {
    match tier {
        QualityTier::High => 85,
        QualityTier::Medium => 75,
        QualityTier::Low | QualityTier::Auto => 60,
    }
}

/// Choose a stream rendition from the catalog.
///
/// Prefers the highest-bitrate profile of the requested tier, then the best
/// profile of a lower tier, then the lowest bitrate on offer. `Auto` is
/// resolved as `Low`.
pub fn select_stream_profile(
    profiles: &[QualityProfile],
    tier: QualityTier,
) -> Option<&QualityProfile> {
    let target = tier.rank().unwrap_or(0);

    profiles
        .iter()
        .filter_map(|p| p.quality.rank().map(|rank| (rank, p)))
        .filter(|(rank, _)| *rank <= target)
        .max_by_key(|(rank, p)| (*rank, p.bitrate_kbps))
        .map(|(_, p)| p)
        .or_else(|| profiles.iter().min_by_key(|p| p.bitrate_kbps))
}
