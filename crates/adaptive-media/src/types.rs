//! Media selection types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete quality bucket controlling bitrate and resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Low,
    Medium,
    High,
    /// Decide from measured network conditions
    #[default]
    Auto,
}

impl QualityTier {
    /// Lenient parse; anything unrecognised means `Auto`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => QualityTier::Low,
            "medium" => QualityTier::Medium,
            "high" => QualityTier::High,
            _ => QualityTier::Auto,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Low => "low",
            QualityTier::Medium => "medium",
            QualityTier::High => "high",
            QualityTier::Auto => "auto",
        }
    }

    /// Ordering among concrete tiers; `Auto` has none
    pub(crate) fn rank(&self) -> Option<u8> {
        match self {
            QualityTier::Low => Some(0),
            QualityTier::Medium => Some(1),
            QualityTier::High => Some(2),
            QualityTier::Auto => None,
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoded image format requested from the media backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Webp,
    Avif,
    Jpeg,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Webp => "image/webp",
            ImageFormat::Avif => "image/avif",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }
}

/// The concrete image request for a viewport and tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageVariant {
    /// Requested pixel width
    pub width: u32,
    /// Encoder quality, 0-100
    pub quality: u8,
    pub format: ImageFormat,
}

/// A stream rendition offered by the media catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityProfile {
    pub quality: QualityTier,
    pub bitrate_kbps: u32,
    /// (width, height)
    pub resolution: (u32, u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tier() {
        assert_eq!(QualityTier::parse("low"), QualityTier::Low);
        assert_eq!(QualityTier::parse(" Medium"), QualityTier::Medium);
        assert_eq!(QualityTier::parse("HIGH"), QualityTier::High);
        assert_eq!(QualityTier::parse("auto"), QualityTier::Auto);
        assert_eq!(QualityTier::parse("ultra"), QualityTier::Auto);
        assert_eq!(QualityTier::parse(""), QualityTier::Auto);
    }

    #[test]
    fn test_tier_display_roundtrips_parse() {
        for tier in [
            QualityTier::Low,
            QualityTier::Medium,
            QualityTier::High,
            QualityTier::Auto,
        ] {
            assert_eq!(QualityTier::parse(&tier.to_string()), tier);
        }
    }

    #[test]
    fn test_variant_serialization() {
        let variant = ImageVariant {
            width: 640,
            quality: 75,
            format: ImageFormat::Webp,
        };

        let json = serde_json::to_string(&variant).unwrap();
        assert_eq!(json, r#"{"width":640,"quality":75,"format":"webp"}"#);
    }

    #[test]
    fn test_profile_deserialization() {
        let json = r#"{"quality":"high","bitrate_kbps":4500,"resolution":[1920,1080]}"#;
        let profile: QualityProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.quality, QualityTier::High);
        assert_eq!(profile.resolution, (1920, 1080));
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(ImageFormat::Webp.mime_type(), "image/webp");
    }
}
