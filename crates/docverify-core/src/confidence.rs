//! Confidence tiers for AI-extracted values.
//!
//! Maps a raw extraction confidence in `[0, 1]` onto three review tiers that
//! drive overlay color, badge label, and how much attention a reviewer should
//! pay to the entity.
//!
//! # Thresholds
//!
//! - `c >= 0.90` → [`ConfidenceTier::High`]
//! - `0.75 <= c < 0.90` → [`ConfidenceTier::Medium`]
//! - `c < 0.75` → [`ConfidenceTier::Low`]
//!
//! Lower bounds are inclusive, so a boundary value lands in the higher tier.

use std::fmt;

/// Lower bound (inclusive) of the high tier.
pub const HIGH_THRESHOLD: f64 = 0.90;

/// Lower bound (inclusive) of the medium tier.
pub const MEDIUM_THRESHOLD: f64 = 0.75;

/// Coarse classification of an extraction confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

impl ConfidenceTier {
    /// Badge label shown next to an unverified annotation.
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Border/fill color of an annotation overlay in this tier.
    pub fn overlay_color(&self) -> Rgb {
        match self {
            Self::High => Rgb::EMERALD,
            Self::Medium => Rgb::AMBER,
            Self::Low => Rgb::RED,
        }
    }

    /// Color of the percentage badge on validation entity rows.
    pub fn badge_color(&self) -> Rgb {
        match self {
            Self::High => Rgb::GREEN,
            Self::Medium => Rgb::AMBER,
            Self::Low => Rgb::BRIGHT_RED,
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a confidence score into a tier.
///
/// Total over `f64`: values outside `[0, 1]` fall into the nearest tier and
/// `NaN` is treated as [`ConfidenceTier::Low`].
pub fn classify(confidence: f64) -> ConfidenceTier {
    if confidence >= HIGH_THRESHOLD {
        ConfidenceTier::High
    } else if confidence >= MEDIUM_THRESHOLD {
        ConfidenceTier::Medium
    } else {
        ConfidenceTier::Low
    }
}

/// Whole-number percentage used by badges and tooltips (`0.875` → `88`).
pub fn confidence_percent(confidence: f64) -> u8 {
    if !confidence.is_finite() {
        return 0;
    }
    (confidence * 100.0).round().clamp(0.0, 100.0) as u8
}

/// An opaque RGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `rgb(16, 185, 129)`, also used for verified overlays.
    pub const EMERALD: Rgb = Rgb::new(16, 185, 129);
    /// `#10b981`
    pub const GREEN: Rgb = Rgb::new(0x10, 0xb9, 0x81);
    /// `rgb(245, 158, 11)` / `#f59e0b`
    pub const AMBER: Rgb = Rgb::new(245, 158, 11);
    /// `rgb(220, 38, 38)`
    pub const RED: Rgb = Rgb::new(220, 38, 38);
    /// `#ef4444`
    pub const BRIGHT_RED: Rgb = Rgb::new(0xef, 0x44, 0x44);

    /// Lowercase hex notation, e.g. `#10b981`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        assert_eq!(classify(0.90), ConfidenceTier::High);
        assert_eq!(classify(0.8999), ConfidenceTier::Medium);
        assert_eq!(classify(0.75), ConfidenceTier::Medium);
        assert_eq!(classify(0.7499), ConfidenceTier::Low);
        assert_eq!(classify(0.0), ConfidenceTier::Low);
        assert_eq!(classify(1.0), ConfidenceTier::High);
    }

    #[test]
    fn nan_is_low() {
        assert_eq!(classify(f64::NAN), ConfidenceTier::Low);
    }

    #[test]
    fn tiers_are_ordered() {
        assert!(ConfidenceTier::Low < ConfidenceTier::Medium);
        assert!(ConfidenceTier::Medium < ConfidenceTier::High);
    }

    #[test]
    fn labels() {
        assert_eq!(classify(0.95).label(), "High");
        assert_eq!(classify(0.80).label(), "Medium");
        assert_eq!(classify(0.10).to_string(), "Low");
    }

    #[test]
    fn overlay_and_badge_palettes() {
        assert_eq!(ConfidenceTier::High.overlay_color().to_string(), "rgb(16, 185, 129)");
        assert_eq!(ConfidenceTier::Low.overlay_color().to_string(), "rgb(220, 38, 38)");
        assert_eq!(ConfidenceTier::High.badge_color().to_hex(), "#10b981");
        assert_eq!(ConfidenceTier::Medium.badge_color().to_hex(), "#f59e0b");
        assert_eq!(ConfidenceTier::Low.badge_color().to_hex(), "#ef4444");
    }

    #[test]
    fn percent_rounds_and_clamps() {
        assert_eq!(confidence_percent(0.875), 88);
        assert_eq!(confidence_percent(0.0), 0);
        assert_eq!(confidence_percent(1.0), 100);
        assert_eq!(confidence_percent(1.7), 100);
        assert_eq!(confidence_percent(-0.2), 0);
        assert_eq!(confidence_percent(f64::NAN), 0);
    }
}
