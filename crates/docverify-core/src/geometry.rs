//! Mapping from document-native coordinates to render-space pixels.
//!
//! Bounding boxes are stored in the page's intrinsic units, independent of
//! zoom. Rendering multiplies every component by the render scale; the stored
//! box is never touched, so re-rendering at another scale is lossless.

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// Scale at which the reviewer renders a page unless configured otherwise.
pub const DEFAULT_RENDER_SCALE: f64 = 1.5;

/// Rectangle in document-native units (same units as the page's intrinsic size).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check that every component is finite and the extent is non-negative.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(GeometryError::NonFinite(*self));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(GeometryError::NegativeExtent(*self));
        }
        Ok(())
    }
}

/// Positive, finite multiplier from native units to pixels.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct RenderScale(f64);

impl RenderScale {
    pub fn new(scale: f64) -> Result<Self, GeometryError> {
        if scale.is_finite() && scale > 0.0 {
            Ok(Self(scale))
        } else {
            Err(GeometryError::InvalidScale(scale))
        }
    }

    pub fn get(&self) -> f64 {
        self.0
    }
}

impl Default for RenderScale {
    fn default() -> Self {
        Self(DEFAULT_RENDER_SCALE)
    }
}

/// Rectangle in render-space pixels, positioned relative to the page's top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Map a native bounding box into render space.
pub fn map_to_render(bbox: &BoundingBox, scale: RenderScale) -> RenderRect {
    let s = scale.get();
    RenderRect {
        left: bbox.x * s,
        top: bbox.y * s,
        width: bbox.width * s,
        height: bbox.height * s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn unit_scale_is_identity() {
        let bbox = BoundingBox::new(120.0, 245.0, 350.0, 25.0);
        let rect = map_to_render(&bbox, RenderScale::new(1.0).unwrap());
        assert_eq!(rect.left, bbox.x);
        assert_eq!(rect.top, bbox.y);
        assert_eq!(rect.width, bbox.width);
        assert_eq!(rect.height, bbox.height);
    }

    #[test]
    fn default_scale() {
        let bbox = BoundingBox::new(120.0, 245.0, 350.0, 25.0);
        let rect = map_to_render(&bbox, RenderScale::default());
        assert_eq!(rect.left, 180.0);
        assert_eq!(rect.top, 367.5);
        assert_eq!(rect.width, 525.0);
        assert_eq!(rect.height, 37.5);
    }

    #[test]
    fn rejects_non_positive_scale() {
        assert!(RenderScale::new(0.0).is_err());
        assert!(RenderScale::new(-1.5).is_err());
        assert!(RenderScale::new(f64::NAN).is_err());
        assert!(RenderScale::new(f64::INFINITY).is_err());
    }

    #[test]
    fn mapping_leaves_box_untouched() {
        let bbox = BoundingBox::new(10.0, 20.0, 30.0, 40.0);
        let _ = map_to_render(&bbox, RenderScale::new(3.0).unwrap());
        let _ = map_to_render(&bbox, RenderScale::new(0.5).unwrap());
        assert_eq!(bbox, BoundingBox::new(10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn validate_rejects_bad_boxes() {
        assert!(BoundingBox::new(0.0, 0.0, 1.0, 1.0).validate().is_ok());
        assert!(matches!(
            BoundingBox::new(0.0, 0.0, -1.0, 1.0).validate(),
            Err(GeometryError::NegativeExtent(_))
        ));
        assert!(matches!(
            BoundingBox::new(f64::NAN, 0.0, 1.0, 1.0).validate(),
            Err(GeometryError::NonFinite(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_mapping_is_linear(
            x in 0.0..2000.0f64,
            y in 0.0..2000.0f64,
            w in 0.0..1000.0f64,
            h in 0.0..1000.0f64,
            s in 0.01..10.0f64,
        ) {
            let bbox = BoundingBox::new(x, y, w, h);
            let rect = map_to_render(&bbox, RenderScale::new(s).unwrap());
            prop_assert_eq!(rect.width, w * s);
            prop_assert_eq!(rect.height, h * s);
            prop_assert_eq!(rect.left, x * s);
            prop_assert_eq!(rect.top, y * s);
        }
    }
}
