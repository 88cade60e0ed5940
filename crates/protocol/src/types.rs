use serde::{Deserialize, Serialize};

/// Replace negative and NaN readings with zero.
///
/// Hosts report raw window metrics; before layout (or without a window at
/// all) those can be missing or garbage, and every consumer expects `>= 0`.
#[inline]
pub fn non_negative(value: f64) -> f64 {
    if value.is_nan() || value < 0.0 {
        0.0
    } else {
        value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Visible rendering area of the host window, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportState {
    pub width: f64,
    pub height: f64,
}

impl ViewportState {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: non_negative(width),
            height: non_negative(height),
        }
    }

    /// The state used when no window exists (non-interactive render).
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Vertical scroll offset of the page, in CSS pixels from the top.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollState {
    pub scroll_y: f64,
}

impl ScrollState {
    pub fn new(scroll_y: f64) -> Self {
        Self {
            scroll_y: non_negative(scroll_y),
        }
    }
}

/// Translate/scale values applied to the floating avatar.
///
/// Always derived from a `(ViewportState, ScrollState)` pair; never stored or
/// mutated on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformParams {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl TransformParams {
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }

    pub fn translate(&self) -> Point {
        Point::new(self.translate_x, self.translate_y)
    }
}

/// Natural size of a loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_sanitizes_bad_readings() {
        let vp = ViewportState::new(-10.0, f64::NAN);
        assert_eq!(vp, ViewportState::zero());
    }

    #[test]
    fn scroll_state_clamps_overscroll() {
        // Elastic overscroll on some platforms reports negative offsets.
        assert_eq!(ScrollState::new(-42.0).scroll_y, 0.0);
        assert_eq!(ScrollState::new(12.5).scroll_y, 12.5);
    }

    #[test]
    fn transform_params_serialize_with_field_names() {
        let params = TransformParams {
            scale: 0.5,
            translate_x: -10.0,
            translate_y: -20.0,
        };
        let json = serde_json::to_string(&params).unwrap();
        assert!(json.contains("\"translate_x\":-10.0"));
        assert!(json.contains("\"scale\":0.5"));
    }
}
