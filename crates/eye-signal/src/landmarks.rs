//! Eye landmark geometry
//!
//! The landmark collaborator hands over four points of the left eye. The raw
//! ratio sample is the vertical opening over the horizontal width, scaled by
//! 100 and truncated to a whole number.

use crate::SignalError;
use serde::{Deserialize, Serialize};

/// Face-mesh index of the upper eyelid point
pub const LEFT_EYE_UPPER: usize = 159;
/// Face-mesh index of the lower eyelid point
pub const LEFT_EYE_LOWER: usize = 23;
/// Face-mesh index of the outer eye corner
pub const LEFT_EYE_OUTER: usize = 130;
/// Face-mesh index of the inner eye corner
pub const LEFT_EYE_INNER: usize = 243;

/// Image-space point (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// The four eye landmarks used for the openness ratio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeLandmarks {
    pub upper: Point,
    pub lower: Point,
    pub outer: Point,
    pub inner: Point,
}

impl EyeLandmarks {
    pub fn distances(&self) -> EyeDistances {
        EyeDistances {
            vertical: self.upper.distance(&self.lower),
            horizontal: self.outer.distance(&self.inner),
        }
    }
}

/// Vertical and horizontal eye extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeDistances {
    pub vertical: f64,
    pub horizontal: f64,
}

impl EyeDistances {
    pub fn new(vertical: f64, horizontal: f64) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }

    /// Raw ratio sample: `trunc(vertical / horizontal * 100)`
    pub fn ratio(&self) -> Result<f64, SignalError> {
        if !self.vertical.is_finite() {
            return Err(SignalError::NonFinite {
                field: "vertical",
                value: self.vertical,
            });
        }
        if !self.horizontal.is_finite() {
            return Err(SignalError::NonFinite {
                field: "horizontal",
                value: self.horizontal,
            });
        }
        if self.horizontal <= 0.0 {
            return Err(SignalError::DegenerateWidth(self.horizontal));
        }
        if self.vertical < 0.0 {
            return Err(SignalError::NegativeHeight(self.vertical));
        }

        Ok((self.vertical / self.horizontal * 100.0).trunc())
    }
}
