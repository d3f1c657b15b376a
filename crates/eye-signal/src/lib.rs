//! Eye Signal Processing
//!
//! Turns landmark geometry into a per-frame eye-openness ratio, smooths it,
//! and maps the smoothed ratio onto a 0-100 openness score.

mod error;
mod landmarks;
mod openness;
mod smoother;
mod window;

pub use error::SignalError;
pub use landmarks::{
    EyeDistances, EyeLandmarks, Point, LEFT_EYE_INNER, LEFT_EYE_LOWER, LEFT_EYE_OUTER,
    LEFT_EYE_UPPER,
};
pub use openness::{OpennessClassifier, OpennessZone};
pub use smoother::{SignalSmoother, DEFAULT_WINDOW};
pub use window::SlidingWindow;
