//! Invert step of FLIP

use serde::{Deserialize, Serialize};

use crate::math::Rect;

/// CSS transform of an element resting at its final layout position
pub const IDENTITY_TRANSFORM: &str = "translate(0, 0) scale(1, 1)";

/// Translation and scale placing the last layout over the first
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvertTransform {
    pub x: f64,
    pub y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl InvertTransform {
    /// No translation, unit scale
    pub const IDENTITY: InvertTransform = InvertTransform {
        x: 0.0,
        y: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
    };

    /// CSS transform string (`translate(..px, ..px) scale(.., ..)`)
    pub fn to_css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({}, {})",
            self.x, self.y, self.scale_x, self.scale_y
        )
    }

    /// Interpolate towards identity: `t = 0` is `self`, `t = 1` is identity
    pub fn towards_identity(&self, t: f64) -> InvertTransform {
        InvertTransform {
            x: self.x * (1.0 - t),
            y: self.y * (1.0 - t),
            scale_x: self.scale_x + (1.0 - self.scale_x) * t,
            scale_y: self.scale_y + (1.0 - self.scale_y) * t,
        }
    }
}

/// Transform that makes the element laid out at `last` appear at `first`.
///
/// A degenerate `last` axis (zero size) keeps a unit scale on that axis.
pub fn compute_invert_transform(first: &Rect, last: &Rect) -> InvertTransform {
    InvertTransform {
        x: first.x - last.x,
        y: first.y - last.y,
        scale_x: ratio(first.width, last.width),
        scale_y: ratio(first.height, last.height),
    }
}

#[inline]
fn ratio(first: f64, last: f64) -> f64 {
    if last == 0.0 {
        1.0
    } else {
        first / last
    }
}
