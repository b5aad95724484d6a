//! Easing curves shared by the FLIP engine and the motion tokens

use serde::{Deserialize, Serialize};

/// Ease-in-out cubic function
#[inline]
pub fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Ease-out cubic function
#[inline]
pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// Ease-in cubic function
#[inline]
pub fn ease_in_cubic(t: f64) -> f64 {
    t * t * t
}

/// Named easing curve
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    /// No easing; used for gesture-scrubbed animations
    Linear,
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Map linear progress to eased progress
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => ease_in_cubic(t),
            Easing::EaseOut => ease_out_cubic(t),
            Easing::EaseInOut => ease_in_out(t),
        }
    }

    /// CSS timing function matching [`Easing::apply`]
    pub fn css(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "cubic-bezier(0.32, 0, 0.67, 0)",
            Easing::EaseOut => "cubic-bezier(0.33, 1, 0.68, 1)",
            Easing::EaseInOut => "cubic-bezier(0.65, 0, 0.35, 1)",
        }
    }
}
