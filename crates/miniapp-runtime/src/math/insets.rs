//! Safe-area insets

use serde::{Deserialize, Serialize};

/// Safe-area insets reported by the host (notch, home indicator, ...)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SafeAreaInsets {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl SafeAreaInsets {
    /// Create insets
    #[inline]
    pub const fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }
}
