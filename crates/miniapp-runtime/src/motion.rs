//! Motion timing tokens
//!
//! Exposed to the rendering layer both as a structured object and as CSS
//! custom properties.

use serde::{Deserialize, Serialize};

use crate::flip::Easing;

/// Timing tokens for runtime animations
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MotionConfig {
    /// Icon → window morph
    pub open_duration_ms: u32,
    /// Window → icon morph
    pub close_duration_ms: u32,
    /// Active app sliding out of the way
    pub background_duration_ms: u32,
    /// Background app returning to the foreground
    pub foreground_duration_ms: u32,
    pub easing: Easing,
    pub close_easing: Easing,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            open_duration_ms: 420,
            close_duration_ms: 360,
            background_duration_ms: 280,
            foreground_duration_ms: 320,
            easing: Easing::EaseOut,
            close_easing: Easing::EaseInOut,
        }
    }
}

impl MotionConfig {
    /// Longest duration allowed for a single token
    pub const MAX_DURATION_MS: u32 = 10_000;

    /// CSS custom properties, in a stable order
    pub fn css_variables(&self) -> Vec<(String, String)> {
        vec![
            var("--miniapp-open-duration", format!("{}ms", self.open_duration_ms)),
            var("--miniapp-close-duration", format!("{}ms", self.close_duration_ms)),
            var(
                "--miniapp-background-duration",
                format!("{}ms", self.background_duration_ms),
            ),
            var(
                "--miniapp-foreground-duration",
                format!("{}ms", self.foreground_duration_ms),
            ),
            var("--miniapp-easing", self.easing.css().to_string()),
            var("--miniapp-close-easing", self.close_easing.css().to_string()),
        ]
    }

    /// The custom properties as one inline style declaration block
    pub fn css_text(&self) -> String {
        self.css_variables()
            .iter()
            .map(|(name, value)| format!("{}: {};", name, value))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether every duration is within `1..=MAX_DURATION_MS`
    pub fn is_valid(&self) -> bool {
        [
            self.open_duration_ms,
            self.close_duration_ms,
            self.background_duration_ms,
            self.foreground_duration_ms,
        ]
        .iter()
        .all(|ms| (1..=Self::MAX_DURATION_MS).contains(ms))
    }
}

fn var(name: &str, value: String) -> (String, String) {
    (name.to_string(), value)
}
