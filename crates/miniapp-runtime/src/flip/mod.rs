//! FLIP (First-Last-Invert-Play) animation engine
//!
//! Morphs an icon into a full-window presentation and back using
//! transform-only animation:
//!
//! - `frame`: capture geometry snapshots (First, Last)
//! - `transform`: compute the inverting transform (Invert)
//! - `keyframes`: two-stop keyframe lists for the compositor
//! - `player`: one-shot and gesture-synced playback (Play)
//! - `timeline`: pure sampling for layers rendered outside the compositor

mod easing;
mod frame;
mod keyframes;
mod player;
mod timeline;
mod transform;

pub use easing::{ease_in_cubic, ease_in_out, ease_out_cubic, Easing};
pub use frame::{capture_frame, capture_icon_frame, compute_window_frame, FlipFrames, Frame, LayoutProbe};
pub use keyframes::{generate_close_keyframes, generate_keyframes, Keyframe};
pub use player::{
    create_synced_animation, play_animation, AnimationDriver, AnimationTiming, Animator,
    PlayOptions, SyncedAnimation, SyncedState,
};
pub use timeline::{FlipTimeline, FrameSample};
pub use transform::{compute_invert_transform, InvertTransform, IDENTITY_TRANSFORM};

/// Icon corner radius as a fraction of icon width
pub const ICON_RADIUS_RATIO: f64 = 0.22;

/// CSS expression for the persistent bottom bar reservation
pub const BOTTOM_BAR_EXPRESSION: &str = "var(--miniapp-bottom-bar-height, 0px)";
