//! Pure timeline sampling
//!
//! Lets a second, independently rendered layer follow a FLIP animation
//! frame by frame without reading anything back from the compositor.

use serde::Serialize;

use super::easing::Easing;
use super::frame::FlipFrames;
use super::transform::{compute_invert_transform, InvertTransform};

/// Interpolated state of a FLIP animation at one progress value
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSample {
    pub transform: InvertTransform,
    pub opacity: f64,
    pub border_radius: f64,
}

/// FLIP timeline over a frame pair
#[derive(Clone, Copy, Debug)]
pub struct FlipTimeline {
    frames: FlipFrames,
    invert: InvertTransform,
    easing: Easing,
    reverse: bool,
}

impl FlipTimeline {
    /// Opening timeline (first → last)
    pub fn new(frames: FlipFrames, easing: Easing) -> Self {
        Self {
            invert: compute_invert_transform(&frames.first.rect, &frames.last.rect),
            frames,
            easing,
            reverse: false,
        }
    }

    /// Closing timeline (last → first)
    pub fn reversed(frames: FlipFrames, easing: Easing) -> Self {
        Self {
            reverse: true,
            ..Self::new(frames, easing)
        }
    }

    /// Frames this timeline runs between
    pub fn frames(&self) -> &FlipFrames {
        &self.frames
    }

    /// Sample at linear `progress` in `0..=1`
    pub fn sample(&self, progress: f64) -> FrameSample {
        let t = self.easing.apply(progress);
        // distance travelled from `first` towards `last`
        let toward_last = if self.reverse { 1.0 - t } else { t };
        let first = &self.frames.first;
        let last = &self.frames.last;

        FrameSample {
            transform: self.invert.towards_identity(toward_last),
            opacity: first.opacity + (last.opacity - first.opacity) * toward_last,
            border_radius: first.border_radius
                + (last.border_radius - first.border_radius) * toward_last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flip::frame::Frame;
    use crate::math::Rect;

    fn frames() -> FlipFrames {
        FlipFrames::new(
            Frame {
                rect: Rect::new(100.0, 200.0, 60.0, 60.0),
                opacity: 0.0,
                border_radius: 12.0,
            },
            Frame::from_rect(Rect::new(0.0, 0.0, 375.0, 812.0)),
        )
    }

    #[test]
    fn test_open_timeline_endpoints() {
        let timeline = FlipTimeline::new(frames(), Easing::Linear);
        let start = timeline.sample(0.0);
        assert_eq!(start.transform.x, 100.0);
        assert_eq!(start.opacity, 0.0);
        assert_eq!(start.border_radius, 12.0);

        let end = timeline.sample(1.0);
        assert_eq!(end.transform, InvertTransform::IDENTITY);
        assert_eq!(end.opacity, 1.0);
        assert_eq!(end.border_radius, 0.0);
    }

    #[test]
    fn test_close_timeline_mirrors_open() {
        let open = FlipTimeline::new(frames(), Easing::Linear);
        let close = FlipTimeline::reversed(frames(), Easing::Linear);
        for p in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let a = open.sample(p);
            let b = close.sample(1.0 - p);
            assert!((a.transform.x - b.transform.x).abs() < 1e-9);
            assert!((a.opacity - b.opacity).abs() < 1e-9);
        }
    }

    #[test]
    fn test_progress_is_clamped() {
        let timeline = FlipTimeline::new(frames(), Easing::EaseOut);
        assert_eq!(timeline.sample(-3.0), timeline.sample(0.0));
        assert_eq!(timeline.sample(7.0), timeline.sample(1.0));
    }
}
