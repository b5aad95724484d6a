//! Play step of FLIP
//!
//! Playback is delegated to the platform compositor through [`Animator`].
//! Two shapes are offered: a fire-and-forget [`play_animation`] whose finish
//! callback feeds back into the runtime's settle step, and a paused
//! [`SyncedAnimation`] driven by a gesture.

use tracing::debug;

use super::easing::Easing;
use super::frame::FlipFrames;
use super::keyframes::{generate_close_keyframes, generate_keyframes, Keyframe};
use super::timeline::{FlipTimeline, FrameSample};

/// Timing passed to the platform when starting an animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationTiming {
    pub duration_ms: f64,
    pub easing: Easing,
}

/// Handle to a running platform animation
pub trait AnimationDriver {
    /// Seek to `ms` of elapsed time
    fn set_current_time(&self, ms: f64);
    fn play(&self);
    fn pause(&self);
    /// Flip playback direction
    fn reverse(&self);
    /// Jump to the end and fire finish callbacks
    fn finish(&self);
    /// Drop the animation's effect without finishing
    fn cancel(&self);
}

/// Platform animation factory
pub trait Animator {
    /// Platform element type
    type Element;
    /// Platform animation type
    type Animation: AnimationDriver;

    /// Start animating `element` through `keyframes`
    fn animate(
        &self,
        element: &Self::Element,
        keyframes: &[Keyframe],
        timing: AnimationTiming,
    ) -> Self::Animation;

    /// Register a callback fired once when `animation` finishes
    fn on_finish(&self, animation: &Self::Animation, callback: Box<dyn FnOnce()>);
}

/// Options for [`play_animation`]
pub struct PlayOptions {
    pub timing: AnimationTiming,
    /// Play the closing keyframes instead of the opening ones
    pub reverse: bool,
    /// Called once playback completes
    pub on_finish: Option<Box<dyn FnOnce()>>,
}

impl PlayOptions {
    /// Forward playback without a callback
    pub fn new(duration_ms: f64, easing: Easing) -> Self {
        Self {
            timing: AnimationTiming {
                duration_ms,
                easing,
            },
            reverse: false,
            on_finish: None,
        }
    }

    /// Builder: play the closing direction
    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Builder: set the finish callback
    pub fn on_finish(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_finish = Some(Box::new(callback));
        self
    }
}

/// One-shot FLIP animation of `element` between `frames`
pub fn play_animation<A: Animator>(
    animator: &A,
    element: &A::Element,
    frames: &FlipFrames,
    options: PlayOptions,
) -> A::Animation {
    let keyframes = if options.reverse {
        generate_close_keyframes(frames)
    } else {
        generate_keyframes(frames)
    };
    debug!(
        reverse = options.reverse,
        duration_ms = options.timing.duration_ms,
        "playing flip animation"
    );

    let animation = animator.animate(element, &keyframes, options.timing);
    if let Some(callback) = options.on_finish {
        animator.on_finish(&animation, callback);
    }
    animation
}

/// Playback state of a [`SyncedAnimation`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncedState {
    /// Held at a scrubbed position
    Paused,
    /// Running forwards from the current position
    Playing,
    /// Running backwards from the current position
    Reversing,
    Finished,
    Cancelled,
}

/// Paused FLIP animation driven by `set_progress`
pub struct SyncedAnimation<D: AnimationDriver> {
    driver: D,
    timeline: FlipTimeline,
    duration_ms: f64,
    progress: f64,
    state: SyncedState,
}

/// Build a paused, scrubbable animation of `element` between `frames`.
///
/// Keyframes use linear timing so progress maps directly onto elapsed time.
pub fn create_synced_animation<A: Animator>(
    animator: &A,
    element: &A::Element,
    frames: &FlipFrames,
    duration_ms: f64,
) -> SyncedAnimation<A::Animation> {
    let timing = AnimationTiming {
        duration_ms,
        easing: Easing::Linear,
    };
    let driver = animator.animate(element, &generate_keyframes(frames), timing);
    driver.pause();
    driver.set_current_time(0.0);

    SyncedAnimation {
        driver,
        timeline: FlipTimeline::new(*frames, Easing::Linear),
        duration_ms,
        progress: 0.0,
        state: SyncedState::Paused,
    }
}

impl<D: AnimationDriver> SyncedAnimation<D> {
    /// Scrub to `progress` (clamped to `0..=1`)
    pub fn set_progress(&mut self, progress: f64) {
        if self.is_done() {
            return;
        }
        let progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if self.state != SyncedState::Paused {
            self.driver.pause();
            self.state = SyncedState::Paused;
        }
        self.progress = progress;
        self.driver.set_current_time(progress * self.duration_ms);
    }

    /// Current linear progress
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Interpolated frame at the current progress, for a mirrored layer
    pub fn sample(&self) -> FrameSample {
        self.timeline.sample(self.progress)
    }

    /// Continue forwards from the current position
    pub fn play(&mut self) {
        if self.is_done() {
            return;
        }
        self.driver.play();
        self.state = SyncedState::Playing;
    }

    /// Run backwards from the current position (gesture cancelled)
    pub fn reverse(&mut self) {
        if self.is_done() {
            return;
        }
        self.driver.reverse();
        self.state = SyncedState::Reversing;
    }

    /// Complete immediately
    pub fn finish(&mut self) {
        if self.is_done() {
            return;
        }
        self.driver.finish();
        self.progress = 1.0;
        self.state = SyncedState::Finished;
    }

    /// Abort without completing
    pub fn cancel(&mut self) {
        if self.is_done() {
            return;
        }
        self.driver.cancel();
        self.state = SyncedState::Cancelled;
    }

    /// Playback state
    pub fn state(&self) -> SyncedState {
        self.state
    }

    /// Platform animation handle
    pub fn driver(&self) -> &D {
        &self.driver
    }

    #[inline]
    fn is_done(&self) -> bool {
        matches!(self.state, SyncedState::Finished | SyncedState::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flip::{Frame, IDENTITY_TRANSFORM};
    use crate::math::Rect;
    use crate::testing::{DriverCall, RecordingAnimator};
    use std::cell::Cell;
    use std::rc::Rc;

    fn frames() -> FlipFrames {
        FlipFrames::new(
            Frame {
                rect: Rect::new(100.0, 200.0, 60.0, 60.0),
                opacity: 1.0,
                border_radius: 13.2,
            },
            Frame::from_rect(Rect::new(0.0, 0.0, 375.0, 812.0)),
        )
    }

    #[test]
    fn test_play_animation_fires_finish_once() {
        let animator = RecordingAnimator::new();
        let finished = Rc::new(Cell::new(0));
        let counter = Rc::clone(&finished);

        let animation = play_animation(
            &animator,
            &"window".to_string(),
            &frames(),
            PlayOptions::new(420.0, Easing::EaseOut).on_finish(move || counter.set(counter.get() + 1)),
        );
        assert_eq!(animation.keyframes()[1].transform, IDENTITY_TRANSFORM);
        assert_eq!(animation.timing().duration_ms, 420.0);

        animation.finish();
        animation.finish();
        assert_eq!(finished.get(), 1);
    }

    #[test]
    fn test_play_animation_reverse_uses_close_keyframes() {
        let animator = RecordingAnimator::new();
        let animation = play_animation(
            &animator,
            &"window".to_string(),
            &frames(),
            PlayOptions::new(360.0, Easing::EaseInOut).reversed(),
        );
        assert_eq!(animation.keyframes()[0].transform, IDENTITY_TRANSFORM);
        assert_eq!(animation.keyframes()[1].border_radius, "13.2px");
    }

    #[test]
    fn test_synced_animation_starts_paused_at_zero() {
        let animator = RecordingAnimator::new();
        let synced = create_synced_animation(&animator, &"window".to_string(), &frames(), 400.0);

        assert_eq!(synced.state(), SyncedState::Paused);
        assert_eq!(synced.progress(), 0.0);
        assert_eq!(
            synced.driver().calls(),
            vec![DriverCall::Pause, DriverCall::SetCurrentTime(0.0)]
        );
        assert_eq!(synced.driver().timing().easing, Easing::Linear);
    }

    #[test]
    fn test_set_progress_maps_to_elapsed_time() {
        let animator = RecordingAnimator::new();
        let mut synced = create_synced_animation(&animator, &"window".to_string(), &frames(), 400.0);

        synced.set_progress(0.25);
        synced.set_progress(2.0);
        let calls = synced.driver().calls();
        assert_eq!(calls[2], DriverCall::SetCurrentTime(100.0));
        assert_eq!(calls[3], DriverCall::SetCurrentTime(400.0));
        assert_eq!(synced.progress(), 1.0);
    }

    #[test]
    fn test_set_progress_pauses_running_animation() {
        let animator = RecordingAnimator::new();
        let mut synced = create_synced_animation(&animator, &"window".to_string(), &frames(), 400.0);

        synced.play();
        assert_eq!(synced.state(), SyncedState::Playing);
        synced.set_progress(0.5);
        assert_eq!(synced.state(), SyncedState::Paused);
        assert_eq!(
            &synced.driver().calls()[2..],
            &[DriverCall::Play, DriverCall::Pause, DriverCall::SetCurrentTime(200.0)]
        );
    }

    #[test]
    fn test_sample_follows_progress() {
        let animator = RecordingAnimator::new();
        let mut synced = create_synced_animation(&animator, &"window".to_string(), &frames(), 400.0);

        assert_eq!(synced.sample().transform.x, 100.0);
        synced.set_progress(1.0);
        assert_eq!(synced.sample().transform.x, 0.0);
        assert!((synced.sample().transform.scale_x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_finish_and_cancel_are_terminal() {
        let animator = RecordingAnimator::new();
        let mut synced = create_synced_animation(&animator, &"window".to_string(), &frames(), 400.0);

        synced.reverse();
        assert_eq!(synced.state(), SyncedState::Reversing);
        synced.finish();
        assert_eq!(synced.state(), SyncedState::Finished);
        assert_eq!(synced.progress(), 1.0);

        synced.cancel();
        synced.set_progress(0.1);
        assert_eq!(synced.state(), SyncedState::Finished);
        assert_eq!(
            synced.driver().calls().last(),
            Some(&DriverCall::Finish)
        );
    }
}
