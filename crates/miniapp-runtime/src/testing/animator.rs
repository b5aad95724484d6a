//! Recording animator

use std::cell::RefCell;
use std::rc::Rc;

use crate::flip::{AnimationDriver, AnimationTiming, Animator, Keyframe};

/// A call made on a [`RecordingAnimation`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DriverCall {
    SetCurrentTime(f64),
    Play,
    Pause,
    Reverse,
    Finish,
    Cancel,
}

struct AnimationRecord {
    element: String,
    keyframes: Vec<Keyframe>,
    timing: AnimationTiming,
    calls: RefCell<Vec<DriverCall>>,
    on_finish: RefCell<Option<Box<dyn FnOnce()>>>,
}

/// Animation handle recording driver calls. `finish` fires the callback.
#[derive(Clone)]
pub struct RecordingAnimation {
    record: Rc<AnimationRecord>,
}

impl RecordingAnimation {
    pub fn element(&self) -> &str {
        &self.record.element
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.record.keyframes
    }

    pub fn timing(&self) -> AnimationTiming {
        self.record.timing
    }

    pub fn calls(&self) -> Vec<DriverCall> {
        self.record.calls.borrow().clone()
    }

    fn push(&self, call: DriverCall) {
        self.record.calls.borrow_mut().push(call);
    }
}

impl AnimationDriver for RecordingAnimation {
    fn set_current_time(&self, ms: f64) {
        self.push(DriverCall::SetCurrentTime(ms));
    }

    fn play(&self) {
        self.push(DriverCall::Play);
    }

    fn pause(&self) {
        self.push(DriverCall::Pause);
    }

    fn reverse(&self) {
        self.push(DriverCall::Reverse);
    }

    fn finish(&self) {
        self.push(DriverCall::Finish);
        let callback = self.record.on_finish.borrow_mut().take();
        if let Some(callback) = callback {
            callback();
        }
    }

    fn cancel(&self) {
        self.push(DriverCall::Cancel);
    }
}

/// Animator handing out [`RecordingAnimation`]s
#[derive(Default)]
pub struct RecordingAnimator {
    animations: RefCell<Vec<RecordingAnimation>>,
}

impl RecordingAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn animations(&self) -> Vec<RecordingAnimation> {
        self.animations.borrow().clone()
    }
}

impl Animator for RecordingAnimator {
    type Element = String;
    type Animation = RecordingAnimation;

    fn animate(&self, element: &String, keyframes: &[Keyframe], timing: AnimationTiming) -> RecordingAnimation {
        let animation = RecordingAnimation {
            record: Rc::new(AnimationRecord {
                element: element.clone(),
                keyframes: keyframes.to_vec(),
                timing,
                calls: RefCell::new(Vec::new()),
                on_finish: RefCell::new(None),
            }),
        };
        self.animations.borrow_mut().push(animation.clone());
        animation
    }

    fn on_finish(&self, animation: &RecordingAnimation, callback: Box<dyn FnOnce()>) {
        *animation.record.on_finish.borrow_mut() = Some(callback);
    }
}
