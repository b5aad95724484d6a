//! Web Animations playback

use serde::Serialize;
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Element;

use super::describe;
use crate::flip::{AnimationDriver, AnimationTiming, Animator, Keyframe};

#[derive(Serialize)]
struct EffectTiming<'a> {
    duration: f64,
    easing: &'a str,
    fill: &'a str,
}

/// Animator calling `Element.animate`
#[derive(Clone, Copy, Debug, Default)]
pub struct WebAnimator;

/// Handle over a platform `Animation`.
///
/// Holds nothing when the platform refused to start the animation, in
/// which case every call is a no-op.
pub struct WebAnimation {
    animation: Option<web_sys::Animation>,
}

impl WebAnimation {
    pub fn inner(&self) -> Option<&web_sys::Animation> {
        self.animation.as_ref()
    }

    fn with(&self, op: &str, f: impl FnOnce(&web_sys::Animation) -> Result<(), JsValue>) {
        if let Some(animation) = &self.animation {
            if let Err(err) = f(animation) {
                warn!(op, error = %describe(&err), "animation call failed");
            }
        }
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(value).map_err(super::js_error)?;
    js_sys::JSON::parse(&json)
}

fn start(element: &Element, keyframes: &[Keyframe], timing: AnimationTiming) -> Result<web_sys::Animation, JsValue> {
    let keyframes = to_js(keyframes)?;
    let timing = to_js(&EffectTiming {
        duration: timing.duration_ms,
        easing: timing.easing.css(),
        fill: "both",
    })?;
    let animate: js_sys::Function = js_sys::Reflect::get(element, &JsValue::from_str("animate"))?.dyn_into()?;
    animate
        .call2(element, &keyframes, &timing)?
        .dyn_into::<web_sys::Animation>()
}

impl Animator for WebAnimator {
    type Element = Element;
    type Animation = WebAnimation;

    fn animate(&self, element: &Element, keyframes: &[Keyframe], timing: AnimationTiming) -> WebAnimation {
        match start(element, keyframes, timing) {
            Ok(animation) => WebAnimation {
                animation: Some(animation),
            },
            Err(err) => {
                warn!(error = %describe(&err), "element.animate failed");
                WebAnimation { animation: None }
            }
        }
    }

    fn on_finish(&self, animation: &WebAnimation, callback: Box<dyn FnOnce()>) {
        match &animation.animation {
            Some(inner) => {
                let handler = Closure::once_into_js(move || callback());
                inner.set_onfinish(Some(handler.unchecked_ref()));
            }
            // Nothing will ever finish, settle right away
            None => callback(),
        }
    }
}

impl AnimationDriver for WebAnimation {
    fn set_current_time(&self, ms: f64) {
        if let Some(animation) = &self.animation {
            animation.set_current_time(Some(ms));
        }
    }

    fn play(&self) {
        self.with("play", |a| a.play());
    }

    fn pause(&self) {
        self.with("pause", |a| a.pause());
    }

    fn reverse(&self) {
        self.with("reverse", |a| a.reverse());
    }

    fn finish(&self) {
        self.with("finish", |a| a.finish());
    }

    fn cancel(&self) {
        if let Some(animation) = &self.animation {
            animation.cancel();
        }
    }
}
