//! WASM exports for the mini-app runtime
//!
//! `MiniappController` wraps [`MiniappRuntime`] with a JS-friendly API:
//! structured values cross the boundary as JSON strings, the way the
//! desktop controller does it.
//!
//! Callbacks registered here run synchronously inside runtime operations.
//! They must not call back into the controller; schedule follow-up work
//! (for example `settle_flow`) on a microtask instead.

use std::rc::Rc;

use miniapp_core::{CtxPatch, MiniappManifest};
use tracing::Level;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use super::{
    call_logged, init_console_logging, js_error, DateClock, DomContainerHost, DomLayoutProbe,
    JsBridge, JsWindowStack, WebAnimation, WebAnimator,
};
use crate::bridge::{NoopBridge, PermissionBridge};
use crate::clock::Clock;
use crate::config::RuntimeConfig;
use crate::events::SubscriptionId;
use crate::flip::{
    capture_frame, capture_icon_frame, compute_window_frame, create_synced_animation,
    play_animation, FlipFrames, PlayOptions, SyncedAnimation, BOTTOM_BAR_EXPRESSION,
};
use crate::math::SafeAreaInsets;
use crate::motion::MotionConfig;
use crate::runtime::{LaunchOptions, MiniappRuntime, RuntimeDeps};

/// Runtime controller for WASM
#[wasm_bindgen]
pub struct MiniappController {
    runtime: MiniappRuntime,
    probe: DomLayoutProbe,
    animator: WebAnimator,
    event_subscription: Option<SubscriptionId>,
    state_subscription: Option<SubscriptionId>,
}

#[wasm_bindgen]
impl MiniappController {
    /// Create a controller.
    ///
    /// `config_json` may be empty for defaults. `window_stack` is the JS
    /// surface registry. `bridge`, when given, is called as
    /// `bridge(iframe, appId, name, permissions)` for every mounted app.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config_json: &str,
        window_stack: JsValue,
        bridge: Option<js_sys::Function>,
    ) -> Result<MiniappController, JsValue> {
        console_error_panic_hook::set_once();
        init_console_logging(Level::INFO);

        let config = if config_json.trim().is_empty() {
            RuntimeConfig::default()
        } else {
            RuntimeConfig::from_json(config_json).map_err(js_error)?
        };
        let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
        let document = window.document().ok_or_else(|| js_error("no document"))?;

        let host = Rc::new(DomContainerHost::install(document.clone()).map_err(js_error)?);
        let bridge: Rc<dyn PermissionBridge> = match bridge {
            Some(callback) => Rc::new(JsBridge::new(callback, Rc::clone(&host))),
            None => Rc::new(NoopBridge),
        };
        let deps = RuntimeDeps {
            host,
            stack: Rc::new(JsWindowStack::new(window_stack)),
            bridge,
            clock: Rc::new(DateClock),
        };

        Ok(Self {
            runtime: MiniappRuntime::new(config, deps).map_err(js_error)?,
            probe: DomLayoutProbe::new(window, document),
            animator: WebAnimator,
            event_subscription: None,
            state_subscription: None,
        })
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Launch from a manifest JSON. Returns the app id.
    #[wasm_bindgen]
    pub fn launch_app(&mut self, manifest_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
        let manifest: MiniappManifest = serde_json::from_str(manifest_json).map_err(js_error)?;
        let options: LaunchOptions = match options_json {
            Some(json) => serde_json::from_str(&json).map_err(js_error)?,
            None => LaunchOptions::default(),
        };
        let app_id = self.runtime.launch_app(manifest, options).map_err(js_error)?;
        Ok(app_id.to_string())
    }

    #[wasm_bindgen]
    pub fn container_loaded(&mut self, app_id: &str) -> bool {
        self.runtime.container_loaded(app_id)
    }

    #[wasm_bindgen]
    pub fn ready_gate_opened(&mut self, app_id: &str) -> bool {
        self.runtime.ready_gate_opened(app_id)
    }

    #[wasm_bindgen]
    pub fn activate_app(&mut self, app_id: &str) -> bool {
        self.runtime.activate_app(app_id)
    }

    #[wasm_bindgen]
    pub fn deactivate_app(&mut self, app_id: &str) -> bool {
        self.runtime.deactivate_app(app_id)
    }

    #[wasm_bindgen]
    pub fn close_app(&mut self, app_id: &str) -> bool {
        self.runtime.close_app(app_id)
    }

    /// Call when an app's present/dismiss animation finished
    #[wasm_bindgen]
    pub fn settle_flow(&mut self, app_id: &str) -> bool {
        self.runtime.settle_flow(app_id)
    }

    #[wasm_bindgen]
    pub fn open_stack_view(&mut self) -> bool {
        self.runtime.open_stack_view()
    }

    #[wasm_bindgen]
    pub fn close_stack_view(&mut self) -> bool {
        self.runtime.close_stack_view()
    }

    /// Merge a ctx patch JSON (`{ "theme": "dark" }`)
    #[wasm_bindgen]
    pub fn update_ctx(&mut self, app_id: &str, patch_json: &str) -> Result<bool, JsValue> {
        let patch: CtxPatch = serde_json::from_str(patch_json).map_err(js_error)?;
        Ok(self.runtime.update_ctx(app_id, &patch))
    }

    /// Fire expired splash timers. Returns a JSON array of app ids.
    #[wasm_bindgen]
    pub fn tick(&mut self) -> String {
        let fired = self.runtime.tick(DateClock.now_ms());
        serde_json::to_string(&fired).unwrap_or_else(|_| "[]".to_string())
    }

    // =========================================================================
    // State and events
    // =========================================================================

    /// Current snapshot as JSON
    #[wasm_bindgen]
    pub fn get_state_json(&self) -> Result<String, JsValue> {
        self.runtime.snapshot_json().map_err(js_error)
    }

    /// Call `callback(eventJson)` for every lifecycle event
    #[wasm_bindgen]
    pub fn set_event_callback(&mut self, callback: js_sys::Function) {
        if let Some(id) = self.event_subscription.take() {
            self.runtime.events().unsubscribe(id);
        }
        let id = self.runtime.events().subscribe(move |event| {
            if let Ok(json) = serde_json::to_string(event) {
                call_logged(&callback, Some(&JsValue::from_str(&json)), "event");
            }
        });
        self.event_subscription = Some(id);
    }

    /// Call `callback(stateJson)` whenever the snapshot is replaced
    #[wasm_bindgen]
    pub fn set_state_callback(&mut self, callback: js_sys::Function) {
        if let Some(id) = self.state_subscription.take() {
            self.runtime.store().unsubscribe(id);
        }
        let id = self.runtime.store().subscribe(move |state| {
            if let Ok(json) = serde_json::to_string(&**state) {
                call_logged(&callback, Some(&JsValue::from_str(&json)), "state");
            }
        });
        self.state_subscription = Some(id);
    }

    // =========================================================================
    // Motion
    // =========================================================================

    #[wasm_bindgen]
    pub fn get_motion_json(&self) -> String {
        serde_json::to_string(self.runtime.motion()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Replace motion tokens. Returns the CSS declaration block.
    #[wasm_bindgen]
    pub fn set_motion(&mut self, motion_json: &str) -> Result<String, JsValue> {
        let motion: MotionConfig = serde_json::from_str(motion_json).map_err(js_error)?;
        self.runtime.set_motion(motion).map_err(js_error)?;
        Ok(self.runtime.motion().css_text())
    }

    /// Motion tokens as a CSS declaration block
    #[wasm_bindgen]
    pub fn get_motion_css_text(&self) -> String {
        self.runtime.motion().css_text()
    }

    // =========================================================================
    // FLIP animation
    // =========================================================================

    /// Destination window rect as JSON
    #[wasm_bindgen]
    pub fn compute_window_frame_json(&self, top: f64, bottom: f64, left: f64, right: f64) -> String {
        let insets = SafeAreaInsets::new(top, bottom, left, right);
        let rect = compute_window_frame(&self.probe, &insets, BOTTOM_BAR_EXPRESSION);
        serde_json::to_string(&rect).unwrap_or_else(|_| "{}".to_string())
    }

    /// Morph `icon` into `window`. `on_finish` should settle the app.
    #[wasm_bindgen]
    pub fn play_open_animation(&self, icon: &Element, window: &Element, on_finish: Option<js_sys::Function>) {
        let motion = self.runtime.motion();
        let options = PlayOptions::new(motion.open_duration_ms as f64, motion.easing);
        self.play(icon, window, options, on_finish);
    }

    /// Morph `window` back into `icon`
    #[wasm_bindgen]
    pub fn play_close_animation(&self, icon: &Element, window: &Element, on_finish: Option<js_sys::Function>) {
        let motion = self.runtime.motion();
        let options = PlayOptions::new(motion.close_duration_ms as f64, motion.close_easing).reversed();
        self.play(icon, window, options, on_finish);
    }

    /// Paused icon ↔ window morph for gesture-driven dismissal
    #[wasm_bindgen]
    pub fn create_scrubber(&self, icon: &Element, window: &Element) -> FlipScrubber {
        let frames = self.capture(icon, window);
        let duration = self.runtime.motion().close_duration_ms as f64;
        FlipScrubber {
            inner: create_synced_animation(&self.animator, window, &frames, duration),
        }
    }
}

impl MiniappController {
    fn capture(&self, icon: &Element, window: &Element) -> FlipFrames {
        FlipFrames::new(
            capture_icon_frame(&self.probe, icon),
            capture_frame(&self.probe, window),
        )
    }

    fn play(&self, icon: &Element, window: &Element, mut options: PlayOptions, on_finish: Option<js_sys::Function>) {
        let frames = self.capture(icon, window);
        if let Some(callback) = on_finish {
            options = options.on_finish(move || {
                call_logged(&callback, None, "animation finish");
            });
        }
        play_animation(&self.animator, window, &frames, options);
    }
}

/// Scrubbable FLIP animation handed to JS
#[wasm_bindgen]
pub struct FlipScrubber {
    inner: SyncedAnimation<WebAnimation>,
}

#[wasm_bindgen]
impl FlipScrubber {
    #[wasm_bindgen]
    pub fn set_progress(&mut self, progress: f64) {
        self.inner.set_progress(progress);
    }

    #[wasm_bindgen]
    pub fn progress(&self) -> f64 {
        self.inner.progress()
    }

    #[wasm_bindgen]
    pub fn play(&mut self) {
        self.inner.play();
    }

    #[wasm_bindgen]
    pub fn reverse(&mut self) {
        self.inner.reverse();
    }

    #[wasm_bindgen]
    pub fn finish(&mut self) {
        self.inner.finish();
    }

    #[wasm_bindgen]
    pub fn cancel(&mut self) {
        self.inner.cancel();
    }

    /// Interpolated transform/opacity/radius for a mirrored layer, as JSON
    #[wasm_bindgen]
    pub fn sample_json(&self) -> String {
        serde_json::to_string(&self.inner.sample()).unwrap_or_else(|_| "{}".to_string())
    }
}
