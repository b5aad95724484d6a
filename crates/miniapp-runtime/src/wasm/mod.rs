//! Browser adapters and the JS-facing controller
//!
//! Only compiled with the `wasm` feature:
//!
//! - `container`: iframe containers living in a visible and an off-screen
//!   region
//! - `stack`: window stack backed by a JS registry object
//! - `layout`: DOM layout probe for frame capture
//! - `animator`: Web Animations playback
//! - `logging`: `tracing` output to the browser console
//! - `controller`: `MiniappController`, the wasm-bindgen facade

mod animator;
mod bridge;
mod clock;
mod container;
mod controller;
mod layout;
mod logging;
mod stack;

pub use animator::{WebAnimation, WebAnimator};
pub use bridge::JsBridge;
pub use clock::DateClock;
pub use container::{DomContainer, DomContainerHost};
pub use controller::{FlipScrubber, MiniappController};
pub use layout::DomLayoutProbe;
pub use logging::init_console_logging;
pub use stack::JsWindowStack;

use tracing::warn;
use wasm_bindgen::JsValue;

/// Convert any displayable error into a JS error value
pub(crate) fn js_error(err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Render a `JsValue` error for logs and error messages
pub(crate) fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Call a JS callback with at most one argument.
///
/// A throw is logged and swallowed. Returns whether the callback returned
/// normally.
pub(crate) fn call_logged(callback: &js_sys::Function, arg: Option<&JsValue>, what: &str) -> bool {
    let result = match arg {
        Some(arg) => callback.call1(&JsValue::NULL, arg),
        None => callback.call0(&JsValue::NULL),
    };
    match result {
        Ok(_) => true,
        Err(err) => {
            warn!(callback = what, error = %describe(&err), "js callback threw");
            false
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_call_logged_swallows_throw() {
        let throws = js_sys::Function::new_no_args("throw new Error('boom')");
        assert!(!call_logged(&throws, None, "finish"));
        assert!(!call_logged(&throws, Some(&JsValue::from_str("{}")), "event"));
    }

    #[wasm_bindgen_test]
    fn test_call_logged_passes_argument() {
        let echo = js_sys::Function::new_with_args("value", "if (value !== 'x') throw value;");
        assert!(call_logged(&echo, Some(&JsValue::from_str("x")), "state"));
        assert!(!call_logged(&echo, Some(&JsValue::from_str("y")), "state"));
    }

    #[wasm_bindgen_test]
    fn test_describe_string_error() {
        assert_eq!(describe(&JsValue::from_str("nope")), "nope");
    }
}
