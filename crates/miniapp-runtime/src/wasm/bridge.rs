//! Permission bridge backed by a JS callback

use std::rc::Rc;

use miniapp_core::{AppId, SharedContainer};
use tracing::warn;
use wasm_bindgen::JsValue;

use super::container::DomContainerHost;
use super::describe;
use crate::bridge::PermissionBridge;

/// Calls `callback(iframe, appId, name, permissions)` once per mounted
/// container
pub struct JsBridge {
    callback: js_sys::Function,
    host: Rc<DomContainerHost>,
}

impl JsBridge {
    pub fn new(callback: js_sys::Function, host: Rc<DomContainerHost>) -> Self {
        Self { callback, host }
    }
}

impl PermissionBridge for JsBridge {
    fn attach(&self, _container: &SharedContainer, app_id: &AppId, name: &str, permissions: &[String]) {
        let iframe: JsValue = self
            .host
            .iframe(app_id)
            .map(JsValue::from)
            .unwrap_or(JsValue::NULL);
        let granted: js_sys::Array = permissions.iter().map(|p| JsValue::from_str(p)).collect();
        let args = js_sys::Array::of4(
            &iframe,
            &JsValue::from_str(app_id.as_str()),
            &JsValue::from_str(name),
            &granted,
        );
        if let Err(err) = self.callback.apply(&JsValue::NULL, &args) {
            warn!(app_id = %app_id, error = %describe(&err), "bridge attach failed");
        }
    }
}
