//! Window stack backed by a JS registry object
//!
//! The registry is expected to expose `isStackRegistered(surface)`,
//! `getSlot(surface, appId)`, `getOrCreateSlot(surface, appId)` and
//! `setSlotInteractive(surface, appId, interactive)`. Slots are DOM elements.

use std::any::Any;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use miniapp_core::{AppId, MountSlot, SurfaceId};
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Element;

use super::describe;
use crate::stack::WindowStack;

pub struct JsWindowStack {
    registry: JsValue,
    /// Slots handed out so far, so repeated lookups keep their identity
    slots: RefCell<BTreeMap<(SurfaceId, AppId), MountSlot>>,
}

impl JsWindowStack {
    pub fn new(registry: JsValue) -> Self {
        Self {
            registry,
            slots: RefCell::new(BTreeMap::new()),
        }
    }

    fn call(&self, method: &str, args: &[JsValue]) -> Option<JsValue> {
        let function = js_sys::Reflect::get(&self.registry, &JsValue::from_str(method))
            .ok()
            .and_then(|f| f.dyn_into::<js_sys::Function>().ok());
        let function = match function {
            Some(function) => function,
            None => {
                warn!(method, "window stack method missing");
                return None;
            }
        };
        let args: js_sys::Array = args.iter().collect();
        match function.apply(&self.registry, &args) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(method, error = %describe(&err), "window stack call failed");
                None
            }
        }
    }

    fn slot_from(&self, desktop: &SurfaceId, app_id: &AppId, value: Option<JsValue>) -> Option<MountSlot> {
        let element = value?.dyn_into::<Element>().ok()?;
        let key = (desktop.clone(), app_id.clone());
        let mut slots = self.slots.borrow_mut();

        let cached = slots.get(&key).filter(|slot| {
            slot.node
                .as_ref()
                .and_then(|node| node.downcast_ref::<Element>())
                .is_some_and(|known| *known == element)
        });
        if let Some(slot) = cached {
            return Some(slot.clone());
        }

        let node: Rc<dyn Any> = Rc::new(element);
        let slot = MountSlot {
            desktop: desktop.clone(),
            app_id: app_id.clone(),
            node: Some(node),
        };
        slots.insert(key, slot.clone());
        Some(slot)
    }
}

impl WindowStack for JsWindowStack {
    fn is_stack_registered(&self, desktop: &SurfaceId) -> bool {
        self.call("isStackRegistered", &[JsValue::from_str(desktop.as_str())])
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }

    fn get_slot(&self, desktop: &SurfaceId, app_id: &AppId) -> Option<MountSlot> {
        let value = self.call(
            "getSlot",
            &[JsValue::from_str(desktop.as_str()), JsValue::from_str(app_id.as_str())],
        );
        self.slot_from(desktop, app_id, value)
    }

    fn get_or_create_slot(&self, desktop: &SurfaceId, app_id: &AppId) -> Option<MountSlot> {
        let value = self.call(
            "getOrCreateSlot",
            &[JsValue::from_str(desktop.as_str()), JsValue::from_str(app_id.as_str())],
        );
        self.slot_from(desktop, app_id, value)
    }

    fn set_slot_interactive(&self, desktop: &SurfaceId, app_id: &AppId, interactive: bool) {
        self.call(
            "setSlotInteractive",
            &[
                JsValue::from_str(desktop.as_str()),
                JsValue::from_str(app_id.as_str()),
                JsValue::from_bool(interactive),
            ],
        );
    }
}
