//! Iframe containers in two DOM regions

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use miniapp_core::{AppId, ContainerHandle, ContainerType, MountSlot, SharedContainer};
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlIFrameElement};

use super::describe;
use crate::container::{ContainerHost, ContainerSpec, BLANK_SOURCE};
use crate::error::ContainerError;

const VISIBLE_REGION_STYLE: &str = "position: fixed; inset: 0; pointer-events: none;";
const OFFSCREEN_REGION_STYLE: &str = "position: fixed; left: -200vw; top: 0; width: 100vw; \
     height: 100vh; visibility: hidden; pointer-events: none; overflow: hidden;";
const IFRAME_STYLE: &str = "border: 0; width: 100%; height: 100%; display: block; pointer-events: auto;";

type IframeRegistry = Rc<RefCell<BTreeMap<AppId, HtmlIFrameElement>>>;

fn platform(err: wasm_bindgen::JsValue) -> ContainerError {
    ContainerError::Platform(describe(&err))
}

/// Owns the visible and off-screen regions and builds iframes in them
pub struct DomContainerHost {
    document: Document,
    visible: Element,
    offscreen: Element,
    iframes: IframeRegistry,
}

impl DomContainerHost {
    /// Use existing region elements
    pub fn new(document: Document, visible: Element, offscreen: Element) -> Self {
        Self {
            document,
            visible,
            offscreen,
            iframes: Rc::new(RefCell::new(BTreeMap::new())),
        }
    }

    /// Create both regions under `<body>`
    pub fn install(document: Document) -> Result<Self, ContainerError> {
        let body = document
            .body()
            .ok_or_else(|| ContainerError::Platform("document has no body".to_string()))?;

        let visible = document.create_element("div").map_err(platform)?;
        visible.set_id("miniapp-visible-region");
        visible.set_attribute("style", VISIBLE_REGION_STYLE).map_err(platform)?;

        let offscreen = document.create_element("div").map_err(platform)?;
        offscreen.set_id("miniapp-offscreen-region");
        offscreen.set_attribute("style", OFFSCREEN_REGION_STYLE).map_err(platform)?;
        offscreen.set_attribute("aria-hidden", "true").map_err(platform)?;

        body.append_child(&visible).map_err(platform)?;
        body.append_child(&offscreen).map_err(platform)?;
        Ok(Self::new(document, visible, offscreen))
    }

    /// Live iframe for an app, if its container has not been destroyed
    pub fn iframe(&self, app_id: &AppId) -> Option<HtmlIFrameElement> {
        self.iframes.borrow().get(app_id).cloned()
    }
}

impl ContainerHost for DomContainerHost {
    fn create(&self, spec: &ContainerSpec) -> Result<SharedContainer, ContainerError> {
        let iframe: HtmlIFrameElement = self
            .document
            .create_element("iframe")
            .map_err(platform)?
            .dyn_into()
            .map_err(|_| ContainerError::Platform("created element is not an iframe".to_string()))?;

        iframe.set_attribute("sandbox", spec.sandbox).map_err(platform)?;
        iframe.set_attribute("style", IFRAME_STYLE).map_err(platform)?;
        iframe
            .set_attribute("data-miniapp-id", spec.app_id.as_str())
            .map_err(platform)?;
        iframe.set_src(&spec.src);
        self.offscreen.append_child(&iframe).map_err(platform)?;

        self.iframes
            .borrow_mut()
            .insert(spec.app_id.clone(), iframe.clone());

        let container = Rc::new(DomContainer {
            app_id: spec.app_id.clone(),
            iframe,
            visible: self.visible.clone(),
            offscreen: self.offscreen.clone(),
            mount: RefCell::new(None),
            registry: Rc::clone(&self.iframes),
        });
        let shared: SharedContainer = container;
        Ok(shared)
    }
}

/// One iframe container
pub struct DomContainer {
    app_id: AppId,
    iframe: HtmlIFrameElement,
    visible: Element,
    offscreen: Element,
    mount: RefCell<Option<MountSlot>>,
    registry: IframeRegistry,
}

impl DomContainer {
    pub fn iframe(&self) -> &HtmlIFrameElement {
        &self.iframe
    }

    /// Slot element, or the visible region when no slot is set
    fn foreground_parent(&self) -> Element {
        self.mount
            .borrow()
            .as_ref()
            .and_then(|slot| slot.node.as_ref())
            .and_then(|node| node.downcast_ref::<Element>())
            .cloned()
            .unwrap_or_else(|| self.visible.clone())
    }

    fn is_offscreen(&self) -> bool {
        self.iframe
            .parent_element()
            .is_some_and(|parent| parent == self.offscreen)
    }

    fn reparent(&self, parent: &Element) {
        if let Err(err) = parent.append_child(&self.iframe) {
            warn!(app_id = %self.app_id, error = %describe(&err), "container relocation failed");
        }
    }
}

impl ContainerHandle for DomContainer {
    fn container_type(&self) -> ContainerType {
        ContainerType::Iframe
    }

    fn move_to_foreground(&self) {
        let parent = self.foreground_parent();
        if self.iframe.parent_element().as_ref() != Some(&parent) {
            self.reparent(&parent);
        }
    }

    fn move_to_background(&self) {
        if !self.is_offscreen() {
            self.reparent(&self.offscreen);
        }
    }

    fn set_mount_target(&self, slot: &MountSlot) {
        *self.mount.borrow_mut() = Some(slot.clone());
        if self.iframe.is_connected() && !self.is_offscreen() {
            let parent = self.foreground_parent();
            self.reparent(&parent);
        }
    }

    fn mount_target(&self) -> Option<MountSlot> {
        self.mount.borrow().clone()
    }

    fn destroy(&self) {
        self.iframe.set_src(BLANK_SOURCE);
        self.iframe.remove();
        *self.mount.borrow_mut() = None;

        let mut registry = self.registry.borrow_mut();
        if registry.get(&self.app_id) == Some(&self.iframe) {
            registry.remove(&self.app_id);
        }
    }

    fn is_connected(&self) -> bool {
        self.iframe.is_connected()
    }
}
