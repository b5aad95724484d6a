//! DOM layout probe

use tracing::warn;
use web_sys::{Document, Element, Window};

use super::describe;
use crate::flip::LayoutProbe;
use crate::math::Rect;

const PROBE_STYLE: &str = "position: absolute; visibility: hidden; pointer-events: none; \
     left: 0; top: 0; width: 0;";

/// Reads geometry and computed style from the live DOM
pub struct DomLayoutProbe {
    window: Window,
    document: Document,
}

impl DomLayoutProbe {
    pub fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }

    /// Probe for the global window, `None` outside a browser
    pub fn from_global() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self::new(window, document))
    }

    fn computed(&self, element: &Element, property: &str) -> Option<String> {
        self.window
            .get_computed_style(element)
            .ok()
            .flatten()
            .and_then(|style| style.get_property_value(property).ok())
    }
}

/// Parse a computed CSS pixel length (`"12px"`, `"12.5px"`)
fn parse_px(value: &str) -> Option<f64> {
    value.trim().trim_end_matches("px").parse::<f64>().ok()
}

impl LayoutProbe for DomLayoutProbe {
    type Element = Element;

    fn bounding_rect(&self, element: &Element) -> Rect {
        let rect = element.get_bounding_client_rect();
        Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
    }

    fn opacity(&self, element: &Element) -> f64 {
        self.computed(element, "opacity")
            .and_then(|value| value.trim().parse::<f64>().ok())
            .unwrap_or(1.0)
    }

    fn border_radius(&self, element: &Element) -> Option<f64> {
        self.computed(element, "border-top-left-radius")
            .and_then(|value| parse_px(&value))
            .filter(|radius| *radius > 0.0)
    }

    fn viewport_size(&self) -> (f64, f64) {
        let width = self.window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let height = self.window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        (width, height)
    }

    fn measure_length(&self, expression: &str) -> f64 {
        let body = match self.document.body() {
            Some(body) => body,
            None => return 0.0,
        };
        let probe = match self.document.create_element("div") {
            Ok(probe) => probe,
            Err(err) => {
                warn!(error = %describe(&err), "could not create layout probe");
                return 0.0;
            }
        };
        let style = format!("{} height: {};", PROBE_STYLE, expression);
        if probe.set_attribute("style", &style).is_err() || body.append_child(&probe).is_err() {
            return 0.0;
        }
        let height = probe.get_bounding_client_rect().height();
        probe.remove();
        height
    }
}
