//! Scripted layout probe

use std::collections::BTreeMap;

use crate::flip::LayoutProbe;
use crate::math::Rect;

/// Computed geometry and style of a fake element
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FakeElement {
    pub rect: Rect,
    pub opacity: f64,
    pub border_radius: Option<f64>,
}

/// Layout probe answering from fixed tables. Elements are named by string.
#[derive(Clone, Debug)]
pub struct FakeLayout {
    viewport: (f64, f64),
    elements: BTreeMap<String, FakeElement>,
    lengths: BTreeMap<String, f64>,
}

impl FakeLayout {
    pub fn new(inner_width: f64, inner_height: f64) -> Self {
        Self {
            viewport: (inner_width, inner_height),
            elements: BTreeMap::new(),
            lengths: BTreeMap::new(),
        }
    }

    pub fn with_element(mut self, name: &str, rect: Rect, opacity: f64, border_radius: Option<f64>) -> Self {
        self.elements.insert(
            name.to_string(),
            FakeElement {
                rect,
                opacity,
                border_radius,
            },
        );
        self
    }

    /// Pixel value a length expression measures to
    pub fn with_length(mut self, expression: &str, px: f64) -> Self {
        self.lengths.insert(expression.to_string(), px);
        self
    }
}

impl LayoutProbe for FakeLayout {
    type Element = String;

    fn bounding_rect(&self, element: &String) -> Rect {
        self.elements.get(element).map_or(Rect::ZERO, |e| e.rect)
    }

    fn opacity(&self, element: &String) -> f64 {
        self.elements.get(element).map_or(1.0, |e| e.opacity)
    }

    fn border_radius(&self, element: &String) -> Option<f64> {
        self.elements.get(element).and_then(|e| e.border_radius)
    }

    fn viewport_size(&self) -> (f64, f64) {
        self.viewport
    }

    fn measure_length(&self, expression: &str) -> f64 {
        self.lengths.get(expression).copied().unwrap_or(0.0)
    }
}
