//! Frame capture
//!
//! A frame is a geometry and style snapshot of one element at one moment.
//! Capturing goes through [`LayoutProbe`] so the math stays testable
//! without a browser.

use serde::{Deserialize, Serialize};

use super::ICON_RADIUS_RATIO;
use crate::math::{Rect, SafeAreaInsets};

/// Geometry and style snapshot
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub rect: Rect,
    pub opacity: f64,
    pub border_radius: f64,
}

impl Frame {
    /// Fully opaque frame with square corners
    pub const fn from_rect(rect: Rect) -> Self {
        Self {
            rect,
            opacity: 1.0,
            border_radius: 0.0,
        }
    }
}

/// The two ends of a FLIP animation
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlipFrames {
    /// Where the element starts (for example the launcher icon)
    pub first: Frame,
    /// Where the element ends once laid out (the window)
    pub last: Frame,
}

impl FlipFrames {
    /// Create a frame pair
    pub const fn new(first: Frame, last: Frame) -> Self {
        Self { first, last }
    }
}

/// Read-only view of the platform layout engine
pub trait LayoutProbe {
    /// Platform element type
    type Element;

    /// Bounding box in viewport coordinates
    fn bounding_rect(&self, element: &Self::Element) -> Rect;

    /// Computed opacity
    fn opacity(&self, element: &Self::Element) -> f64;

    /// Computed border radius in pixels, `None` when the element has none
    fn border_radius(&self, element: &Self::Element) -> Option<f64>;

    /// Viewport size as `(inner_width, inner_height)`
    fn viewport_size(&self) -> (f64, f64);

    /// Resolve a CSS length expression (`calc(...)`, `var(...)`, `env(...)`)
    /// to pixels by measuring a temporarily inserted probe element
    fn measure_length(&self, expression: &str) -> f64;
}

/// Capture an element's frame
pub fn capture_frame<P: LayoutProbe>(probe: &P, element: &P::Element) -> Frame {
    Frame {
        rect: probe.bounding_rect(element),
        opacity: probe.opacity(element),
        border_radius: probe.border_radius(element).unwrap_or(0.0),
    }
}

/// Capture a launcher icon's frame.
///
/// Icons without an explicit radius get the conventional rounding of 22% of
/// their width.
pub fn capture_icon_frame<P: LayoutProbe>(probe: &P, element: &P::Element) -> Frame {
    let rect = probe.bounding_rect(element);
    let border_radius = probe
        .border_radius(element)
        .filter(|r| *r > 0.0)
        .unwrap_or(rect.width * ICON_RADIUS_RATIO);
    Frame {
        rect,
        opacity: probe.opacity(element),
        border_radius,
    }
}

/// Destination rect of a full-window presentation.
///
/// Horizontally the viewport minus the left/right insets; vertically minus
/// the top inset and the bottom reservation, which is the larger of the
/// bottom inset and the measured bottom bar.
pub fn compute_window_frame<P: LayoutProbe>(
    probe: &P,
    insets: &SafeAreaInsets,
    bottom_bar_expression: &str,
) -> Rect {
    let (width, height) = probe.viewport_size();
    let bar = probe.measure_length(bottom_bar_expression);
    let bottom = insets.bottom.max(if bar.is_finite() { bar } else { 0.0 });

    Rect::new(
        insets.left,
        insets.top,
        (width - insets.left - insets.right).max(0.0),
        (height - insets.top - bottom).max(0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flip::BOTTOM_BAR_EXPRESSION;
    use crate::testing::FakeLayout;

    #[test]
    fn test_capture_frame() {
        let layout = FakeLayout::new(375.0, 812.0).with_element(
            "card",
            Rect::new(10.0, 20.0, 100.0, 50.0),
            0.5,
            Some(8.0),
        );
        let frame = capture_frame(&layout, &"card".to_string());
        assert_eq!(frame.rect, Rect::new(10.0, 20.0, 100.0, 50.0));
        assert_eq!(frame.opacity, 0.5);
        assert_eq!(frame.border_radius, 8.0);
    }

    #[test]
    fn test_capture_icon_frame_default_radius() {
        let layout = FakeLayout::new(375.0, 812.0)
            .with_element("icon", Rect::new(0.0, 0.0, 60.0, 60.0), 1.0, None)
            .with_element("flat", Rect::new(0.0, 0.0, 50.0, 50.0), 1.0, Some(0.0))
            .with_element("round", Rect::new(0.0, 0.0, 60.0, 60.0), 1.0, Some(30.0));

        let icon = capture_icon_frame(&layout, &"icon".to_string());
        assert!((icon.border_radius - 13.2).abs() < 1e-9);
        let flat = capture_icon_frame(&layout, &"flat".to_string());
        assert!((flat.border_radius - 11.0).abs() < 1e-9);
        let round = capture_icon_frame(&layout, &"round".to_string());
        assert_eq!(round.border_radius, 30.0);
    }

    #[test]
    fn test_window_frame_subtracts_insets() {
        let layout = FakeLayout::new(375.0, 812.0);
        let insets = SafeAreaInsets::new(44.0, 34.0, 0.0, 0.0);
        let rect = compute_window_frame(&layout, &insets, BOTTOM_BAR_EXPRESSION);
        assert_eq!(rect.y, 44.0);
        assert_eq!(rect.height, 812.0 - 44.0 - 34.0);
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.width, 375.0);
    }

    #[test]
    fn test_window_frame_reserves_bottom_bar() {
        let layout = FakeLayout::new(400.0, 800.0).with_length(BOTTOM_BAR_EXPRESSION, 56.0);
        let insets = SafeAreaInsets::new(20.0, 34.0, 8.0, 12.0);
        let rect = compute_window_frame(&layout, &insets, BOTTOM_BAR_EXPRESSION);
        assert_eq!(rect, Rect::new(8.0, 20.0, 380.0, 800.0 - 20.0 - 56.0));
    }
}
