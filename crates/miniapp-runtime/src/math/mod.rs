//! Geometry types for frame capture and window layout
//!
//! All values are CSS pixels as reported by the layout engine.

mod insets;
mod rect;

pub use insets::SafeAreaInsets;
pub use rect::Rect;
