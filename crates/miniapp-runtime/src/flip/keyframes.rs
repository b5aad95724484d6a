//! Keyframe generation

use serde::{Deserialize, Serialize};

use super::frame::{FlipFrames, Frame};
use super::transform::{compute_invert_transform, IDENTITY_TRANSFORM};

/// One stop of a Web Animations keyframe list
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyframe {
    pub offset: f64,
    pub transform: String,
    pub opacity: f64,
    /// CSS length (`"13.2px"`)
    pub border_radius: String,
}

impl Keyframe {
    fn at(offset: f64, transform: String, frame: &Frame) -> Self {
        Self {
            offset,
            transform,
            opacity: frame.opacity,
            border_radius: format!("{}px", frame.border_radius),
        }
    }
}

/// Opening keyframes: from the inverted `first` position to identity
pub fn generate_keyframes(frames: &FlipFrames) -> Vec<Keyframe> {
    let inverted = compute_invert_transform(&frames.first.rect, &frames.last.rect).to_css();
    vec![
        Keyframe::at(0.0, inverted, &frames.first),
        Keyframe::at(1.0, IDENTITY_TRANSFORM.to_string(), &frames.last),
    ]
}

/// Closing keyframes: the opening list played backwards
pub fn generate_close_keyframes(frames: &FlipFrames) -> Vec<Keyframe> {
    let inverted = compute_invert_transform(&frames.first.rect, &frames.last.rect).to_css();
    vec![
        Keyframe::at(0.0, IDENTITY_TRANSFORM.to_string(), &frames.last),
        Keyframe::at(1.0, inverted, &frames.first),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Rect;

    fn frames() -> FlipFrames {
        FlipFrames::new(
            Frame {
                rect: Rect::new(100.0, 200.0, 60.0, 60.0),
                opacity: 0.5,
                border_radius: 13.2,
            },
            Frame {
                rect: Rect::new(0.0, 0.0, 375.0, 812.0),
                opacity: 1.0,
                border_radius: 0.0,
            },
        )
    }

    #[test]
    fn test_open_keyframes() {
        let keyframes = generate_keyframes(&frames());
        assert_eq!(keyframes.len(), 2);

        assert_eq!(keyframes[0].border_radius, "13.2px");
        assert_eq!(keyframes[0].opacity, 0.5);
        assert!(keyframes[0].transform.starts_with("translate(100px, 200px) scale("));

        assert_eq!(keyframes[1].transform, "translate(0, 0) scale(1, 1)");
        assert_eq!(keyframes[1].border_radius, "0px");
        assert_eq!(keyframes[1].opacity, 1.0);
    }

    #[test]
    fn test_close_keyframes_are_reversed() {
        let open = generate_keyframes(&frames());
        let close = generate_close_keyframes(&frames());
        assert_eq!(close.len(), 2);
        assert_eq!(close[0].transform, open[1].transform);
        assert_eq!(close[0].border_radius, open[1].border_radius);
        assert_eq!(close[1].transform, open[0].transform);
        assert_eq!(close[1].opacity, open[0].opacity);
        assert_eq!(close[0].offset, 0.0);
        assert_eq!(close[1].offset, 1.0);
    }

    #[test]
    fn test_keyframes_serialize_for_web_animations() {
        let json = serde_json::to_value(&generate_keyframes(&frames())[1]).unwrap();
        assert_eq!(json["borderRadius"], "0px");
        assert_eq!(json["transform"], "translate(0, 0) scale(1, 1)");
    }
}
