//! Core runtime types (AppId, SurfaceId, lifecycle enums)

use alloc::string::String;
use core::borrow::Borrow;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Milliseconds since the clock epoch
pub type Timestamp = u64;

/// Unique mini-app identifier (the manifest id)
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(pub String);

impl AppId {
    /// Create an app id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AppId {
    fn from(id: &str) -> Self {
        Self(String::from(id))
    }
}

impl From<String> for AppId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for AppId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named presentation surface ("desktop") that hosts mini-app windows
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(pub String);

impl SurfaceId {
    /// Name of the primary surface
    pub const MAIN: &'static str = "main";
    /// Name of the multi-app overview surface
    pub const STACK: &'static str = "stack";

    /// Create a surface id
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The primary surface
    pub fn main() -> Self {
        Self::new(Self::MAIN)
    }

    /// Borrow the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::main()
    }
}

impl From<&str> for SurfaceId {
    fn from(name: &str) -> Self {
        Self(String::from(name))
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Logical lifecycle state of a mini-app instance
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MiniappState {
    /// Instance created, container not yet shown
    #[default]
    Preparing,
    /// Content loading without a splash screen
    Launching,
    /// Splash screen displayed while content loads
    Splash,
    /// Interactive foreground app
    Active,
    /// Kept warm off-screen
    Background,
    /// Dismiss in progress
    Closing,
}

/// Directional animation hint layered on top of [`MiniappState`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MiniappFlow {
    #[default]
    Closed,
    Opening,
    Splash,
    Opened,
    Backgrounding,
    Backgrounded,
    Foregrounding,
    Closing,
}

impl MiniappFlow {
    /// Whether this flow is still waiting for an animation to finish
    #[inline]
    pub fn is_directional(&self) -> bool {
        matches!(
            self,
            MiniappFlow::Opening | MiniappFlow::Backgrounding | MiniappFlow::Foregrounding
        )
    }
}

/// Whether the hosted content finished its initial load
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProcessStatus {
    #[default]
    Loading,
    Loaded,
}

/// One-way readiness gate reported by the hosted content
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Readiness {
    #[default]
    NotReady,
    Ready,
}

/// Presentation slot state on a surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PresentationState {
    #[default]
    Hidden,
    Presenting,
    Presented,
    Dismissing,
}

/// Kind of presentation transition in flight
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransitionKind {
    Present,
    Dismiss,
}

/// Kind of browsing container hosting an app
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContainerType {
    #[default]
    Iframe,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;

    #[test]
    fn test_app_id_borrows_as_str() {
        let mut map = BTreeMap::new();
        map.insert(AppId::from("wallet"), 1);
        assert_eq!(map.get("wallet"), Some(&1));
    }

    #[test]
    fn test_directional_flows() {
        assert!(MiniappFlow::Opening.is_directional());
        assert!(MiniappFlow::Foregrounding.is_directional());
        assert!(!MiniappFlow::Opened.is_directional());
        assert!(!MiniappFlow::Closing.is_directional());
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let json = serde_json::to_string(&MiniappState::Background).unwrap();
        assert_eq!(json, "\"background\"");
        let json = serde_json::to_string(&Readiness::NotReady).unwrap();
        assert_eq!(json, "\"notReady\"");
    }
}
