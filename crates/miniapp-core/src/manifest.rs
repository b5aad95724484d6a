//! Mini-app manifest
//!
//! Manifests are supplied by the host; the runtime only reads them.

use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{AppId, SurfaceId};

/// Splash timeout used when the manifest does not set one
pub const DEFAULT_SPLASH_TIMEOUT_MS: u64 = 5000;

/// Splash screen configuration
///
/// Accepts either a boolean (`"splashScreen": true`) or an options object
/// (`"splashScreen": { "timeout": 3000 }`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SplashScreenConfig {
    Enabled(bool),
    Options {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timeout: Option<u64>,
    },
}

/// Manifest describing one mini-app
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniappManifest {
    /// Unique identifier
    pub id: AppId,
    /// Display name
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    /// Entry URL, absolute or relative to the runtime base URL
    pub url: String,
    #[serde(default)]
    pub version: String,
    /// Preferred surface to present on
    #[serde(default)]
    pub target_desktop: SurfaceId,
    /// Permissions requested from the bridge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splash_screen: Option<SplashScreenConfig>,
}

/// Manifest validation errors
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ManifestError {
    #[error("manifest id is empty")]
    EmptyId,
    #[error("manifest {0} has no url")]
    EmptyUrl(AppId),
    #[error("manifest {0} has a zero splash timeout")]
    ZeroSplashTimeout(AppId),
}

impl MiniappManifest {
    /// Minimal manifest with no splash screen on the main surface
    pub fn new(id: impl Into<AppId>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            icon: String::new(),
            url: url.into(),
            version: String::new(),
            target_desktop: SurfaceId::main(),
            permissions: None,
            splash_screen: None,
        }
    }

    /// Builder: enable the splash screen with an optional timeout
    pub fn with_splash(mut self, timeout: Option<u64>) -> Self {
        self.splash_screen = Some(SplashScreenConfig::Options { timeout });
        self
    }

    /// Builder: present on a different surface
    pub fn with_desktop(mut self, desktop: SurfaceId) -> Self {
        self.target_desktop = desktop;
        self
    }

    /// Builder: request bridge permissions
    pub fn with_permissions(mut self, permissions: Vec<String>) -> Self {
        self.permissions = Some(permissions);
        self
    }

    /// Whether the app shows a splash screen while loading
    pub fn has_splash_screen(&self) -> bool {
        match self.splash_screen {
            None | Some(SplashScreenConfig::Enabled(false)) => false,
            Some(SplashScreenConfig::Enabled(true)) | Some(SplashScreenConfig::Options { .. }) => {
                true
            }
        }
    }

    /// Splash timeout in milliseconds, or `None` without a splash screen
    pub fn splash_timeout(&self, default_ms: u64) -> Option<u64> {
        match self.splash_screen {
            Some(SplashScreenConfig::Options { timeout: Some(ms) }) => Some(ms),
            _ if self.has_splash_screen() => Some(default_ms),
            _ => None,
        }
    }

    /// Requested permissions (empty when none)
    pub fn permissions(&self) -> &[String] {
        self.permissions.as_deref().unwrap_or(&[])
    }

    /// Check required fields
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.id.as_str().trim().is_empty() {
            return Err(ManifestError::EmptyId);
        }
        if self.url.trim().is_empty() {
            return Err(ManifestError::EmptyUrl(self.id.clone()));
        }
        if let Some(SplashScreenConfig::Options { timeout: Some(0) }) = self.splash_screen {
            return Err(ManifestError::ZeroSplashTimeout(self.id.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splash_boolean_form() {
        let json = r#"{"id":"a","name":"A","url":"/a","splashScreen":true}"#;
        let manifest: MiniappManifest = serde_json::from_str(json).unwrap();
        assert!(manifest.has_splash_screen());
        assert_eq!(manifest.splash_timeout(DEFAULT_SPLASH_TIMEOUT_MS), Some(5000));
    }

    #[test]
    fn test_splash_options_form() {
        let json = r#"{"id":"a","name":"A","url":"/a","splashScreen":{"timeout":1200}}"#;
        let manifest: MiniappManifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.splash_timeout(DEFAULT_SPLASH_TIMEOUT_MS), Some(1200));

        let json = r#"{"id":"a","name":"A","url":"/a","splashScreen":{}}"#;
        let manifest: MiniappManifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.splash_timeout(DEFAULT_SPLASH_TIMEOUT_MS), Some(5000));
    }

    #[test]
    fn test_no_splash() {
        let manifest = MiniappManifest::new("a", "A", "/a");
        assert!(!manifest.has_splash_screen());
        assert_eq!(manifest.splash_timeout(DEFAULT_SPLASH_TIMEOUT_MS), None);

        let json = r#"{"id":"a","name":"A","url":"/a","splashScreen":false}"#;
        let manifest: MiniappManifest = serde_json::from_str(json).unwrap();
        assert!(!manifest.has_splash_screen());
    }

    #[test]
    fn test_defaults_to_main_surface() {
        let json = r#"{"id":"a","name":"A","url":"/a"}"#;
        let manifest: MiniappManifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.target_desktop, SurfaceId::main());
        assert!(manifest.permissions().is_empty());
    }

    #[test]
    fn test_validate() {
        assert!(MiniappManifest::new("a", "A", "/a").validate().is_ok());
        assert_eq!(
            MiniappManifest::new("", "A", "/a").validate(),
            Err(ManifestError::EmptyId)
        );
        assert_eq!(
            MiniappManifest::new("a", "A", " ").validate(),
            Err(ManifestError::EmptyUrl(AppId::from("a")))
        );
        assert_eq!(
            MiniappManifest::new("a", "A", "/a").with_splash(Some(0)).validate(),
            Err(ManifestError::ZeroSplashTimeout(AppId::from("a")))
        );
    }
}
