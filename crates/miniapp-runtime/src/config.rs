//! Runtime configuration

use serde::{Deserialize, Serialize};

use miniapp_core::{DEFAULT_MAX_BACKGROUND_APPS, DEFAULT_SPLASH_TIMEOUT_MS};

use crate::error::ConfigError;
use crate::motion::MotionConfig;

/// What happens when a splash screen outlives its timeout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SplashTimeoutPolicy {
    /// Force-activate the app
    #[default]
    Activate,
    /// Only log the expiry
    Advisory,
}

/// Runtime configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeConfig {
    /// Warm background instances kept before LRU eviction
    pub max_background_apps: usize,
    /// Splash timeout for manifests that do not set one
    pub default_splash_timeout_ms: u64,
    pub splash_timeout_policy: SplashTimeoutPolicy,
    /// Base for resolving relative manifest urls
    pub base_url: String,
    /// Locale passed to containers as a context parameter
    pub locale: Option<String>,
    pub motion: MotionConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_background_apps: DEFAULT_MAX_BACKGROUND_APPS,
            default_splash_timeout_ms: DEFAULT_SPLASH_TIMEOUT_MS,
            splash_timeout_policy: SplashTimeoutPolicy::default(),
            base_url: "http://localhost/".to_string(),
            locale: None,
            motion: MotionConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_splash_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "defaultSplashTimeoutMs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if let Err(e) = url::Url::parse(&self.base_url) {
            return Err(ConfigError::Invalid {
                field: "baseUrl",
                reason: e.to_string(),
            });
        }
        if !self.motion.is_valid() {
            return Err(ConfigError::Invalid {
                field: "motion",
                reason: format!(
                    "durations must be within 1..={} ms",
                    MotionConfig::MAX_DURATION_MS
                ),
            });
        }
        Ok(())
    }
}
