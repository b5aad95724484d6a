//! Error types for the runtime boundary
//!
//! The state machine itself cannot fail; errors only come from manifests,
//! configuration, and the platform.

use miniapp_core::{AppId, ManifestError, SurfaceId};
use thiserror::Error;

/// Container creation and platform failures
#[derive(Debug, Error)]
pub enum ContainerError {
    /// The manifest URL could not be resolved
    #[error("invalid container url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The platform refused an operation
    #[error("platform error: {0}")]
    Platform(String),
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Errors returned by runtime operations
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("unknown app {0}")]
    UnknownApp(AppId),

    #[error("app {0} is already running")]
    AlreadyRunning(AppId),

    #[error("surface {0} is not registered")]
    UnknownSurface(SurfaceId),

    #[error("snapshot serialization failed: {0}")]
    Snapshot(#[source] serde_json::Error),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Container(#[from] ContainerError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;
