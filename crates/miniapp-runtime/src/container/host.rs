//! Platform container factory

use miniapp_core::{AppId, SharedContainer};

use crate::error::ContainerError;

/// Everything the platform needs to build one container
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerSpec {
    pub app_id: AppId,
    /// Fully resolved source URL including context parameters
    pub src: String,
    /// `sandbox` attribute value
    pub sandbox: &'static str,
}

/// Creates containers and owns the visible and off-screen regions
pub trait ContainerHost {
    /// Build a container. New containers start in the off-screen region.
    fn create(&self, spec: &ContainerSpec) -> Result<SharedContainer, ContainerError>;
}
