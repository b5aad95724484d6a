//! Permission / messaging bridge hook
//!
//! The bridge itself lives outside the runtime. It is attached once per
//! container, right after the container is mounted.

use miniapp_core::{AppId, SharedContainer};

/// Collaborator that wires a container into the host messaging layer
pub trait PermissionBridge {
    fn attach(&self, container: &SharedContainer, app_id: &AppId, name: &str, permissions: &[String]);
}

/// Bridge that attaches nothing
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopBridge;

impl PermissionBridge for NoopBridge {
    fn attach(&self, _container: &SharedContainer, _app_id: &AppId, _name: &str, _permissions: &[String]) {}
}
