//! Container lifecycle manager

use std::collections::BTreeMap;
use std::rc::Rc;

use miniapp_core::{AppId, MiniappInstance, MiniappState, MountSlot, SharedContainer};
use tracing::{debug, info};

use super::host::{ContainerHost, ContainerSpec};
use super::source::build_container_url;
use super::CONTAINER_SANDBOX;
use crate::error::ContainerError;

/// Creates, relocates and removes containers.
///
/// The manager is the only writer of the two container regions.
pub struct ContainerManager {
    host: Rc<dyn ContainerHost>,
    base_url: String,
}

impl ContainerManager {
    pub fn new(host: Rc<dyn ContainerHost>, base_url: impl Into<String>) -> Self {
        Self {
            host,
            base_url: base_url.into(),
        }
    }

    /// Build a sandboxed container for `app_id` with context values
    /// appended to its source URL.
    pub fn create_container(
        &self,
        app_id: &AppId,
        url: &str,
        context_params: &[(String, String)],
    ) -> Result<SharedContainer, ContainerError> {
        let src = build_container_url(&self.base_url, url, context_params)?;
        let spec = ContainerSpec {
            app_id: app_id.clone(),
            src,
            sandbox: CONTAINER_SANDBOX,
        };
        let container = self.host.create(&spec)?;
        info!(app_id = %app_id, src = %spec.src, "container created");
        Ok(container)
    }

    /// Mount a container into its slot in the visible region
    pub fn mount_visible(&self, container: &SharedContainer, slot: &MountSlot) {
        let mounted = container
            .mount_target()
            .is_some_and(|current| current.same_target(slot));
        if !mounted {
            container.set_mount_target(slot);
        }
        container.move_to_foreground();
        debug!(app_id = %slot.app_id, desktop = %slot.desktop, "container mounted");
    }

    /// Relocate to the off-screen region without destroying
    pub fn move_to_background(&self, container: &SharedContainer) {
        container.move_to_background();
    }

    /// Relocate back to the visible region
    pub fn move_to_foreground(&self, container: &SharedContainer) {
        container.move_to_foreground();
    }

    /// Blank the source and detach. Not cancellable.
    pub fn remove_container(&self, container: &SharedContainer) {
        container.destroy();
    }

    /// Evict background containers, least recently active first, until at
    /// most `max` remain. Returns the evicted ids in eviction order.
    ///
    /// The caller is responsible for dropping the evicted instances from the
    /// snapshot.
    pub fn enforce_background_limit(
        &self,
        apps: &BTreeMap<AppId, MiniappInstance>,
        active_app_id: Option<&AppId>,
        max: usize,
    ) -> Vec<AppId> {
        let evicted = select_evictions(apps, active_app_id, max);
        for id in &evicted {
            if let Some(container) = apps.get(id).and_then(|app| app.container.as_ref()) {
                self.remove_container(container);
            }
            info!(app_id = %id, "evicted background app");
        }
        evicted
    }
}

/// Pick the background apps to evict so that at most `max` remain.
///
/// Candidates are background instances other than `active_app_id`, ordered
/// by `last_active_at` ascending (ties broken by id).
pub fn select_evictions(
    apps: &BTreeMap<AppId, MiniappInstance>,
    active_app_id: Option<&AppId>,
    max: usize,
) -> Vec<AppId> {
    let mut candidates: Vec<&MiniappInstance> = apps
        .values()
        .filter(|app| app.state == MiniappState::Background)
        .filter(|app| Some(&app.app_id) != active_app_id)
        .collect();

    if candidates.len() <= max {
        return Vec::new();
    }

    candidates.sort_by(|a, b| {
        a.last_active_at
            .cmp(&b.last_active_at)
            .then_with(|| a.app_id.cmp(&b.app_id))
    });
    let excess = candidates.len() - max;
    candidates
        .into_iter()
        .take(excess)
        .map(|app| app.app_id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryContainerHost, Region};
    use miniapp_core::{MiniappManifest, SurfaceId};

    fn background(id: &str, last_active_at: u64) -> (AppId, MiniappInstance) {
        let mut app = MiniappInstance::new(MiniappManifest::new(id, id, "/app"), None, 0);
        app.state = MiniappState::Background;
        app.last_active_at = last_active_at;
        (AppId::from(id), app)
    }

    #[test]
    fn test_select_evictions_oldest_first() {
        let apps: BTreeMap<_, _> = [background("a", 30), background("b", 10), background("c", 20)]
            .into_iter()
            .collect();

        assert_eq!(select_evictions(&apps, None, 1), vec![AppId::from("b"), AppId::from("c")]);
        assert!(select_evictions(&apps, None, 3).is_empty());
    }

    #[test]
    fn test_select_evictions_skips_active_and_foreground() {
        let mut apps: BTreeMap<_, _> = [background("a", 1), background("b", 2)].into_iter().collect();
        let (id, mut active) = background("c", 0);
        active.state = MiniappState::Active;
        apps.insert(id, active);

        assert_eq!(select_evictions(&apps, Some(&AppId::from("a")), 0), vec![AppId::from("b")]);
    }

    #[test]
    fn test_create_container_builds_sandboxed_url() {
        let host = Rc::new(MemoryContainerHost::new());
        let manager = ContainerManager::new(host.clone(), "https://host.example/");
        let params = vec![("appId".to_string(), "swap".to_string())];

        manager
            .create_container(&AppId::from("swap"), "/swap/", &params)
            .unwrap();

        let specs = host.created();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].src, "https://host.example/swap/?appId=swap");
        assert_eq!(specs[0].sandbox, "allow-scripts allow-forms allow-same-origin");
    }

    #[test]
    fn test_relocation_keeps_container_alive() {
        let host = Rc::new(MemoryContainerHost::new());
        let manager = ContainerManager::new(host.clone(), "https://host.example/");
        let id = AppId::from("swap");
        let container = manager.create_container(&id, "/swap/", &[]).unwrap();
        let slot = MountSlot::detached(SurfaceId::main(), id.clone());

        manager.mount_visible(&container, &slot);
        manager.mount_visible(&container, &slot);
        manager.move_to_background(&container);
        manager.move_to_foreground(&container);

        let recorded = host.container(&id).unwrap();
        assert_eq!(recorded.region(), Region::Visible);
        assert_eq!(recorded.mount_count(), 1);
        assert!(container.is_connected());

        manager.remove_container(&container);
        assert_eq!(recorded.region(), Region::Detached);
        assert_eq!(recorded.src(), "about:blank");
        assert!(!container.is_connected());
    }

    #[test]
    fn test_enforce_background_limit_destroys_evicted() {
        let host = Rc::new(MemoryContainerHost::new());
        let manager = ContainerManager::new(host.clone(), "https://host.example/");
        let mut apps = BTreeMap::new();
        for (id, at) in [("a", 5), ("b", 1)] {
            let container = manager.create_container(&AppId::from(id), "/", &[]).unwrap();
            let (key, mut app) = background(id, at);
            app.container = Some(container);
            apps.insert(key, app);
        }

        let evicted = manager.enforce_background_limit(&apps, None, 1);

        assert_eq!(evicted, vec![AppId::from("b")]);
        assert_eq!(host.container(&AppId::from("b")).unwrap().destroy_count(), 1);
        assert_eq!(host.container(&AppId::from("a")).unwrap().destroy_count(), 0);
    }
}
