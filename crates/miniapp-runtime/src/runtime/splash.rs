//! Splash screen timers
//!
//! A deadline is armed when an app enters `splash` and cancelled as soon as
//! it leaves. `tick` fires the deadlines that have passed.

use std::collections::BTreeMap;

use miniapp_core::{AppId, MiniappState, Readiness, Timestamp};
use tracing::{info, warn};

use super::MiniappRuntime;
use crate::config::SplashTimeoutPolicy;

/// Pending splash deadlines keyed by app
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SplashTimers {
    deadlines: BTreeMap<AppId, Timestamp>,
}

impl SplashTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm (or re-arm) the deadline for an app
    pub fn arm(&mut self, app_id: AppId, deadline: Timestamp) {
        self.deadlines.insert(app_id, deadline);
    }

    /// Cancel an app's deadline. Returns `true` if one was pending.
    pub fn cancel(&mut self, app_id: &str) -> bool {
        self.deadlines.remove(app_id).is_some()
    }

    /// Keep only the deadlines whose app satisfies `keep`
    pub(super) fn retain(&mut self, keep: impl Fn(&AppId) -> bool) {
        self.deadlines.retain(|app_id, _| keep(app_id));
    }

    pub fn deadline(&self, app_id: &str) -> Option<Timestamp> {
        self.deadlines.get(app_id).copied()
    }

    /// Remove and return every app whose deadline is at or before `now`,
    /// earliest first
    pub fn take_expired(&mut self, now: Timestamp) -> Vec<AppId> {
        let mut expired: Vec<(Timestamp, AppId)> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, deadline)| (*deadline, id.clone()))
            .collect();
        expired.sort();
        for (_, id) in &expired {
            self.deadlines.remove(id);
        }
        expired.into_iter().map(|(_, id)| id).collect()
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}

impl MiniappRuntime {
    /// Arm the splash deadline for an app that just entered `splash`
    pub(super) fn arm_splash(&mut self, app_id: &AppId, now: Timestamp) {
        let state = self.store.get();
        let timeout = state
            .app(app_id.as_str())
            .and_then(|app| app.manifest.splash_timeout(self.config.default_splash_timeout_ms));
        if let Some(timeout) = timeout {
            self.splash.arm(app_id.clone(), now.saturating_add(timeout));
        }
    }

    /// Fire expired splash deadlines.
    ///
    /// Returns the apps whose deadline expired while still in `splash`.
    pub fn tick(&mut self, now: Timestamp) -> Vec<AppId> {
        let mut fired = Vec::new();
        for app_id in self.splash.take_expired(now) {
            let state = self.store.get();
            let app = match state.app(app_id.as_str()) {
                Some(app) if app.state == MiniappState::Splash => app,
                _ => continue,
            };

            match self.config.splash_timeout_policy {
                SplashTimeoutPolicy::Activate => {
                    if app.readiness == Readiness::NotReady {
                        warn!(app_id = %app_id, "splash timed out before ready, activating");
                    } else {
                        info!(app_id = %app_id, "splash timed out, activating");
                    }
                    self.activate_app(app_id.as_str());
                }
                SplashTimeoutPolicy::Advisory => {
                    warn!(app_id = %app_id, readiness = ?app.readiness, "splash timed out");
                }
            }
            fired.push(app_id);
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_expired_in_deadline_order() {
        let mut timers = SplashTimers::new();
        timers.arm(AppId::from("a"), 300);
        timers.arm(AppId::from("b"), 100);
        timers.arm(AppId::from("c"), 900);

        assert_eq!(timers.take_expired(300), vec![AppId::from("b"), AppId::from("a")]);
        assert_eq!(timers.len(), 1);
        assert!(timers.take_expired(300).is_empty());
    }

    #[test]
    fn test_retain() {
        let mut timers = SplashTimers::new();
        timers.arm(AppId::from("a"), 10);
        timers.arm(AppId::from("b"), 20);
        timers.retain(|id| id.as_str() == "b");
        assert_eq!(timers.deadline("a"), None);
        assert_eq!(timers.deadline("b"), Some(20));
    }

    #[test]
    fn test_cancel() {
        let mut timers = SplashTimers::new();
        timers.arm(AppId::from("a"), 10);
        assert!(timers.cancel("a"));
        assert!(!timers.cancel("a"));
        assert!(timers.is_empty());
    }
}
