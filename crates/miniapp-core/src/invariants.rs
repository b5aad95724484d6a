//! Runtime invariants
//!
//! Checked after every orchestration operation in debug builds and by the
//! test suites.
//!
//! # Invariants
//!
//! 1. **Single active**: at most one instance is `active`
//! 2. **Active id consistency**: `activeAppId`, when set, names an existing
//!    `active` instance, and `focusedAppId` matches it
//! 3. **Background cap**: background instances never exceed
//!    `maxBackgroundApps`
//! 4. **Z-order bound**: no presentation's z-order exceeds `zOrderSeed`
//! 5. **Key consistency**: every presentation belongs to an instance

use alloc::string::String;
use alloc::vec::Vec;

use crate::state::MiniappRuntimeState;
use crate::types::MiniappState;

/// An invariant violation with details
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Name of the violated invariant
    pub invariant: &'static str,
    /// Description of what went wrong
    pub description: String,
}

/// Check all runtime invariants.
///
/// Returns a list of violations (empty if all invariants hold).
pub fn check_all_invariants(state: &MiniappRuntimeState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    violations.extend(check_single_active(state));
    violations.extend(check_active_id_consistency(state));
    violations.extend(check_background_cap(state));
    violations.extend(check_z_order_bound(state));
    violations.extend(check_key_consistency(state));

    violations
}

fn check_single_active(state: &MiniappRuntimeState) -> Vec<InvariantViolation> {
    let active = state.app_ids_in(MiniappState::Active);
    if active.len() <= 1 {
        return Vec::new();
    }
    alloc::vec![InvariantViolation {
        invariant: "single_active",
        description: alloc::format!("{} apps are active: {:?}", active.len(), active),
    }]
}

fn check_active_id_consistency(state: &MiniappRuntimeState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    if let Some(id) = &state.active_app_id {
        match state.apps.get(id) {
            None => violations.push(InvariantViolation {
                invariant: "active_id_consistency",
                description: alloc::format!("activeAppId {} has no instance", id),
            }),
            Some(app) if app.state != MiniappState::Active => {
                violations.push(InvariantViolation {
                    invariant: "active_id_consistency",
                    description: alloc::format!("activeAppId {} is {:?}", id, app.state),
                })
            }
            Some(_) => {}
        }
    }

    if state.focused_app_id != state.active_app_id {
        violations.push(InvariantViolation {
            invariant: "active_id_consistency",
            description: alloc::format!(
                "focusedAppId {:?} differs from activeAppId {:?}",
                state.focused_app_id,
                state.active_app_id
            ),
        });
    }

    violations
}

fn check_background_cap(state: &MiniappRuntimeState) -> Vec<InvariantViolation> {
    let background = state.app_ids_in(MiniappState::Background).len();
    if background <= state.max_background_apps {
        return Vec::new();
    }
    alloc::vec![InvariantViolation {
        invariant: "background_cap",
        description: alloc::format!(
            "{} background apps exceed the cap of {}",
            background,
            state.max_background_apps
        ),
    }]
}

fn check_z_order_bound(state: &MiniappRuntimeState) -> Vec<InvariantViolation> {
    state
        .presentations
        .values()
        .filter(|p| p.z_order > state.z_order_seed)
        .map(|p| InvariantViolation {
            invariant: "z_order_bound",
            description: alloc::format!(
                "presentation {} has z-order {} above seed {}",
                p.app_id,
                p.z_order,
                state.z_order_seed
            ),
        })
        .collect()
}

fn check_key_consistency(state: &MiniappRuntimeState) -> Vec<InvariantViolation> {
    state
        .presentations
        .keys()
        .filter(|id| !state.apps.contains_key(*id))
        .map(|id| InvariantViolation {
            invariant: "key_consistency",
            description: alloc::format!("presentation {} has no instance", id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{MiniappInstance, MiniappPresentation};
    use crate::manifest::MiniappManifest;
    use crate::types::{AppId, SurfaceId};

    fn insert(state: &mut MiniappRuntimeState, id: &str, app_state: MiniappState) {
        let mut instance = MiniappInstance::new(MiniappManifest::new(id, id, "/x"), None, 0);
        instance.state = app_state;
        state.apps.insert(AppId::from(id), instance);
    }

    #[test]
    fn test_empty_state_is_valid() {
        assert!(check_all_invariants(&MiniappRuntimeState::default()).is_empty());
    }

    #[test]
    fn test_two_active_apps() {
        let mut state = MiniappRuntimeState::default();
        insert(&mut state, "a", MiniappState::Active);
        insert(&mut state, "b", MiniappState::Active);
        state.active_app_id = Some(AppId::from("a"));
        state.focused_app_id = Some(AppId::from("a"));

        let violations = check_all_invariants(&state);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].invariant, "single_active");
    }

    #[test]
    fn test_background_cap() {
        let mut state = MiniappRuntimeState::new(1);
        insert(&mut state, "a", MiniappState::Background);
        insert(&mut state, "b", MiniappState::Background);
        let violations = check_all_invariants(&state);
        assert!(violations.iter().any(|v| v.invariant == "background_cap"));
    }

    #[test]
    fn test_stale_active_id() {
        let mut state = MiniappRuntimeState::default();
        insert(&mut state, "a", MiniappState::Background);
        state.active_app_id = Some(AppId::from("a"));
        state.focused_app_id = Some(AppId::from("a"));
        let violations = check_all_invariants(&state);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].invariant, "active_id_consistency");
    }

    #[test]
    fn test_z_order_and_keys() {
        let mut state = MiniappRuntimeState::default();
        let mut p = MiniappPresentation::new(AppId::from("ghost"), SurfaceId::main());
        p.z_order = 4;
        state.presentations.insert(AppId::from("ghost"), p);

        let names: Vec<&str> = check_all_invariants(&state)
            .iter()
            .map(|v| v.invariant)
            .collect();
        assert_eq!(names, alloc::vec!["z_order_bound", "key_consistency"]);
    }
}
