//! Property tests for runtime orchestration
//!
//! Random operation sequences must keep the snapshot invariants, and
//! eviction must always pick the least recently active background apps.

mod common;

use std::collections::BTreeMap;

use common::{harness_with, manifest};
use miniapp_core::{check_all_invariants, AppId, MiniappInstance, MiniappManifest, MiniappState};
use miniapp_runtime::container::select_evictions;
use miniapp_runtime::{Clock, LaunchOptions, RuntimeConfig};
use proptest::prelude::*;

const APPS: [&str; 5] = ["a", "b", "c", "d", "e"];

#[derive(Clone, Debug)]
enum Op {
    Launch { app: usize, splash: bool },
    Loaded(usize),
    Ready(usize),
    Activate(usize),
    Deactivate(usize),
    Close(usize),
    Settle(usize),
    Tick(u64),
    StackView(bool),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let app = 0..APPS.len();
    prop_oneof![
        3 => (app.clone(), any::<bool>()).prop_map(|(app, splash)| Op::Launch { app, splash }),
        1 => app.clone().prop_map(Op::Loaded),
        2 => app.clone().prop_map(Op::Ready),
        3 => app.clone().prop_map(Op::Activate),
        1 => app.clone().prop_map(Op::Deactivate),
        1 => app.clone().prop_map(Op::Close),
        2 => app.prop_map(Op::Settle),
        1 => (0u64..4_000).prop_map(Op::Tick),
        1 => any::<bool>().prop_map(Op::StackView),
    ]
}

fn instance(id: &str, state: MiniappState, last_active_at: u64) -> MiniappInstance {
    let mut instance = MiniappInstance::new(MiniappManifest::new(id, id, "/x"), None, 0);
    instance.state = state;
    instance.last_active_at = last_active_at;
    instance
}

fn state_strategy() -> impl Strategy<Value = MiniappState> {
    prop_oneof![
        Just(MiniappState::Launching),
        Just(MiniappState::Splash),
        Just(MiniappState::Active),
        Just(MiniappState::Background),
        Just(MiniappState::Closing),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Any sequence of operations keeps every invariant in every published
    /// snapshot, not just after each step.
    #[test]
    fn random_operations_keep_invariants(
        max_background in 1usize..4,
        ops in prop::collection::vec(op_strategy(), 1..60)
    ) {
        let config = RuntimeConfig {
            max_background_apps: max_background,
            ..RuntimeConfig::default()
        };
        let mut h = harness_with(config);
        let published = h.watch_invariants();

        for op in ops {
            h.clock.advance(7);
            match op {
                Op::Launch { app, splash } => {
                    let mut m = manifest(APPS[app]);
                    if splash {
                        m = m.with_splash(Some(1_500));
                    }
                    let _ = h.runtime.launch_app(m, LaunchOptions::default());
                }
                Op::Loaded(app) => {
                    h.runtime.container_loaded(APPS[app]);
                }
                Op::Ready(app) => {
                    h.runtime.ready_gate_opened(APPS[app]);
                }
                Op::Activate(app) => {
                    h.runtime.activate_app(APPS[app]);
                }
                Op::Deactivate(app) => {
                    h.runtime.deactivate_app(APPS[app]);
                }
                Op::Close(app) => {
                    h.runtime.close_app(APPS[app]);
                }
                Op::Settle(app) => {
                    h.runtime.settle_flow(APPS[app]);
                }
                Op::Tick(ms) => {
                    h.clock.advance(ms);
                    h.runtime.tick(h.clock.now_ms());
                }
                Op::StackView(open) => {
                    if open {
                        h.runtime.open_stack_view();
                    } else {
                        h.runtime.close_stack_view();
                    }
                }
            }

            let state = h.runtime.state();
            let violations = check_all_invariants(&state);
            prop_assert!(violations.is_empty(), "violations: {:?}", violations);
            prop_assert!(published.borrow().is_empty(), "published: {:?}", published.borrow());
            prop_assert!(state.app_ids_in(MiniappState::Background).len() <= max_background);

            // Every removed app had its container torn down
            for id in APPS {
                if state.app(id).is_none() {
                    if let Some(container) = h.host.container(&AppId::from(id)) {
                        prop_assert!(container.destroy_count() >= 1);
                    }
                }
            }
        }
    }

    /// Evictions are the oldest background apps, never the active one.
    #[test]
    fn evictions_pick_least_recently_active(
        entries in prop::collection::vec((state_strategy(), 0u64..50), 1..8),
        max in 0usize..4
    ) {
        let mut apps = BTreeMap::new();
        for (i, (state, last_active_at)) in entries.iter().enumerate() {
            let id = format!("app-{}", i);
            apps.insert(AppId::from(id.as_str()), instance(&id, *state, *last_active_at));
        }
        let active = apps
            .values()
            .find(|app| app.state == MiniappState::Active)
            .map(|app| app.app_id.clone());

        let evicted = select_evictions(&apps, active.as_ref(), max);

        let background: Vec<&MiniappInstance> = apps
            .values()
            .filter(|app| app.state == MiniappState::Background)
            .collect();
        prop_assert_eq!(evicted.len(), background.len().saturating_sub(max));

        for id in &evicted {
            let app = &apps[id];
            prop_assert_eq!(app.state, MiniappState::Background);
            prop_assert!(Some(id) != active.as_ref());
            for kept in background.iter().filter(|app| !evicted.contains(&app.app_id)) {
                prop_assert!(
                    (app.last_active_at, &app.app_id) < (kept.last_active_at, &kept.app_id),
                    "{} evicted before older {}",
                    app.app_id,
                    kept.app_id
                );
            }
        }
    }
}
