//! Pure step functions - the runtime's state machine
//!
//! Every function here takes the current snapshot and returns the next one.
//! Nothing is mutated in place and nothing touches the platform: DOM work is
//! returned as [`DomCommand`] data for the binding layer to apply.
//!
//! # Properties
//!
//! 1. **Deterministic**: same snapshot and inputs give the same output
//! 2. **Reference-stable**: when nothing changes the input `Rc` is returned,
//!    so subscribers can skip work with `Rc::ptr_eq`
//! 3. **Total**: unknown app ids are no-ops, never errors

use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::command::DomCommand;
use crate::flow::{derive_flow, settled};
use crate::instance::{CtxPatch, MiniappInstance, MiniappPresentation};
use crate::state::MiniappRuntimeState;
use crate::types::{
    AppId, MiniappState, PresentationState, ProcessStatus, Readiness, Timestamp, TransitionKind,
};

/// Shared immutable snapshot
pub type StateRef = Rc<MiniappRuntimeState>;

// ============================================================================
// Results
// ============================================================================

/// Result of [`transition_app_state`]
#[derive(Clone, Debug)]
pub struct Transition {
    pub next_state: StateRef,
    pub changed: bool,
    pub dom_command: Option<DomCommand>,
}

impl Transition {
    fn unchanged(state: &StateRef) -> Self {
        Self {
            next_state: Rc::clone(state),
            changed: false,
            dom_command: None,
        }
    }
}

/// Result of [`plan_activation`]
#[derive(Clone, Debug)]
pub struct Activation {
    pub next_state: StateRef,
    pub changed: bool,
    /// Commands in application order (activated app first)
    pub commands: Vec<DomCommand>,
    /// Apps moved from active to background
    pub demoted: Vec<AppId>,
}

/// Split of app ids into foreground and background sets
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Partition {
    pub foreground_app_ids: Vec<AppId>,
    pub background_app_ids: Vec<AppId>,
}

// ============================================================================
// Core transitions
// ============================================================================

/// Move an app to `next`, deriving its flow and the slot command.
pub fn transition_app_state(state: &StateRef, app_id: &str, next: MiniappState) -> Transition {
    let app = match state.apps.get(app_id) {
        Some(app) => app,
        None => return Transition::unchanged(state),
    };

    let flow = derive_flow(Some(app.state), next);
    let desktop = state
        .presentations
        .get(app_id)
        .map(|p| p.desktop.clone())
        .unwrap_or_else(|| app.manifest.target_desktop.clone());
    let command = DomCommand::SlotInteractive {
        desktop,
        app_id: app.app_id.clone(),
        interactive: next == MiniappState::Active,
    };

    let next_state = update_app(state, app_id, |app| {
        app.state = next;
        app.flow = flow;
    });

    Transition {
        next_state,
        changed: true,
        dom_command: Some(command),
    }
}

/// Set `processStatus`, returning the same snapshot when already set
pub fn transition_process_status(state: &StateRef, app_id: &str, status: ProcessStatus) -> StateRef {
    match state.apps.get(app_id) {
        Some(app) if app.process_status != status => {
            update_app(state, app_id, |app| app.process_status = status)
        }
        _ => Rc::clone(state),
    }
}

/// Set `readiness`. The gate is one-way: `Ready` never reverts.
pub fn transition_readiness(state: &StateRef, app_id: &str, readiness: Readiness) -> StateRef {
    match state.apps.get(app_id) {
        Some(app) if app.readiness < readiness => {
            update_app(state, app_id, |app| app.readiness = readiness)
        }
        _ => Rc::clone(state),
    }
}

/// Apply [`settle_flow`](crate::flow::settle_flow) to one app and finish
/// an in-flight present transition.
pub fn settle_app_flow(state: &StateRef, app_id: &str) -> StateRef {
    let app = match state.apps.get(app_id) {
        Some(app) => app,
        None => return Rc::clone(state),
    };

    let flow = settled(app.flow);
    let presenting = state
        .presentations
        .get(app_id)
        .is_some_and(|p| p.state == PresentationState::Presenting);

    if flow == app.flow && !presenting {
        return Rc::clone(state);
    }

    let mut next = (**state).clone();
    if let Some(app) = next.apps.get_mut(app_id) {
        app.flow = flow;
    }
    if presenting {
        if let Some(p) = next.presentations.get_mut(app_id) {
            p.state = PresentationState::Presented;
            p.transition_id = None;
            p.transition_kind = None;
        }
    }
    Rc::new(next)
}

/// Split `all` into ids present in `targets` and the rest, keeping order.
pub fn partition_foreground_app_ids(all: &[AppId], targets: &[AppId]) -> Partition {
    let (foreground_app_ids, background_app_ids): (Vec<AppId>, Vec<AppId>) =
        all.iter().cloned().partition(|id| targets.contains(id));
    Partition {
        foreground_app_ids,
        background_app_ids,
    }
}

// ============================================================================
// Activation
// ============================================================================

/// Compute the snapshot after making `app_id` the single active app.
///
/// Every other app currently in `active` is demoted to `background`, the
/// target's presentation gets the next z-order, and the demoted apps'
/// z-order is left alone.
pub fn plan_activation(state: &StateRef, app_id: &str, now: Timestamp) -> Activation {
    if !state.apps.contains_key(app_id) {
        return Activation {
            next_state: Rc::clone(state),
            changed: false,
            commands: Vec::new(),
            demoted: Vec::new(),
        };
    }

    let mut foreground = state.app_ids_in(MiniappState::Active);
    if let Some(active) = &state.active_app_id {
        if !foreground.contains(active) && state.apps.contains_key(active) {
            foreground.push(active.clone());
        }
    }
    let target = AppId::from(app_id);
    let partition = partition_foreground_app_ids(&foreground, core::slice::from_ref(&target));

    let mut commands = Vec::new();
    let activated = transition_app_state(state, app_id, MiniappState::Active);
    commands.extend(activated.dom_command);
    let mut current = activated.next_state;

    for demoted in &partition.background_app_ids {
        let step = transition_app_state(&current, demoted.as_str(), MiniappState::Background);
        commands.extend(step.dom_command);
        current = step.next_state;
    }

    let mut next = (*current).clone();
    next.active_app_id = Some(target.clone());
    next.focused_app_id = Some(target.clone());
    next.z_order_seed += 1;
    let seed = next.z_order_seed;
    if let Some(p) = next.presentations.get_mut(app_id) {
        p.z_order = seed;
    }
    for id in partition.background_app_ids.iter().chain(core::iter::once(&target)) {
        if let Some(app) = next.apps.get_mut(id) {
            app.last_active_at = now;
        }
    }

    Activation {
        next_state: Rc::new(next),
        changed: true,
        commands,
        demoted: partition.background_app_ids,
    }
}

// ============================================================================
// Lifecycle helpers used by the orchestration layer
// ============================================================================

/// Insert a freshly launched instance with its presentation
pub fn insert_app(
    state: &StateRef,
    instance: MiniappInstance,
    presentation: MiniappPresentation,
) -> StateRef {
    let mut next = (**state).clone();
    next.presentations.insert(instance.app_id.clone(), presentation);
    next.apps.insert(instance.app_id.clone(), instance);
    Rc::new(next)
}

/// Drop an instance and its presentation
pub fn remove_app(state: &StateRef, app_id: &str) -> StateRef {
    if !state.apps.contains_key(app_id) && !state.presentations.contains_key(app_id) {
        return Rc::clone(state);
    }
    let mut next = (**state).clone();
    next.apps.remove(app_id);
    next.presentations.remove(app_id);
    clear_focus(&mut next, app_id);
    Rc::new(next)
}

/// Clear `activeAppId`/`focusedAppId` when they point at `app_id`
pub fn release_focus(state: &StateRef, app_id: &str) -> StateRef {
    let holds = |id: &Option<AppId>| id.as_ref().is_some_and(|id| id.as_str() == app_id);
    if !holds(&state.active_app_id) && !holds(&state.focused_app_id) {
        return Rc::clone(state);
    }
    let mut next = (**state).clone();
    clear_focus(&mut next, app_id);
    Rc::new(next)
}

/// Start a present or dismiss transition on an app's presentation.
///
/// Returns the new snapshot and the allocated transition id (`None` when the
/// app has no presentation).
pub fn begin_presentation_transition(
    state: &StateRef,
    app_id: &str,
    kind: TransitionKind,
) -> (StateRef, Option<u64>) {
    if !state.presentations.contains_key(app_id) {
        return (Rc::clone(state), None);
    }
    let mut next = (**state).clone();
    next.transition_seed += 1;
    let id = next.transition_seed;
    if let Some(p) = next.presentations.get_mut(app_id) {
        p.state = match kind {
            TransitionKind::Present => PresentationState::Presenting,
            TransitionKind::Dismiss => PresentationState::Dismissing,
        };
        p.transition_id = Some(id);
        p.transition_kind = Some(kind);
    }
    (Rc::new(next), Some(id))
}

/// Record activity time used for eviction ordering
pub fn touch(state: &StateRef, app_id: &str, now: Timestamp) -> StateRef {
    match state.apps.get(app_id) {
        Some(app) if app.last_active_at != now => {
            update_app(state, app_id, |app| app.last_active_at = now)
        }
        _ => Rc::clone(state),
    }
}

/// Merge a context patch into an app's ctx
pub fn update_ctx(state: &StateRef, app_id: &str, patch: &CtxPatch) -> StateRef {
    let ctx = match state.apps.get(app_id).and_then(|app| app.ctx.patched(patch)) {
        Some(ctx) => ctx,
        None => return Rc::clone(state),
    };
    update_app(state, app_id, |app| app.ctx = ctx)
}

/// Show or hide the multi-app overview
pub fn set_stack_view_open(state: &StateRef, open: bool) -> StateRef {
    if state.is_stack_view_open == open {
        return Rc::clone(state);
    }
    let mut next = (**state).clone();
    next.is_stack_view_open = open;
    Rc::new(next)
}

// ============================================================================
// Internal helpers
// ============================================================================

fn update_app(state: &StateRef, app_id: &str, f: impl FnOnce(&mut MiniappInstance)) -> StateRef {
    let mut next = (**state).clone();
    if let Some(app) = next.apps.get_mut(app_id) {
        f(app);
    }
    Rc::new(next)
}

fn clear_focus(state: &mut MiniappRuntimeState, app_id: &str) {
    if state.active_app_id.as_ref().is_some_and(|id| id.as_str() == app_id) {
        state.active_app_id = None;
    }
    if state.focused_app_id.as_ref().is_some_and(|id| id.as_str() == app_id) {
        state.focused_app_id = None;
    }
}
