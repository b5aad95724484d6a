//! Mini-App Runtime Core - Pure State Machine
//!
//! This crate holds the **pure, platform-free** state machine of the
//! mini-app runtime: the snapshot type, the lifecycle enums, flow
//! derivation, and the step functions that move apps between states.
//!
//! # Design Principles
//!
//! 1. **No platform dependency**: DOM and container work lives in
//!    `miniapp-runtime`
//! 2. **No side effects**: step functions return new snapshots and DOM
//!    commands as data
//! 3. **Deterministic**: same snapshot and inputs always give the same output
//! 4. **Reference-stable**: unchanged snapshots are returned as the same `Rc`
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      miniapp-core                           │
//! │                   (Pure State Machine)                      │
//! │                                                             │
//! │   ┌────────────────────┐    ┌────────────────────┐          │
//! │   │ MiniappRuntimeState│    │   step functions   │          │
//! │   │  - apps            │───▶│  transition_*      │──▶ DomCommand
//! │   │  - presentations   │    │  plan_activation   │          │
//! │   │  - zOrderSeed      │    └────────────────────┘          │
//! │   └────────────────────┘                                    │
//! │                                                             │
//! │   ┌────────────────────┐    ┌────────────────────┐          │
//! │   │  derive_flow /     │    │    Invariants      │          │
//! │   │  settle_flow       │    │    Assertions      │          │
//! │   └────────────────────┘    └────────────────────┘          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              │ used by
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    miniapp-runtime                          │
//! │  store, orchestration, containers, DOM binding, FLIP        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Module Organization
//!
//! - `types` - ids and lifecycle enums
//! - `manifest` - externally supplied app manifests
//! - `handle` - container handle capability trait
//! - `instance` - running instances and presentation slots
//! - `state` - the runtime snapshot
//! - `flow` - flow derivation and settling
//! - `command` - DOM commands emitted by transitions
//! - `step` - pure transition functions
//! - `invariants` - invariant assertions

#![no_std]
extern crate alloc;

pub mod command;
pub mod flow;
pub mod handle;
pub mod instance;
pub mod invariants;
pub mod manifest;
pub mod state;
pub mod step;
pub mod types;

// Re-export all public types for convenient access
pub use command::DomCommand;
pub use flow::{derive_flow, settle_flow};
pub use handle::{ContainerHandle, MountSlot, SharedContainer};
pub use instance::{ChromeTheme, CtxPatch, MiniappCtx, MiniappInstance, MiniappPresentation};
pub use invariants::{check_all_invariants, InvariantViolation};
pub use manifest::{ManifestError, MiniappManifest, SplashScreenConfig, DEFAULT_SPLASH_TIMEOUT_MS};
pub use state::{MiniappRuntimeState, DEFAULT_MAX_BACKGROUND_APPS};
pub use step::{
    partition_foreground_app_ids, plan_activation, transition_app_state, transition_process_status,
    transition_readiness, Activation, Partition, StateRef, Transition,
};
pub use types::{
    AppId, ContainerType, MiniappFlow, MiniappState, PresentationState, ProcessStatus, Readiness,
    SurfaceId, Timestamp, TransitionKind,
};
