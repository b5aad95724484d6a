//! Mini-app runtime
//!
//! Hosts independently sourced, sandboxed mini-apps inside one page:
//! - Lifecycle orchestration over the pure state machine in `miniapp-core`
//! - Container management (visible and off-screen regions, LRU eviction)
//! - DOM binding (slot interactivity, mount targets)
//! - FLIP icon ↔ window animation
//! - Motion timing tokens as CSS custom properties
//!
//! ## Architecture
//!
//! ```text
//!             operations (launch / activate / close / settle ...)
//!                                  │
//!                                  ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      MiniappRuntime                          │
//! │                                                              │
//! │  phase 1: miniapp-core step functions ──▶ next StateRef      │
//! │  phase 2: side effects                                       │
//! │     ├─ DomBinding ──────────▶ WindowStack (slots)            │
//! │     ├─ ContainerManager ────▶ ContainerHost (iframes)        │
//! │     └─ PermissionBridge                                      │
//! │                                                              │
//! │  RuntimeStore (snapshot) ──▶ subscribers                     │
//! │  EventBus ──▶ app:launch, app:activate, app:close, ...       │
//! └──────────────────────────────────────────────────────────────┘
//!                                  │
//!                    animation finished (settle_flow)
//!                                  ▲
//! ┌──────────────────────────────────────────────────────────────┐
//! │  flip: capture ─▶ invert ─▶ keyframes ─▶ play / synced scrub │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Platform pieces sit behind traits (`ContainerHost`, `WindowStack`,
//! `PermissionBridge`, `LayoutProbe`, `Animator`, `Clock`). The `wasm`
//! feature provides DOM implementations and the `MiniappController`
//! export. The [`testing`] module provides in-memory ones.
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use miniapp_core::{MiniappManifest, MiniappState};
//! use miniapp_runtime::testing::{MemoryContainerHost, MemoryWindowStack, RecordingBridge};
//! use miniapp_runtime::{LaunchOptions, ManualClock, MiniappRuntime, RuntimeConfig, RuntimeDeps};
//!
//! let deps = RuntimeDeps {
//!     host: Rc::new(MemoryContainerHost::new()),
//!     stack: Rc::new(MemoryWindowStack::with_surfaces(&["main"])),
//!     bridge: Rc::new(RecordingBridge::new()),
//!     clock: Rc::new(ManualClock::new(0)),
//! };
//! let mut runtime = MiniappRuntime::new(RuntimeConfig::default(), deps)?;
//!
//! runtime.launch_app(MiniappManifest::new("wallet", "Wallet", "/wallet/"), LaunchOptions::default())?;
//! runtime.ready_gate_opened("wallet");
//!
//! let state = runtime.state();
//! assert_eq!(state.app("wallet").map(|app| app.state), Some(MiniappState::Active));
//! # Ok::<(), miniapp_runtime::RuntimeError>(())
//! ```

pub mod binding;
pub mod bridge;
pub mod clock;
pub mod config;
pub mod container;
pub mod error;
pub mod events;
pub mod flip;
pub mod math;
pub mod motion;
pub mod stack;
pub mod store;
pub mod testing;

mod runtime;

// WASM exports (only available with "wasm" feature)
#[cfg(feature = "wasm")]
pub mod wasm;
#[cfg(feature = "wasm")]
pub use wasm::{FlipScrubber, MiniappController};

pub use binding::DomBinding;
pub use bridge::{NoopBridge, PermissionBridge};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{RuntimeConfig, SplashTimeoutPolicy};
pub use container::{ContainerHost, ContainerManager, ContainerSpec, CONTAINER_SANDBOX};
pub use error::{ConfigError, ContainerError, RuntimeError, RuntimeResult};
pub use events::{CloseReason, EventBus, RuntimeEvent, SubscriptionId};
pub use math::{Rect, SafeAreaInsets};
pub use motion::MotionConfig;
pub use runtime::{LaunchOptions, MiniappRuntime, RuntimeDeps, SplashTimers};
pub use stack::WindowStack;
pub use store::RuntimeStore;
