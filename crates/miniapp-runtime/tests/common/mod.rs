//! Shared harness for runtime integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use miniapp_core::{check_all_invariants, AppId, MiniappManifest, MiniappState};
use miniapp_runtime::testing::{
    MemoryContainerHost, MemoryWindowStack, RecordingBridge, RecordingContainer,
};
use miniapp_runtime::{
    LaunchOptions, ManualClock, MiniappRuntime, RuntimeConfig, RuntimeDeps, RuntimeEvent,
};

pub struct Harness {
    pub runtime: MiniappRuntime,
    pub host: Rc<MemoryContainerHost>,
    pub stack: Rc<MemoryWindowStack>,
    pub bridge: Rc<RecordingBridge>,
    pub clock: Rc<ManualClock>,
    pub events: Rc<RefCell<Vec<RuntimeEvent>>>,
}

pub fn harness() -> Harness {
    harness_with(RuntimeConfig::default())
}

pub fn harness_with(config: RuntimeConfig) -> Harness {
    let host = Rc::new(MemoryContainerHost::new());
    let stack = Rc::new(MemoryWindowStack::with_surfaces(&["main", "stack"]));
    let bridge = Rc::new(RecordingBridge::new());
    let clock = Rc::new(ManualClock::new(1_000));

    let deps = RuntimeDeps {
        host: host.clone(),
        stack: stack.clone(),
        bridge: bridge.clone(),
        clock: clock.clone(),
    };
    let runtime = MiniappRuntime::new(config, deps).expect("valid config");

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    runtime
        .events()
        .subscribe(move |event| sink.borrow_mut().push(event.clone()));

    Harness {
        runtime,
        host,
        stack,
        bridge,
        clock,
        events,
    }
}

pub fn manifest(id: &str) -> MiniappManifest {
    MiniappManifest::new(id, id.to_uppercase(), format!("/{}/", id))
}

impl Harness {
    /// Launch an app without a splash screen
    pub fn launch(&mut self, id: &str) {
        self.runtime
            .launch_app(manifest(id), LaunchOptions::default())
            .expect("launch");
    }

    /// Launch an app and open its ready gate, which activates it
    pub fn launch_active(&mut self, id: &str) {
        self.launch(id);
        self.clock.advance(10);
        self.runtime.ready_gate_opened(id);
        self.clock.advance(10);
    }

    pub fn container(&self, id: &str) -> Rc<RecordingContainer> {
        self.host
            .container(&AppId::from(id))
            .expect("container was created")
    }

    pub fn app_state(&self, id: &str) -> Option<MiniappState> {
        self.runtime.state().app(id).map(|app| app.state)
    }

    pub fn event_names(&self) -> Vec<&'static str> {
        self.events.borrow().iter().map(|e| e.name()).collect()
    }

    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }

    /// Record every invariant violation in any snapshot published from now on
    pub fn watch_invariants(&self) -> Rc<RefCell<Vec<String>>> {
        let violations = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&violations);
        self.runtime.store().subscribe(move |state| {
            for violation in check_all_invariants(state) {
                sink.borrow_mut().push(violation.description);
            }
        });
        violations
    }
}
