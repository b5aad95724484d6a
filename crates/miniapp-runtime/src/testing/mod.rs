//! In-memory collaborators for tests
//!
//! Stand-ins for the platform pieces the runtime consumes: a window stack,
//! a container host with recording containers, a permission bridge, a
//! layout probe and an animator. They record every call so tests can assert
//! on side effects.

mod animator;
mod bridge;
mod container;
mod layout;
mod window_stack;

pub use animator::{DriverCall, RecordingAnimation, RecordingAnimator};
pub use bridge::{Attachment, RecordingBridge};
pub use container::{MemoryContainerHost, RecordingContainer, Region};
pub use layout::{FakeElement, FakeLayout};
pub use window_stack::MemoryWindowStack;
