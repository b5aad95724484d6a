//! Container lifecycle management
//!
//! Containers are isolated browsing contexts (iframes) hosting one
//! mini-app each. The manager creates them through a platform
//! [`ContainerHost`] and moves them between two regions owned by the host:
//!
//! ```text
//! ┌──────────────────────────────┐   ┌──────────────────────────────┐
//! │       visible region         │   │      off-screen region       │
//! │  laid out, painted, input    │◀─▶│  pointer-events: none,       │
//! │  (mounted into its slot)     │   │  hidden, outside viewport    │
//! └──────────────────────────────┘   └──────────────────────────────┘
//! ```
//!
//! Relocation never destroys the container, so script state and in-flight
//! requests survive backgrounding. Removal blanks the source first to abort
//! loads.

mod host;
mod manager;
mod source;

pub use host::{ContainerHost, ContainerSpec};
pub use manager::{select_evictions, ContainerManager};
pub use source::build_container_url;

/// Sandbox tokens granted to every container.
///
/// Navigation-escalating capabilities (top navigation, popups) are left out.
pub const CONTAINER_SANDBOX: &str = "allow-scripts allow-forms allow-same-origin";

/// Source assigned before detaching a container
pub const BLANK_SOURCE: &str = "about:blank";
