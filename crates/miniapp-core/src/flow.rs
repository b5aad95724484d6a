//! Flow derivation
//!
//! Flow is the animation-selecting hint computed from a state transition.
//! It is derived once, at transition time, and collapsed to a stable value
//! only by [`settle_flow`].

use crate::instance::MiniappInstance;
use crate::types::{MiniappFlow, MiniappState};

/// Derive the flow for a transition from `prev` (or none) to `next`
pub fn derive_flow(prev: Option<MiniappState>, next: MiniappState) -> MiniappFlow {
    use MiniappState::*;

    match (prev, next) {
        (None | Some(Preparing), Launching) => MiniappFlow::Opening,
        (None | Some(Preparing), Splash) => MiniappFlow::Splash,
        (None | Some(Preparing), Active) => MiniappFlow::Opened,
        (Some(Launching), Splash) => MiniappFlow::Splash,
        (Some(Launching | Splash), Active) => MiniappFlow::Opened,
        (Some(Active), Background) => MiniappFlow::Backgrounding,
        (Some(Background), Active) => MiniappFlow::Foregrounding,
        (_, Closing) => MiniappFlow::Closing,
        (_, next) => fallback_flow(next),
    }
}

/// Flow implied by the next state alone
fn fallback_flow(next: MiniappState) -> MiniappFlow {
    match next {
        MiniappState::Preparing => MiniappFlow::Closed,
        MiniappState::Launching => MiniappFlow::Opening,
        MiniappState::Splash => MiniappFlow::Splash,
        MiniappState::Active => MiniappFlow::Opened,
        MiniappState::Background => MiniappFlow::Backgrounded,
        MiniappState::Closing => MiniappFlow::Closed,
    }
}

/// Collapse a directional flow to its stable form
pub fn settle_flow(instance: &MiniappInstance) -> MiniappFlow {
    settled(instance.flow)
}

/// Stable form of `flow`
#[inline]
pub fn settled(flow: MiniappFlow) -> MiniappFlow {
    match flow {
        MiniappFlow::Opening => MiniappFlow::Opened,
        MiniappFlow::Backgrounding => MiniappFlow::Backgrounded,
        MiniappFlow::Foregrounding => MiniappFlow::Opened,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::MiniappManifest;
    use MiniappState::*;

    #[test]
    fn test_flow_table() {
        let cases = [
            (None, Launching, MiniappFlow::Opening),
            (Some(Preparing), Launching, MiniappFlow::Opening),
            (None, Splash, MiniappFlow::Splash),
            (Some(Preparing), Splash, MiniappFlow::Splash),
            (None, Active, MiniappFlow::Opened),
            (Some(Preparing), Active, MiniappFlow::Opened),
            (Some(Launching), Splash, MiniappFlow::Splash),
            (Some(Launching), Active, MiniappFlow::Opened),
            (Some(Splash), Active, MiniappFlow::Opened),
            (Some(Active), Background, MiniappFlow::Backgrounding),
            (Some(Background), Active, MiniappFlow::Foregrounding),
            (Some(Active), Closing, MiniappFlow::Closing),
            (Some(Background), Closing, MiniappFlow::Closing),
            (Some(Splash), Closing, MiniappFlow::Closing),
            (None, Closing, MiniappFlow::Closing),
        ];
        for (prev, next, expected) in cases {
            assert_eq!(derive_flow(prev, next), expected, "{:?} -> {:?}", prev, next);
        }
    }

    #[test]
    fn test_flow_fallbacks() {
        assert_eq!(derive_flow(Some(Active), Preparing), MiniappFlow::Closed);
        assert_eq!(derive_flow(Some(Splash), Launching), MiniappFlow::Opening);
        assert_eq!(derive_flow(Some(Splash), Splash), MiniappFlow::Splash);
        assert_eq!(derive_flow(Some(Active), Active), MiniappFlow::Opened);
        assert_eq!(derive_flow(Some(Background), Background), MiniappFlow::Backgrounded);
        assert_eq!(derive_flow(Some(Splash), Background), MiniappFlow::Backgrounded);
    }

    #[test]
    fn test_settle_flow() {
        let mut instance = MiniappInstance::new(MiniappManifest::new("a", "A", "/a"), None, 0);
        let cases = [
            (MiniappFlow::Opening, MiniappFlow::Opened),
            (MiniappFlow::Backgrounding, MiniappFlow::Backgrounded),
            (MiniappFlow::Foregrounding, MiniappFlow::Opened),
            (MiniappFlow::Closed, MiniappFlow::Closed),
            (MiniappFlow::Splash, MiniappFlow::Splash),
            (MiniappFlow::Opened, MiniappFlow::Opened),
            (MiniappFlow::Backgrounded, MiniappFlow::Backgrounded),
            (MiniappFlow::Closing, MiniappFlow::Closing),
        ];
        for (flow, expected) in cases {
            instance.flow = flow;
            assert_eq!(settle_flow(&instance), expected);
        }
    }
}
