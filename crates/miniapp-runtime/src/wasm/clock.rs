//! `Date.now()` clock

use miniapp_core::Timestamp;

use crate::clock::Clock;

/// Wall clock reading `Date.now()`
#[derive(Clone, Copy, Debug, Default)]
pub struct DateClock;

impl Clock for DateClock {
    fn now_ms(&self) -> Timestamp {
        js_sys::Date::now() as Timestamp
    }
}
