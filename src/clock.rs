//! Wall-clock access for timestamps embedded in output.
//!
//! Flowcards carry a "generated on" stamp and regen manifests are named after
//! the run start time. Both read the time through [`Clock`] so tests can pin
//! it with [`FixedClock`] and assert exact output.

use chrono::{Local, NaiveDateTime};

/// Format of the generation stamp rendered into flowcards.
pub const CARD_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format of the run stamp embedded in manifest file names.
pub const MANIFEST_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub trait Clock {
    /// Current local time, without zone information.
    fn now(&self) -> NaiveDateTime;
}

/// The machine's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
