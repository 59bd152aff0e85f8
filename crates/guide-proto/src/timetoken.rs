//! Backend-issued timetokens.
//!
//! A timetoken counts 100-nanosecond ticks since the Unix epoch. Tokens are
//! opaque to clients apart from ordering and display.

use std::{fmt, str::FromStr, time::Duration};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ProtocolError;

/// Ticks per second (one tick is 100ns).
pub const TICKS_PER_SECOND: u64 = 10_000_000;

const NANOS_PER_TICK: u32 = 100;

/// Short date, medium time, en_US_POSIX conventions.
const DISPLAY_FORMAT: &str = "%-m/%-d/%y, %-I:%M:%S %p";

/// Timestamp assigned by the messaging backend to a published event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timetoken(u64);

impl Timetoken {
    /// Wrap a raw tick count.
    pub const fn new(ticks: u64) -> Self {
        Self(ticks)
    }

    /// Raw tick count.
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Token for a time expressed as a duration since the Unix epoch.
    ///
    /// Saturates at `u64::MAX` ticks.
    pub fn from_unix_duration(since_epoch: Duration) -> Self {
        let secs = since_epoch.as_secs();
        let ticks = secs
            .checked_mul(TICKS_PER_SECOND)
            .and_then(|t| t.checked_add(u64::from(since_epoch.subsec_nanos() / NANOS_PER_TICK)))
            .unwrap_or(u64::MAX);
        Self(ticks)
    }

    /// Next token in sequence.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Wall-clock instant this token denotes, in UTC.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.0 / TICKS_PER_SECOND).ok()?;
        let nanos = (self.0 % TICKS_PER_SECOND) as u32 * NANOS_PER_TICK;
        DateTime::from_timestamp(secs, nanos)
    }

    /// Human-readable form, e.g. `4/16/20, 6:54:56 PM`.
    ///
    /// Always rendered in UTC, so the output depends only on the token.
    /// Falls back to the raw number if the token is out of calendar range.
    pub fn formatted(self) -> String {
        match self.to_datetime() {
            Some(at) => at.format(DISPLAY_FORMAT).to_string(),
            None => self.0.to_string(),
        }
    }
}

impl fmt::Display for Timetoken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Timetoken {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ProtocolError::InvalidTimetoken { input: s.to_string() })
    }
}

impl From<u64> for Timetoken {
    fn from(ticks: u64) -> Self {
        Self(ticks)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn formats_short_date_medium_time() {
        insta::assert_snapshot!(Timetoken::new(15_870_632_960_000_000).formatted(), @"4/16/20, 6:54:56 PM");
    }

    #[test]
    fn formats_epoch_as_midnight() {
        insta::assert_snapshot!(Timetoken::new(0).formatted(), @"1/1/70, 12:00:00 AM");
    }

    #[test]
    fn sub_second_ticks_do_not_change_display() {
        assert_eq!(
            Timetoken::new(17_000_000_001_234_567).formatted(),
            Timetoken::new(17_000_000_000_000_000).formatted()
        );
    }

    #[test]
    fn display_is_raw_ticks() {
        assert_eq!(Timetoken::new(15_870_632_960_000_000).to_string(), "15870632960000000");
    }

    #[test]
    fn from_unix_duration_keeps_tick_precision() {
        let token = Timetoken::from_unix_duration(Duration::new(1_587_063_296, 123_456_789));
        assert_eq!(token.as_u64(), 15_870_632_961_234_567);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            "tomorrow".parse::<Timetoken>(),
            Err(ProtocolError::InvalidTimetoken { .. })
        ));
        assert_eq!(" 42 ".parse::<Timetoken>().unwrap(), Timetoken::new(42));
    }

    proptest! {
        #[test]
        fn formatted_is_never_empty(ticks in any::<u64>()) {
            prop_assert!(!Timetoken::new(ticks).formatted().is_empty());
        }

        #[test]
        fn ordering_follows_ticks(a in any::<u64>(), b in any::<u64>()) {
            prop_assert_eq!(Timetoken::new(a).cmp(&Timetoken::new(b)), a.cmp(&b));
        }
    }
}
