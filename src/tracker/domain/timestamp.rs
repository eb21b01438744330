//! Timestamp precision shared by every aggregate.

use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;

/// Fractional-second digits kept on domain timestamps.
///
/// Matches `TIMESTAMPTZ`, so a value written to `PostgreSQL` reads back equal.
pub const TIMESTAMP_PRECISION_DIGITS: u16 = 6;

/// Reads `clock`, truncated to microsecond precision.
///
/// # Examples
///
/// ```
/// use mockable::DefaultClock;
/// use taskflow::tracker::domain::timestamp_now;
///
/// let now = timestamp_now(&DefaultClock);
/// assert_eq!(now.timestamp_subsec_nanos() % 1_000, 0);
/// ```
#[must_use]
pub fn timestamp_now(clock: &impl Clock) -> DateTime<Utc> {
    clock.utc().trunc_subsecs(TIMESTAMP_PRECISION_DIGITS)
}
