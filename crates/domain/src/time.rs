//! Time and timestamp helpers.

use chrono::{DateTime, SubsecRound, Utc};

/// UTC timestamp used for event times.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time, truncated to microseconds.
#[must_use]
pub fn now() -> Timestamp {
    truncate(Utc::now())
}

/// Drop anything finer than a microsecond.
///
/// Stored timestamps keep microsecond precision, so values are truncated
/// before they enter the domain to make them compare equal after a roundtrip.
#[must_use]
pub fn truncate(ts: Timestamp) -> Timestamp {
    ts.trunc_subsecs(6)
}
