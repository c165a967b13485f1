//! Last-successful-sync watermark.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The timestamp bounding incremental fetches.
///
/// A fresh campaign starts at the epoch sentinel (`2000-01-01T00:00:00+00:00`),
/// which means "process everything". The watermark is monotonically
/// non-decreasing across successful runs: advancing to an earlier instant is
/// a no-op, and a failed sync never advances it at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watermark(DateTime<Utc>);

impl Watermark {
    /// The "process everything" sentinel.
    pub fn epoch() -> Self {
        Watermark(Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap())
    }

    pub fn new(ts: DateTime<Utc>) -> Self {
        Watermark(ts)
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.0
    }

    /// True when this watermark is the epoch sentinel.
    pub fn is_epoch(&self) -> bool {
        *self == Self::epoch()
    }

    /// Returns the watermark advanced to `ts`, or `self` if `ts` is older.
    #[must_use]
    pub fn advanced_to(self, ts: DateTime<Utc>) -> Self {
        if ts > self.0 {
            Watermark(ts)
        } else {
            self
        }
    }

    /// True when a record modified at `ts` falls inside an incremental
    /// fetch bounded by this watermark (modified at or after it).
    pub fn includes(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.0
    }
}

impl Default for Watermark {
    fn default() -> Self {
        Self::epoch()
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
