use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Half-open interval of occupied or candidate calendar time.
///
/// `[start, end)` semantics: two slots that merely touch at an endpoint
/// do not overlap, so a booking may begin exactly where the previous
/// one's padded window ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSlot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        TimeSlot { start, end }
    }

    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}
