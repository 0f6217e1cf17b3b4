use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Source of the current instant. Injected so slot math and reminder
/// windows are testable against a fixed point in time.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Resolve a wall-clock time in the shop's zone to a concrete instant.
///
/// DST transitions make naive local times ambiguous (fall-back) or
/// nonexistent (spring-forward). Slot generation must never fail for a
/// valid date, so ambiguity resolves to the earlier instant and a gap
/// skips forward to the first valid wall-clock time.
pub fn localize(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let mut shifted = naive;
            // DST gaps are at most a few hours; probe in half-hour steps.
            for _ in 0..48 {
                shifted += Duration::minutes(30);
                match tz.from_local_datetime(&shifted) {
                    LocalResult::Single(dt) => return dt,
                    LocalResult::Ambiguous(earliest, _) => return earliest,
                    LocalResult::None => continue,
                }
            }
            tz.from_utc_datetime(&naive)
        }
    }
}
