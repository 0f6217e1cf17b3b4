use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::errors::{BookingError, BookingResult};

/// Shop-wide scheduling parameters. Stored as a singleton row and
/// mutated only through [`crate::stores::SettingsStore::update`].
///
/// Every slot computation reads one snapshot of this struct for its
/// whole duration; `updated_at` identifies the snapshot so callers can
/// detect a concurrent admin change between two reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_step_minutes: i64,
    pub buffer_minutes: i64,
    pub days_ahead: i64,
    pub timezone: String,
    pub updated_at: DateTime<Utc>,
}

impl WorkingHours {
    pub fn validate(&self) -> BookingResult<()> {
        if self.start_time >= self.end_time {
            return Err(BookingError::Validation(format!(
                "work start {} must be before work end {}",
                self.start_time, self.end_time
            )));
        }
        if self.slot_step_minutes <= 0 {
            return Err(BookingError::Validation(format!(
                "slot step must be positive, got {}",
                self.slot_step_minutes
            )));
        }
        if self.buffer_minutes < 0 {
            return Err(BookingError::Validation(format!(
                "buffer must not be negative, got {}",
                self.buffer_minutes
            )));
        }
        if self.days_ahead <= 0 {
            return Err(BookingError::Validation(format!(
                "days ahead must be positive, got {}",
                self.days_ahead
            )));
        }
        self.tz()?;
        Ok(())
    }

    /// Parsed IANA timezone of the shop.
    pub fn tz(&self) -> BookingResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| BookingError::Validation(format!("unknown timezone {:?}", self.timezone)))
    }
}

impl Default for WorkingHours {
    fn default() -> Self {
        WorkingHours {
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            slot_step_minutes: 10,
            buffer_minutes: 15,
            days_ahead: 14,
            timezone: "Europe/Warsaw".to_string(),
            updated_at: DateTime::<Utc>::MIN_UTC,
        }
    }
}
