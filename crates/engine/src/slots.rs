//! Free-slot computation and the availability check.
//!
//! Both entry points share one algorithm: `is_available` is defined as
//! membership in the calculator's own output rather than a separate
//! overlap check, so the two can never drift apart.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use wrenchtime_core::errors::BookingResult;
use wrenchtime_core::models::{TimeSlot, WorkingHours};
use wrenchtime_core::stores::{BookingStore, SettingsStore};

use crate::clock::{localize, Clock};

/// Minimum lead time before a same-day slot may start, regardless of
/// how small the configured buffer is.
const MIN_SAME_DAY_LEAD_MINUTES: i64 = 15;

/// Tolerance when matching a candidate against a generated slot.
/// Absorbs sub-second artifacts from rounding, nothing semantic.
const MEMBERSHIP_TOLERANCE_SECONDS: i64 = 1;

#[derive(Clone)]
pub struct SlotCalculator {
    bookings: Arc<dyn BookingStore>,
    settings: Arc<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
}

impl SlotCalculator {
    pub fn new(
        bookings: Arc<dyn BookingStore>,
        settings: Arc<dyn SettingsStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        SlotCalculator {
            bookings,
            settings,
            clock,
        }
    }

    /// All bookable start times for `date`, ascending. An empty result
    /// is a valid answer for a fully booked or already closed day.
    pub async fn available_slots(
        &self,
        date: NaiveDate,
        duration_minutes: i64,
    ) -> BookingResult<Vec<DateTime<Utc>>> {
        let hours = self.settings.get().await?;
        self.compute_with(&hours, date, duration_minutes, None).await
    }

    /// Dates within the configured booking horizon that still have at
    /// least one free slot. Days with nothing free are not offered.
    pub async fn available_dates(&self, duration_minutes: i64) -> BookingResult<Vec<NaiveDate>> {
        let hours = self.settings.get().await?;
        let tz = hours.tz()?;
        let today = self.clock.now_utc().with_timezone(&tz).date_naive();

        let mut dates = Vec::new();
        for offset in 0..hours.days_ahead {
            let date = today + Duration::days(offset);
            let slots = self.compute_with(&hours, date, duration_minutes, None).await?;
            if !slots.is_empty() {
                dates.push(date);
            }
        }
        Ok(dates)
    }

    /// Whether `candidate` (rounded down to the slot step) is one of
    /// the free slots for its date.
    ///
    /// `exclude_booking_id` drops that booking's occupied interval from
    /// the blocking set, so rescheduling a booking onto a time that
    /// overlaps its own current slot succeeds.
    pub async fn is_available(
        &self,
        candidate: DateTime<Utc>,
        duration_minutes: i64,
        exclude_booking_id: Option<i64>,
    ) -> BookingResult<bool> {
        let hours = self.settings.get().await?;
        let tz = hours.tz()?;
        let local = candidate.with_timezone(&tz);
        let date = local.date_naive();

        let slots = self
            .compute_with(&hours, date, duration_minutes, exclude_booking_id)
            .await?;

        let rounded = localize(
            tz,
            round_down_to_step(local.naive_local(), hours.slot_step_minutes),
        )
        .with_timezone(&Utc);

        Ok(slots.iter().any(|slot| {
            (*slot - rounded).num_seconds().abs() < MEMBERSHIP_TOLERANCE_SECONDS
        }))
    }

    /// Core slot walk. One `WorkingHours` snapshot covers the whole
    /// computation so a concurrent admin update cannot split it.
    async fn compute_with(
        &self,
        hours: &WorkingHours,
        date: NaiveDate,
        duration_minutes: i64,
        exclude_booking_id: Option<i64>,
    ) -> BookingResult<Vec<DateTime<Utc>>> {
        let tz = hours.tz()?;
        let work_start = localize(tz, date.and_time(hours.start_time));
        let work_end = localize(tz, date.and_time(hours.end_time));

        let now = self.clock.now_utc().with_timezone(&tz);

        // Same-day trimming: never offer slots in the past or inside
        // the minimum lead window, and re-align the trimmed start to
        // the slot step.
        let mut effective_start = work_start;
        if date == now.date_naive() {
            let lead = hours.buffer_minutes.max(MIN_SAME_DAY_LEAD_MINUTES);
            let earliest = now + Duration::minutes(lead);
            if earliest > effective_start {
                effective_start = localize(
                    tz,
                    round_up_to_step(earliest.naive_local(), hours.slot_step_minutes),
                );
            }
            if effective_start >= work_end {
                return Ok(Vec::new());
            }
        }

        let day_start = localize(tz, date.and_time(NaiveTime::MIN)).with_timezone(&Utc);
        let day_end = localize(tz, (date + Duration::days(1)).and_time(NaiveTime::MIN))
            .with_timezone(&Utc);

        let occupied: Vec<TimeSlot> = self
            .bookings
            .blocking_in_range(day_start, day_end)
            .await?
            .into_iter()
            .filter(|b| exclude_booking_id != Some(b.id))
            .map(|b| {
                TimeSlot::new(
                    b.start_time,
                    b.start_time + Duration::minutes(b.duration_minutes + hours.buffer_minutes),
                )
            })
            .collect();

        let total = Duration::minutes(duration_minutes + hours.buffer_minutes);
        let step = Duration::minutes(hours.slot_step_minutes);

        let mut slots = Vec::new();
        let mut current = effective_start;
        while current + total <= work_end {
            let candidate = TimeSlot::new(
                current.with_timezone(&Utc),
                (current + total).with_timezone(&Utc),
            );
            if !occupied.iter().any(|busy| candidate.overlaps(busy)) {
                slots.push(candidate.start);
            }
            current = current + step;
        }

        Ok(slots)
    }
}

/// Round up to the next multiple of `step_minutes` on the minute of
/// hour, carrying into the next hour when rounding crosses 60. Times
/// already on a boundary are unchanged.
fn round_up_to_step(naive: NaiveDateTime, step_minutes: i64) -> NaiveDateTime {
    let truncated = truncate_to_minute(naive);
    let rem = (truncated.minute() as i64) % step_minutes;
    let sub_minute = naive > truncated;

    if rem == 0 && !sub_minute {
        truncated
    } else if rem == 0 {
        truncated + Duration::minutes(step_minutes)
    } else {
        truncated + Duration::minutes(step_minutes - rem)
    }
}

/// Round down to the previous multiple of `step_minutes` on the minute
/// of hour.
fn round_down_to_step(naive: NaiveDateTime, step_minutes: i64) -> NaiveDateTime {
    let truncated = truncate_to_minute(naive);
    let rem = (truncated.minute() as i64) % step_minutes;
    truncated - Duration::minutes(rem)
}

fn truncate_to_minute(naive: NaiveDateTime) -> NaiveDateTime {
    naive
        - Duration::seconds(naive.second() as i64)
        - Duration::nanoseconds(naive.nanosecond() as i64)
}
