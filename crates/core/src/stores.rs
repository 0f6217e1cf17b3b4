//! Store contracts implemented by the persistence layer.
//!
//! Every mutating booking operation is a compare-and-swap: the store
//! applies the write only when the status precondition still holds and
//! returns `Ok(None)` otherwise. This pushes the lost-update race into
//! a single row-level transaction instead of application locks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::BookingResult;
use crate::models::{Booking, NewBooking, ReminderKind, Service, User, WorkingHours};

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn get(&self, id: i64) -> BookingResult<Option<Booking>>;

    async fn insert(&self, new: NewBooking) -> BookingResult<Booking>;

    /// Bookings with a blocking status (pending, negotiating, accepted)
    /// starting inside `[from, until)`, ordered by start time.
    async fn blocking_in_range(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> BookingResult<Vec<Booking>>;

    /// Pending -> Accepted with the mechanic assigned. `None` when the
    /// booking is no longer pending.
    async fn accept(&self, id: i64, mechanic_id: i64) -> BookingResult<Option<Booking>>;

    /// Pending -> Rejected. No mechanic is assigned.
    async fn reject(&self, id: i64) -> BookingResult<Option<Booking>>;

    /// Accepted or Negotiating -> Negotiating with the proposed time
    /// recorded. `None` when the booking is in neither state.
    async fn propose_time(
        &self,
        id: i64,
        proposed: DateTime<Utc>,
    ) -> BookingResult<Option<Booking>>;

    /// Negotiating with a proposal -> Accepted; the proposal becomes
    /// the new start time and is cleared.
    async fn confirm_proposed(&self, id: i64) -> BookingResult<Option<Booking>>;

    /// Any non-terminal status -> Cancelled.
    async fn cancel(&self, id: i64) -> BookingResult<Option<Booking>>;

    /// Accepted bookings with a start time strictly after `now`, for
    /// the reminder scan.
    async fn accepted_starting_after(&self, now: DateTime<Utc>) -> BookingResult<Vec<Booking>>;

    /// Persist sent flags for one reminder scan in a single
    /// transaction.
    async fn mark_reminders_sent(&self, sent: &[(i64, ReminderKind)]) -> BookingResult<()>;

    async fn pending(&self) -> BookingResult<Vec<Booking>>;

    async fn by_creator(&self, creator_id: i64, limit: i64) -> BookingResult<Vec<Booking>>;

    async fn by_mechanic(&self, mechanic_id: i64, limit: i64) -> BookingResult<Vec<Booking>>;
}

#[async_trait]
pub trait ServiceStore: Send + Sync {
    async fn get(&self, id: i64) -> BookingResult<Option<Service>>;

    async fn list_active(&self) -> BookingResult<Vec<Service>>;

    async fn create(
        &self,
        name: &str,
        duration_minutes: i64,
        price: Option<f64>,
    ) -> BookingResult<Service>;

    async fn set_active(&self, id: i64, is_active: bool) -> BookingResult<Option<Service>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, id: i64) -> BookingResult<Option<User>>;

    async fn active_mechanics(&self) -> BookingResult<Vec<User>>;
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// The singleton working-hours row, created with defaults on first
    /// read.
    async fn get(&self) -> BookingResult<WorkingHours>;

    /// Replace the singleton. Implementations validate before writing.
    async fn update(&self, hours: WorkingHours) -> BookingResult<WorkingHours>;
}
