use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;

use wrenchtime_core::errors::BookingResult;
use wrenchtime_core::models::{Booking, NewBooking, ReminderKind, Service, User, WorkingHours};
use wrenchtime_core::stores::{BookingStore, ServiceStore, SettingsStore, UserStore};

// Mock repositories for testing

mock! {
    pub BookingRepo {}

    #[async_trait]
    impl BookingStore for BookingRepo {
        async fn get(&self, id: i64) -> BookingResult<Option<Booking>>;
        async fn insert(&self, new: NewBooking) -> BookingResult<Booking>;
        async fn blocking_in_range(
            &self,
            from: DateTime<Utc>,
            until: DateTime<Utc>,
        ) -> BookingResult<Vec<Booking>>;
        async fn accept(&self, id: i64, mechanic_id: i64) -> BookingResult<Option<Booking>>;
        async fn reject(&self, id: i64) -> BookingResult<Option<Booking>>;
        async fn propose_time(
            &self,
            id: i64,
            proposed: DateTime<Utc>,
        ) -> BookingResult<Option<Booking>>;
        async fn confirm_proposed(&self, id: i64) -> BookingResult<Option<Booking>>;
        async fn cancel(&self, id: i64) -> BookingResult<Option<Booking>>;
        async fn accepted_starting_after(
            &self,
            now: DateTime<Utc>,
        ) -> BookingResult<Vec<Booking>>;
        async fn mark_reminders_sent(
            &self,
            sent: &[(i64, ReminderKind)],
        ) -> BookingResult<()>;
        async fn pending(&self) -> BookingResult<Vec<Booking>>;
        async fn by_creator(&self, creator_id: i64, limit: i64) -> BookingResult<Vec<Booking>>;
        async fn by_mechanic(&self, mechanic_id: i64, limit: i64) -> BookingResult<Vec<Booking>>;
    }
}

mock! {
    pub ServiceRepo {}

    #[async_trait]
    impl ServiceStore for ServiceRepo {
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
}

mock! {
    pub UserRepo {}

    #[async_trait]
    impl UserStore for UserRepo {
        async fn get(&self, id: i64) -> BookingResult<Option<User>>;
        async fn active_mechanics(&self) -> BookingResult<Vec<User>>;
    }
}

mock! {
    pub SettingsRepo {}

    #[async_trait]
    impl SettingsStore for SettingsRepo {
        async fn get(&self) -> BookingResult<WorkingHours>;
        async fn update(&self, hours: WorkingHours) -> BookingResult<WorkingHours>;
    }
}
