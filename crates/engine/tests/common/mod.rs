#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use eyre::eyre;
use wrenchtime_core::errors::BookingResult;
use wrenchtime_core::models::{
    Booking, BookingDetails, BookingStatus, NewBooking, ReminderKind, Service, User, UserRole,
    WorkingHours,
};
use wrenchtime_core::stores::{BookingStore, ServiceStore, SettingsStore, UserStore};
use wrenchtime_engine::notify::{BookingEvent, Notifier};
use wrenchtime_engine::{BookingService, Clock, ReminderScheduler, SlotCalculator};

pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        FixedClock {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().unwrap();
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[derive(Default)]
pub struct InMemoryBookingStore {
    bookings: Mutex<HashMap<i64, Booking>>,
    next_id: AtomicI64,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        InMemoryBookingStore {
            bookings: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn put(&self, booking: Booking) {
        self.bookings.lock().unwrap().insert(booking.id, booking);
    }

    pub fn snapshot(&self, id: i64) -> Option<Booking> {
        self.bookings.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn get(&self, id: i64) -> BookingResult<Option<Booking>> {
        Ok(self.snapshot(id))
    }

    async fn insert(&self, new: NewBooking) -> BookingResult<Booking> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let booking = Booking {
            id,
            creator_id: new.creator_id,
            mechanic_id: None,
            service_id: new.service_id,
            start_time: new.start_time,
            duration_minutes: new.duration_minutes,
            status: BookingStatus::Pending,
            proposed_start_time: None,
            details: new.details,
            sent_3h: false,
            sent_1h: false,
            sent_30m: false,
            created_at: Utc::now(),
        };
        self.put(booking.clone());
        Ok(booking)
    }

    async fn blocking_in_range(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> BookingResult<Vec<Booking>> {
        let mut rows: Vec<Booking> = self
            .bookings
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.status.is_blocking() && b.start_time >= from && b.start_time < until)
            .cloned()
            .collect();
        rows.sort_by_key(|b| b.start_time);
        Ok(rows)
    }

    async fn accept(&self, id: i64, mechanic_id: i64) -> BookingResult<Option<Booking>> {
        let mut guard = self.bookings.lock().unwrap();
        let Some(booking) = guard.get_mut(&id) else {
            return Ok(None);
        };
        if booking.status != BookingStatus::Pending {
            return Ok(None);
        }
        booking.status = BookingStatus::Accepted;
        booking.mechanic_id = Some(mechanic_id);
        Ok(Some(booking.clone()))
    }

    async fn reject(&self, id: i64) -> BookingResult<Option<Booking>> {
        let mut guard = self.bookings.lock().unwrap();
        let Some(booking) = guard.get_mut(&id) else {
            return Ok(None);
        };
        if booking.status != BookingStatus::Pending {
            return Ok(None);
        }
        booking.status = BookingStatus::Rejected;
        Ok(Some(booking.clone()))
    }

    async fn propose_time(
        &self,
        id: i64,
        proposed: DateTime<Utc>,
    ) -> BookingResult<Option<Booking>> {
        let mut guard = self.bookings.lock().unwrap();
        let Some(booking) = guard.get_mut(&id) else {
            return Ok(None);
        };
        if !matches!(
            booking.status,
            BookingStatus::Accepted | BookingStatus::Negotiating
        ) {
            return Ok(None);
        }
        booking.status = BookingStatus::Negotiating;
        booking.proposed_start_time = Some(proposed);
        Ok(Some(booking.clone()))
    }

    async fn confirm_proposed(&self, id: i64) -> BookingResult<Option<Booking>> {
        let mut guard = self.bookings.lock().unwrap();
        let Some(booking) = guard.get_mut(&id) else {
            return Ok(None);
        };
        let Some(proposed) = booking.proposed_start_time else {
            return Ok(None);
        };
        if booking.status != BookingStatus::Negotiating {
            return Ok(None);
        }
        booking.start_time = proposed;
        booking.proposed_start_time = None;
        booking.status = BookingStatus::Accepted;
        Ok(Some(booking.clone()))
    }

    async fn cancel(&self, id: i64) -> BookingResult<Option<Booking>> {
        let mut guard = self.bookings.lock().unwrap();
        let Some(booking) = guard.get_mut(&id) else {
            return Ok(None);
        };
        if booking.status.is_terminal() {
            return Ok(None);
        }
        booking.status = BookingStatus::Cancelled;
        Ok(Some(booking.clone()))
    }

    async fn accepted_starting_after(&self, now: DateTime<Utc>) -> BookingResult<Vec<Booking>> {
        let mut rows: Vec<Booking> = self
            .bookings
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.status == BookingStatus::Accepted && b.start_time > now)
            .cloned()
            .collect();
        rows.sort_by_key(|b| b.start_time);
        Ok(rows)
    }

    async fn mark_reminders_sent(&self, sent: &[(i64, ReminderKind)]) -> BookingResult<()> {
        let mut guard = self.bookings.lock().unwrap();
        for (id, kind) in sent {
            if let Some(booking) = guard.get_mut(id) {
                booking.set_reminder_sent(*kind);
            }
        }
        Ok(())
    }

    async fn pending(&self) -> BookingResult<Vec<Booking>> {
        let mut rows: Vec<Booking> = self
            .bookings
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.status == BookingStatus::Pending)
            .cloned()
            .collect();
        rows.sort_by_key(|b| std::cmp::Reverse(b.created_at));
        Ok(rows)
    }

    async fn by_creator(&self, creator_id: i64, limit: i64) -> BookingResult<Vec<Booking>> {
        let mut rows: Vec<Booking> = self
            .bookings
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.creator_id == creator_id)
            .cloned()
            .collect();
        rows.sort_by_key(|b| std::cmp::Reverse(b.created_at));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn by_mechanic(&self, mechanic_id: i64, limit: i64) -> BookingResult<Vec<Booking>> {
        let mut rows: Vec<Booking> = self
            .bookings
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.mechanic_id == Some(mechanic_id))
            .cloned()
            .collect();
        rows.sort_by_key(|b| b.start_time);
        rows.truncate(limit as usize);
        Ok(rows)
    }
}

#[derive(Default)]
pub struct InMemoryServiceStore {
    services: Mutex<HashMap<i64, Service>>,
    next_id: AtomicI64,
}

impl InMemoryServiceStore {
    pub fn new() -> Self {
        InMemoryServiceStore {
            services: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn put(&self, service: Service) {
        self.services.lock().unwrap().insert(service.id, service);
    }
}

#[async_trait]
impl ServiceStore for InMemoryServiceStore {
    async fn get(&self, id: i64) -> BookingResult<Option<Service>> {
        Ok(self.services.lock().unwrap().get(&id).cloned())
    }

    async fn list_active(&self) -> BookingResult<Vec<Service>> {
        let mut rows: Vec<Service> = self
            .services
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.is_active)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn create(
        &self,
        name: &str,
        duration_minutes: i64,
        price: Option<f64>,
    ) -> BookingResult<Service> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let service = Service {
            id,
            name: name.to_string(),
            duration_minutes,
            price,
            is_active: true,
            created_at: Utc::now(),
        };
        self.put(service.clone());
        Ok(service)
    }

    async fn set_active(&self, id: i64, is_active: bool) -> BookingResult<Option<Service>> {
        let mut guard = self.services.lock().unwrap();
        let Some(service) = guard.get_mut(&id) else {
            return Ok(None);
        };
        service.is_active = is_active;
        Ok(Some(service.clone()))
    }
}

#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<i64, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, user: User) {
        self.users.lock().unwrap().insert(user.id, user);
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get(&self, id: i64) -> BookingResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn active_mechanics(&self) -> BookingResult<Vec<User>> {
        let mut rows: Vec<User> = self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.role == UserRole::Mechanic && u.is_active)
            .cloned()
            .collect();
        rows.sort_by_key(|u| u.id);
        Ok(rows)
    }
}

pub struct InMemorySettingsStore {
    hours: Mutex<WorkingHours>,
}

impl InMemorySettingsStore {
    pub fn new(hours: WorkingHours) -> Self {
        InMemorySettingsStore {
            hours: Mutex::new(hours),
        }
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get(&self) -> BookingResult<WorkingHours> {
        Ok(self.hours.lock().unwrap().clone())
    }

    async fn update(&self, hours: WorkingHours) -> BookingResult<WorkingHours> {
        hours.validate()?;
        let mut guard = self.hours.lock().unwrap();
        *guard = WorkingHours {
            updated_at: Utc::now(),
            ..hours
        };
        Ok(guard.clone())
    }
}

/// Records every delivered event; can be told to fail for specific
/// bookings (or everything) to exercise failure tolerance.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<(i64, BookingEvent)>>,
    fail_bookings: Mutex<HashSet<i64>>,
    fail_all: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, booking_id: i64) {
        self.fail_bookings.lock().unwrap().insert(booking_id);
    }

    pub fn clear_failures(&self) {
        self.fail_bookings.lock().unwrap().clear();
        self.fail_all.store(false, Ordering::SeqCst);
    }

    pub fn fail_all(&self) {
        self.fail_all.store(true, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<(i64, BookingEvent)> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn reminder_count(&self, booking_id: i64, kind: ReminderKind) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, event)| match event {
                BookingEvent::ReminderDue { booking, kind: k } => {
                    booking.id == booking_id && *k == kind
                }
                _ => false,
            })
            .count()
    }
}

/// Dispatch that never completes. Exercises the forced-abort shutdown
/// path.
pub struct HangingNotifier;

#[async_trait]
impl Notifier for HangingNotifier {
    async fn notify(&self, _recipient: &User, _event: &BookingEvent) -> eyre::Result<()> {
        std::future::pending().await
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, recipient: &User, event: &BookingEvent) -> eyre::Result<()> {
        let booking_id = event.booking().id;
        if self.fail_all.load(Ordering::SeqCst)
            || self.fail_bookings.lock().unwrap().contains(&booking_id)
        {
            return Err(eyre!("simulated delivery failure"));
        }
        self.events
            .lock()
            .unwrap()
            .push((recipient.id, event.clone()));
        Ok(())
    }
}

pub fn details() -> BookingDetails {
    BookingDetails {
        car_brand: "Skoda".to_string(),
        car_model: "Octavia".to_string(),
        car_plate: "WX 12345".to_string(),
        client_name: "Jan Kowalski".to_string(),
        client_phone: "+48 600 000 000".to_string(),
    }
}

pub fn mechanic(id: i64) -> User {
    User {
        id,
        display_name: format!("mechanic-{id}"),
        role: UserRole::Mechanic,
        is_active: true,
        remind_3h: true,
        remind_1h: true,
        remind_30m: true,
        created_at: Utc::now(),
    }
}

pub fn customer(id: i64) -> User {
    User {
        id,
        display_name: format!("customer-{id}"),
        role: UserRole::Customer,
        is_active: true,
        remind_3h: true,
        remind_1h: true,
        remind_30m: true,
        created_at: Utc::now(),
    }
}

pub fn service(id: i64, duration_minutes: i64) -> Service {
    Service {
        id,
        name: format!("service-{id}"),
        duration_minutes,
        price: None,
        is_active: true,
        created_at: Utc::now(),
    }
}

pub struct TestEnv {
    pub bookings: Arc<InMemoryBookingStore>,
    pub services: Arc<InMemoryServiceStore>,
    pub users: Arc<InMemoryUserStore>,
    pub settings: Arc<InMemorySettingsStore>,
    pub clock: Arc<FixedClock>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestEnv {
    pub fn new(hours: WorkingHours, now: DateTime<Utc>) -> Self {
        TestEnv {
            bookings: Arc::new(InMemoryBookingStore::new()),
            services: Arc::new(InMemoryServiceStore::new()),
            users: Arc::new(InMemoryUserStore::new()),
            settings: Arc::new(InMemorySettingsStore::new(hours)),
            clock: Arc::new(FixedClock::new(now)),
            notifier: Arc::new(RecordingNotifier::new()),
        }
    }

    pub fn calculator(&self) -> SlotCalculator {
        SlotCalculator::new(
            self.bookings.clone(),
            self.settings.clone(),
            self.clock.clone(),
        )
    }

    pub fn booking_service(&self) -> BookingService {
        BookingService::new(
            self.bookings.clone(),
            self.services.clone(),
            self.users.clone(),
            self.notifier.clone(),
            self.calculator(),
        )
    }

    pub fn scheduler(&self) -> ReminderScheduler {
        ReminderScheduler::new(
            self.bookings.clone(),
            self.users.clone(),
            self.notifier.clone(),
            self.clock.clone(),
        )
    }
}
