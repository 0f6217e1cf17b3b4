//! # Wrenchtime Engine
//!
//! The slot-allocation and negotiation engine for the repair-shop
//! booking system. It computes free appointment slots from working
//! hours and existing bookings, drives the booking state machine
//! (creation, mechanic accept/reject, time negotiation), and runs the
//! background reminder scheduler.
//!
//! ## Architecture
//!
//! The engine is a library: persistence, notification delivery and the
//! chat presentation layer are collaborators injected through the
//! traits in [`wrenchtime_core::stores`] and [`notify::Notifier`].
//!
//! - **Clock**: timezone-aware "now" supplier, injectable for tests
//! - **SlotCalculator**: free-slot computation and the availability
//!   check, sharing one overlap/rounding primitive
//! - **BookingService**: status transitions with commit-time
//!   re-validation
//! - **ReminderScheduler**: periodic scan dispatching 3h/1h/30m
//!   reminders at most once each

pub mod booking;
pub mod clock;
pub mod config;
pub mod notify;
pub mod reminders;
pub mod slots;

pub use booking::BookingService;
pub use clock::{Clock, SystemClock};
pub use config::AppConfig;
pub use notify::{BookingEvent, Notifier, TracingNotifier};
pub use reminders::ReminderScheduler;
pub use slots::SlotCalculator;
