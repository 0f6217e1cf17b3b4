pub mod booking;
pub mod reminder;
pub mod service;
pub mod settings;
pub mod time_slot;
pub mod user;

pub use booking::{Booking, BookingDetails, BookingStatus, NewBooking};
pub use reminder::{ReminderKind, ReminderRule, REMINDER_RULES};
pub use service::Service;
pub use settings::WorkingHours;
pub use time_slot::TimeSlot;
pub use user::{User, UserRole};
