use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::reminder::ReminderKind;

/// Lifecycle of a booking.
///
/// Pending bookings wait for a mechanic; Negotiating carries a proposed
/// alternative time awaiting the creator's confirmation. Rejected,
/// Completed and Cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Negotiating,
    Accepted,
    Rejected,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Statuses that occupy calendar time when computing free slots.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            BookingStatus::Pending | BookingStatus::Negotiating | BookingStatus::Accepted
        )
    }

    /// Terminal statuses permit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Rejected | BookingStatus::Completed | BookingStatus::Cancelled
        )
    }

    /// Stable string encoding used by the database layer.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Negotiating => "negotiating",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "negotiating" => Some(BookingStatus::Negotiating),
            "accepted" => Some(BookingStatus::Accepted),
            "rejected" => Some(BookingStatus::Rejected),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

/// Vehicle and client information attached to a booking. Opaque to the
/// scheduling engine; the chat layer collects and renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDetails {
    pub car_brand: String,
    pub car_model: String,
    pub car_plate: String,
    pub client_name: String,
    pub client_phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub creator_id: i64,
    pub mechanic_id: Option<i64>,
    pub service_id: i64,
    pub start_time: DateTime<Utc>,
    /// Service duration copied at creation time. Later edits to the
    /// service definition do not retroactively change this booking.
    pub duration_minutes: i64,
    pub status: BookingStatus,
    /// Set only while `status == Negotiating`.
    pub proposed_start_time: Option<DateTime<Utc>>,
    pub details: BookingDetails,
    pub sent_3h: bool,
    pub sent_1h: bool,
    pub sent_30m: bool,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + Duration::minutes(self.duration_minutes)
    }

    pub fn reminder_sent(&self, kind: ReminderKind) -> bool {
        match kind {
            ReminderKind::ThreeHours => self.sent_3h,
            ReminderKind::OneHour => self.sent_1h,
            ReminderKind::ThirtyMinutes => self.sent_30m,
        }
    }

    pub fn set_reminder_sent(&mut self, kind: ReminderKind) {
        match kind {
            ReminderKind::ThreeHours => self.sent_3h = true,
            ReminderKind::OneHour => self.sent_1h = true,
            ReminderKind::ThirtyMinutes => self.sent_30m = true,
        }
    }
}

/// Insert payload for a new booking. Status is always Pending on
/// creation; the state machine owns every later transition.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub creator_id: i64,
    pub service_id: i64,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub details: BookingDetails,
}
