use async_trait::async_trait;
use eyre::Result;
use tracing::info;
use wrenchtime_core::models::{Booking, ReminderKind, User};

/// Semantic events the engine emits. The chat layer owns wording and
/// localization; the engine only names what happened.
#[derive(Debug, Clone)]
pub enum BookingEvent {
    Created { booking: Booking },
    Accepted { booking: Booking },
    Rejected { booking: Booking },
    TimeProposed { booking: Booking },
    TimeConfirmed { booking: Booking },
    ReminderDue { booking: Booking, kind: ReminderKind },
}

impl BookingEvent {
    pub fn booking(&self) -> &Booking {
        match self {
            BookingEvent::Created { booking }
            | BookingEvent::Accepted { booking }
            | BookingEvent::Rejected { booking }
            | BookingEvent::TimeProposed { booking }
            | BookingEvent::TimeConfirmed { booking }
            | BookingEvent::ReminderDue { booking, .. } => booking,
        }
    }

    pub fn kind_str(&self) -> &'static str {
        match self {
            BookingEvent::Created { .. } => "created",
            BookingEvent::Accepted { .. } => "accepted",
            BookingEvent::Rejected { .. } => "rejected",
            BookingEvent::TimeProposed { .. } => "time_proposed",
            BookingEvent::TimeConfirmed { .. } => "time_confirmed",
            BookingEvent::ReminderDue { .. } => "reminder_due",
        }
    }
}

/// Delivery collaborator. Failures are reported to the caller but are
/// never fatal to a booking operation or a reminder scan.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, recipient: &User, event: &BookingEvent) -> Result<()>;
}

/// Notifier that only logs. Used by the daemon binary until a chat
/// transport is wired in, and handy in development.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, recipient: &User, event: &BookingEvent) -> Result<()> {
        info!(
            recipient_id = recipient.id,
            event = event.kind_str(),
            booking_id = event.booking().id,
            "notification dispatched"
        );
        Ok(())
    }
}
