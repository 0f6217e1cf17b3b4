//! The booking state machine.
//!
//! Transitions: Pending -> Accepted | Rejected; Accepted <-> Negotiating
//! (either party proposes, the creator confirms); the creator may cancel
//! from any non-terminal state. Every mutating operation re-validates
//! its precondition in the same store write (compare-and-swap), so a
//! concurrent mutation surfaces as `InvalidState`/`SlotTaken` instead of
//! a lost update.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;
use wrenchtime_core::errors::{BookingError, BookingResult};
use wrenchtime_core::models::{Booking, BookingDetails, NewBooking, Service, User};
use wrenchtime_core::stores::{BookingStore, ServiceStore, UserStore};

use crate::notify::{BookingEvent, Notifier};
use crate::slots::SlotCalculator;

const DEFAULT_LIST_LIMIT: i64 = 50;

#[derive(Clone)]
pub struct BookingService {
    bookings: Arc<dyn BookingStore>,
    services: Arc<dyn ServiceStore>,
    users: Arc<dyn UserStore>,
    notifier: Arc<dyn Notifier>,
    slots: SlotCalculator,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingStore>,
        services: Arc<dyn ServiceStore>,
        users: Arc<dyn UserStore>,
        notifier: Arc<dyn Notifier>,
        slots: SlotCalculator,
    ) -> Self {
        BookingService {
            bookings,
            services,
            users,
            notifier,
            slots,
        }
    }

    /// Create a booking in Pending status.
    ///
    /// Availability is re-checked here, at commit time, because the
    /// slot list the user picked from may be stale by the time they
    /// answer.
    pub async fn create_booking(
        &self,
        creator_id: i64,
        service_id: i64,
        start_time: DateTime<Utc>,
        details: BookingDetails,
    ) -> BookingResult<Booking> {
        self.users
            .get(creator_id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("user {creator_id} not found")))?;

        let service = self
            .services
            .get(service_id)
            .await?
            .filter(|s| s.is_active)
            .ok_or_else(|| {
                BookingError::ServiceUnavailable(format!(
                    "service {service_id} is missing or inactive"
                ))
            })?;

        if !self
            .slots
            .is_available(start_time, service.duration_minutes, None)
            .await?
        {
            return Err(BookingError::SlotTaken(format!(
                "{start_time} is not available"
            )));
        }

        let booking = self
            .bookings
            .insert(NewBooking {
                creator_id,
                service_id,
                start_time,
                duration_minutes: service.duration_minutes,
                details,
            })
            .await?;

        // Fan out to every active mechanic so someone picks it up.
        let mechanics = self.users.active_mechanics().await?;
        for mechanic in &mechanics {
            self.dispatch(
                mechanic,
                &BookingEvent::Created {
                    booking: booking.clone(),
                },
            )
            .await;
        }

        Ok(booking)
    }

    /// Mechanic takes a pending booking.
    pub async fn accept_booking(
        &self,
        booking_id: i64,
        mechanic_id: i64,
    ) -> BookingResult<Booking> {
        self.users
            .get(mechanic_id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("user {mechanic_id} not found")))?;

        self.require_booking(booking_id).await?;

        let updated = self
            .bookings
            .accept(booking_id, mechanic_id)
            .await?
            .ok_or_else(|| {
                BookingError::InvalidState(format!("booking {booking_id} is not pending"))
            })?;

        self.notify_creator(&updated, BookingEvent::Accepted {
            booking: updated.clone(),
        })
        .await;

        Ok(updated)
    }

    /// Mechanic turns down a pending booking. No mechanic is assigned.
    pub async fn reject_booking(
        &self,
        booking_id: i64,
        mechanic_id: i64,
    ) -> BookingResult<Booking> {
        self.users
            .get(mechanic_id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("user {mechanic_id} not found")))?;

        self.require_booking(booking_id).await?;

        let updated = self.bookings.reject(booking_id).await?.ok_or_else(|| {
            BookingError::InvalidState(format!("booking {booking_id} is not pending"))
        })?;

        self.notify_creator(&updated, BookingEvent::Rejected {
            booking: updated.clone(),
        })
        .await;

        Ok(updated)
    }

    /// Either party proposes a different time for an accepted booking,
    /// moving it into negotiation. The booking's own current slot is
    /// excluded from the availability check so proposals overlapping it
    /// succeed.
    pub async fn propose_time(
        &self,
        booking_id: i64,
        proposer_id: i64,
        new_time: DateTime<Utc>,
    ) -> BookingResult<Booking> {
        let booking = self.require_booking(booking_id).await?;

        let is_creator = booking.creator_id == proposer_id;
        let is_assigned_mechanic = booking.mechanic_id == Some(proposer_id);
        if !is_creator && !is_assigned_mechanic {
            return Err(BookingError::Unauthorized(format!(
                "user {proposer_id} is neither the creator nor the assigned mechanic"
            )));
        }

        if !self
            .slots
            .is_available(new_time, booking.duration_minutes, Some(booking_id))
            .await?
        {
            return Err(BookingError::SlotTaken(format!(
                "{new_time} is not available"
            )));
        }

        let updated = self
            .bookings
            .propose_time(booking_id, new_time)
            .await?
            .ok_or_else(|| {
                BookingError::InvalidState(format!(
                    "booking {booking_id} is not accepted or negotiating"
                ))
            })?;

        // Tell the party that did not make the proposal.
        if is_creator {
            if let Some(mechanic_id) = updated.mechanic_id {
                self.notify_user(mechanic_id, &updated, |booking| BookingEvent::TimeProposed {
                    booking,
                })
                .await;
            }
        } else {
            self.notify_creator(&updated, BookingEvent::TimeProposed {
                booking: updated.clone(),
            })
            .await;
        }

        Ok(updated)
    }

    /// Creator accepts the proposed time; it becomes the booking's
    /// start time and the proposal is cleared.
    pub async fn confirm_time(&self, booking_id: i64, requester_id: i64) -> BookingResult<Booking> {
        let booking = self.require_booking(booking_id).await?;

        if booking.creator_id != requester_id {
            return Err(BookingError::Unauthorized(format!(
                "user {requester_id} is not the creator of booking {booking_id}"
            )));
        }

        let updated = self
            .bookings
            .confirm_proposed(booking_id)
            .await?
            .ok_or_else(|| {
                BookingError::InvalidState(format!(
                    "booking {booking_id} has no proposed time awaiting confirmation"
                ))
            })?;

        if let Some(mechanic_id) = updated.mechanic_id {
            self.notify_user(mechanic_id, &updated, |booking| BookingEvent::TimeConfirmed {
                booking,
            })
            .await;
        }

        Ok(updated)
    }

    /// Creator withdraws the booking. Valid from any non-terminal state.
    pub async fn cancel_booking(
        &self,
        booking_id: i64,
        requester_id: i64,
    ) -> BookingResult<Booking> {
        let booking = self.require_booking(booking_id).await?;

        if booking.creator_id != requester_id {
            return Err(BookingError::Unauthorized(format!(
                "user {requester_id} is not the creator of booking {booking_id}"
            )));
        }

        self.bookings.cancel(booking_id).await?.ok_or_else(|| {
            BookingError::InvalidState(format!("booking {booking_id} is already closed"))
        })
    }

    pub async fn booking_details(&self, booking_id: i64) -> BookingResult<Booking> {
        self.require_booking(booking_id).await
    }

    /// Services currently offered for booking.
    pub async fn available_services(&self) -> BookingResult<Vec<Service>> {
        self.services.list_active().await
    }

    pub async fn pending_bookings(&self) -> BookingResult<Vec<Booking>> {
        self.bookings.pending().await
    }

    pub async fn bookings_for_creator(&self, creator_id: i64) -> BookingResult<Vec<Booking>> {
        self.bookings.by_creator(creator_id, DEFAULT_LIST_LIMIT).await
    }

    pub async fn bookings_for_mechanic(&self, mechanic_id: i64) -> BookingResult<Vec<Booking>> {
        self.bookings.by_mechanic(mechanic_id, DEFAULT_LIST_LIMIT).await
    }

    async fn require_booking(&self, booking_id: i64) -> BookingResult<Booking> {
        self.bookings
            .get(booking_id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("booking {booking_id} not found")))
    }

    async fn notify_creator(&self, booking: &Booking, event: BookingEvent) {
        match self.users.get(booking.creator_id).await {
            Ok(Some(creator)) => self.dispatch(&creator, &event).await,
            Ok(None) => {}
            Err(err) => warn!(
                booking_id = booking.id,
                error = %err,
                "could not resolve creator for notification"
            ),
        }
    }

    async fn notify_user(
        &self,
        user_id: i64,
        booking: &Booking,
        make_event: impl FnOnce(Booking) -> BookingEvent,
    ) {
        match self.users.get(user_id).await {
            Ok(Some(user)) => self.dispatch(&user, &make_event(booking.clone())).await,
            Ok(None) => {}
            Err(err) => warn!(
                booking_id = booking.id,
                user_id,
                error = %err,
                "could not resolve recipient for notification"
            ),
        }
    }

    async fn dispatch(&self, recipient: &User, event: &BookingEvent) {
        if let Err(err) = self.notifier.notify(recipient, event).await {
            warn!(
                recipient_id = recipient.id,
                event = event.kind_str(),
                error = %err,
                "notification delivery failed"
            );
        }
    }
}
