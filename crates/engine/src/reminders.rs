//! Background scheduler that dispatches booking reminders to mechanics.
//!
//! A single long-lived task wakes every [`CHECK_INTERVAL`], scans
//! accepted future bookings, and fires each 3h/1h/30m reminder at most
//! once. The per-booking sent flags are the sole de-duplication
//! mechanism: all flags recorded during one scan are committed together
//! at the end, and if that commit fails after a successful dispatch the
//! next cycle may deliver a duplicate. That tradeoff is accepted over
//! holding a transaction open across notification I/O.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use wrenchtime_core::errors::BookingResult;
use wrenchtime_core::models::{ReminderKind, REMINDER_RULES};
use wrenchtime_core::stores::{BookingStore, UserStore};

use crate::clock::Clock;
use crate::notify::{BookingEvent, Notifier};

/// How often the scan runs.
pub const CHECK_INTERVAL: StdDuration = StdDuration::from_secs(60);

/// Symmetric tolerance around each threshold. Covers the polling
/// granularity and clock drift without firing far too early or missing
/// the window entirely.
const SEND_WINDOW_MINUTES: i64 = 5;

/// Grace period for a cooperative stop before the task is aborted.
const STOP_TIMEOUT: StdDuration = StdDuration::from_secs(10);

/// Pause after a failed cycle so a persistent fault does not spin.
const ERROR_BACKOFF: StdDuration = StdDuration::from_secs(5);

struct SchedulerInner {
    bookings: Arc<dyn BookingStore>,
    users: Arc<dyn UserStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

pub struct ReminderScheduler {
    inner: Arc<SchedulerInner>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ReminderScheduler {
    pub fn new(
        bookings: Arc<dyn BookingStore>,
        users: Arc<dyn UserStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        ReminderScheduler {
            inner: Arc::new(SchedulerInner {
                bookings,
                users,
                notifier,
                clock,
            }),
            cancel: CancellationToken::new(),
            task: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Spawn the scan loop. Idempotent; a second call is a no-op.
    pub fn start(&mut self) {
        if self.task.is_some() {
            warn!("reminder scheduler is already running");
            return;
        }
        let inner = Arc::clone(&self.inner);
        let cancel = self.cancel.clone();
        self.task = Some(tokio::spawn(run_loop(inner, cancel)));
        info!("reminder scheduler started");
    }

    /// Cooperative shutdown: signal the loop, wait up to the grace
    /// period, then abort the task outright.
    pub async fn stop(&mut self) {
        let Some(mut task) = self.task.take() else {
            return;
        };

        info!("stopping reminder scheduler...");
        self.cancel.cancel();

        match tokio::time::timeout(STOP_TIMEOUT, &mut task).await {
            Ok(_) => info!("reminder scheduler stopped"),
            Err(_) => {
                warn!(
                    timeout_secs = STOP_TIMEOUT.as_secs(),
                    "reminder scheduler did not stop in time, aborting task"
                );
                task.abort();
                let _ = task.await;
            }
        }

        self.cancel = CancellationToken::new();
    }

    /// Run one scan immediately. The loop calls this on every tick;
    /// tests drive it directly. Returns the number of reminders
    /// dispatched.
    pub async fn run_cycle(&self) -> BookingResult<usize> {
        process_cycle(&self.inner).await
    }
}

async fn run_loop(inner: Arc<SchedulerInner>, cancel: CancellationToken) {
    info!("reminder scheduler loop started");
    let mut interval = tokio::time::interval(CHECK_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("reminder scheduler loop stopping");
                break;
            }
            _ = interval.tick() => {
                match process_cycle(&inner).await {
                    Ok(dispatched) => {
                        if dispatched > 0 {
                            debug!(dispatched, "reminder cycle complete");
                        }
                    }
                    Err(err) => {
                        error!(error = %err, "reminder cycle failed");
                        tokio::select! {
                            _ = cancel.cancelled() => break,
                            _ = tokio::time::sleep(ERROR_BACKOFF) => {}
                        }
                    }
                }
            }
        }
    }

    info!("reminder scheduler loop ended");
}

async fn process_cycle(inner: &SchedulerInner) -> BookingResult<usize> {
    let now = inner.clock.now_utc();
    let bookings = inner.bookings.accepted_starting_after(now).await?;

    let mut sent: Vec<(i64, ReminderKind)> = Vec::new();
    for booking in bookings {
        let Some(mechanic_id) = booking.mechanic_id else {
            continue;
        };
        let mechanic = match inner.users.get(mechanic_id).await {
            Ok(Some(user)) if user.is_active => user,
            Ok(_) => continue,
            Err(err) => {
                error!(
                    booking_id = booking.id,
                    mechanic_id,
                    error = %err,
                    "could not load mechanic for reminder"
                );
                continue;
            }
        };

        let delta = booking.start_time - now;
        if delta <= Duration::zero() {
            continue;
        }

        for rule in REMINDER_RULES {
            if !mechanic.reminder_enabled(rule.kind) {
                continue;
            }
            if booking.reminder_sent(rule.kind) {
                continue;
            }
            if !within_send_window(delta, rule.threshold()) {
                continue;
            }

            let event = BookingEvent::ReminderDue {
                booking: booking.clone(),
                kind: rule.kind,
            };
            match inner.notifier.notify(&mechanic, &event).await {
                Ok(()) => sent.push((booking.id, rule.kind)),
                Err(err) => {
                    // One failed dispatch must not sink the scan; the
                    // flag stays clear so the next cycle retries.
                    error!(
                        booking_id = booking.id,
                        rule = rule.kind.as_str(),
                        error = %err,
                        "reminder dispatch failed"
                    );
                }
            }
        }
    }

    let dispatched = sent.len();
    if !sent.is_empty() {
        inner.bookings.mark_reminders_sent(&sent).await?;
    }

    Ok(dispatched)
}

/// A reminder is due when the remaining lead time sits inside the
/// tolerance window around its threshold.
fn within_send_window(delta: Duration, threshold: Duration) -> bool {
    let window = Duration::minutes(SEND_WINDOW_MINUTES);
    threshold - window <= delta && delta <= threshold + window
}
