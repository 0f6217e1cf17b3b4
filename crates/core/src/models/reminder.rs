use chrono::Duration;
use serde::{Deserialize, Serialize};

/// The closed set of reminder lead times. Not user-extensible; each
/// kind maps to one preference flag on the mechanic and one sent flag
/// on the booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    ThreeHours,
    OneHour,
    ThirtyMinutes,
}

impl ReminderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderKind::ThreeHours => "3h",
            ReminderKind::OneHour => "1h",
            ReminderKind::ThirtyMinutes => "30m",
        }
    }
}

/// One reminder threshold. `threshold_minutes` is the lead time before
/// the booking start at which the reminder becomes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderRule {
    pub kind: ReminderKind,
    pub threshold_minutes: i64,
}

impl ReminderRule {
    pub fn threshold(&self) -> Duration {
        Duration::minutes(self.threshold_minutes)
    }
}

/// Rules in dispatch order: furthest lead time first.
pub const REMINDER_RULES: [ReminderRule; 3] = [
    ReminderRule {
        kind: ReminderKind::ThreeHours,
        threshold_minutes: 180,
    },
    ReminderRule {
        kind: ReminderKind::OneHour,
        threshold_minutes: 60,
    },
    ReminderRule {
        kind: ReminderKind::ThirtyMinutes,
        threshold_minutes: 30,
    },
];
