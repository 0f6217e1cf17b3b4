use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::reminder::ReminderKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Mechanic,
    Customer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Mechanic => "mechanic",
            UserRole::Customer => "customer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(UserRole::Admin),
            "mechanic" => Some(UserRole::Mechanic),
            "customer" => Some(UserRole::Customer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub display_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub remind_3h: bool,
    pub remind_1h: bool,
    pub remind_30m: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether this user wants the given reminder threshold.
    pub fn reminder_enabled(&self, kind: ReminderKind) -> bool {
        match kind {
            ReminderKind::ThreeHours => self.remind_3h,
            ReminderKind::OneHour => self.remind_1h,
            ReminderKind::ThirtyMinutes => self.remind_30m,
        }
    }
}
