use chrono::{DateTime, NaiveTime, Utc};
use eyre::eyre;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use wrenchtime_core::models::{
    Booking, BookingDetails, BookingStatus, Service, User, UserRole, WorkingHours,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub display_name: String,
    pub role: String,
    pub is_active: bool,
    pub remind_3h: bool,
    pub remind_1h: bool,
    pub remind_30m: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbUser> for User {
    type Error = eyre::Report;

    fn try_from(row: DbUser) -> Result<Self, Self::Error> {
        let role =
            UserRole::parse(&row.role).ok_or_else(|| eyre!("unknown user role {:?}", row.role))?;
        Ok(User {
            id: row.id,
            display_name: row.display_name,
            role,
            is_active: row.is_active,
            remind_3h: row.remind_3h,
            remind_1h: row.remind_1h,
            remind_30m: row.remind_30m,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub id: i64,
    pub name: String,
    pub duration_minutes: i64,
    pub price: Option<f64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbService> for Service {
    fn from(row: DbService) -> Self {
        Service {
            id: row.id,
            name: row.name,
            duration_minutes: row.duration_minutes,
            price: row.price,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: i64,
    pub creator_id: i64,
    pub mechanic_id: Option<i64>,
    pub service_id: i64,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub status: String,
    pub proposed_start_time: Option<DateTime<Utc>>,
    pub car_brand: String,
    pub car_model: String,
    pub car_plate: String,
    pub client_name: String,
    pub client_phone: String,
    pub sent_3h: bool,
    pub sent_1h: bool,
    pub sent_30m: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbBooking> for Booking {
    type Error = eyre::Report;

    fn try_from(row: DbBooking) -> Result<Self, Self::Error> {
        let status = BookingStatus::parse(&row.status)
            .ok_or_else(|| eyre!("unknown booking status {:?}", row.status))?;
        Ok(Booking {
            id: row.id,
            creator_id: row.creator_id,
            mechanic_id: row.mechanic_id,
            service_id: row.service_id,
            start_time: row.start_time,
            duration_minutes: row.duration_minutes,
            status,
            proposed_start_time: row.proposed_start_time,
            details: BookingDetails {
                car_brand: row.car_brand,
                car_model: row.car_model,
                car_plate: row.car_plate,
                client_name: row.client_name,
                client_phone: row.client_phone,
            },
            sent_3h: row.sent_3h,
            sent_1h: row.sent_1h,
            sent_30m: row.sent_30m,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSettings {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_step_minutes: i64,
    pub buffer_minutes: i64,
    pub days_ahead: i64,
    pub timezone: String,
    pub updated_at: DateTime<Utc>,
}

impl From<DbSettings> for WorkingHours {
    fn from(row: DbSettings) -> Self {
        WorkingHours {
            start_time: row.start_time,
            end_time: row.end_time,
            slot_step_minutes: row.slot_step_minutes,
            buffer_minutes: row.buffer_minutes,
            days_ahead: row.days_ahead,
            timezone: row.timezone,
            updated_at: row.updated_at,
        }
    }
}
