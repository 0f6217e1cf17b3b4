pub mod booking;
pub mod service;
pub mod settings;
pub mod user;

pub use booking::PgBookingStore;
pub use service::PgServiceStore;
pub use settings::PgSettingsStore;
pub use user::PgUserStore;

use wrenchtime_core::errors::BookingError;

/// Map a sqlx failure into the shared error type.
pub(crate) fn db_err(err: sqlx::Error) -> BookingError {
    BookingError::Database(err.into())
}
