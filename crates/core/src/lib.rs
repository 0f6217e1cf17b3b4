//! # Wrenchtime Core
//!
//! Domain models and contracts for the wrenchtime booking engine. This
//! crate holds the pure data types (bookings, services, working hours,
//! time slots, reminder rules), the shared error type, and the store
//! traits that the persistence layer implements. It performs no I/O.

pub mod errors;
pub mod models;
pub mod stores;
