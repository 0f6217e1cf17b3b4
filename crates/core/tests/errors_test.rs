use wrenchtime_core::errors::{BookingError, BookingResult};

#[test]
fn test_booking_error_display() {
    let not_found = BookingError::NotFound("Booking 42 not found".to_string());
    let service = BookingError::ServiceUnavailable("Service 3 is inactive".to_string());
    let slot = BookingError::SlotTaken("2026-03-02 10:10 is occupied".to_string());
    let state = BookingError::InvalidState("booking is not pending".to_string());
    let unauthorized = BookingError::Unauthorized("only the creator may cancel".to_string());
    let validation = BookingError::Validation("slot step must be positive".to_string());
    let database = BookingError::Database(eyre::eyre!("connection refused"));

    assert_eq!(
        not_found.to_string(),
        "Resource not found: Booking 42 not found"
    );
    assert_eq!(
        service.to_string(),
        "Service unavailable: Service 3 is inactive"
    );
    assert_eq!(slot.to_string(), "Slot taken: 2026-03-02 10:10 is occupied");
    assert_eq!(state.to_string(), "Invalid state: booking is not pending");
    assert_eq!(
        unauthorized.to_string(),
        "Unauthorized: only the creator may cancel"
    );
    assert_eq!(
        validation.to_string(),
        "Validation error: slot step must be positive"
    );
    assert!(database.to_string().contains("Database error:"));
}

#[test]
fn test_eyre_report_conversion() {
    let report = eyre::eyre!("query failed");
    let err: BookingError = report.into();
    assert!(matches!(err, BookingError::Database(_)));
}

#[test]
fn test_booking_result() {
    let ok: BookingResult<i32> = Ok(7);
    assert_eq!(ok.unwrap(), 7);

    let err: BookingResult<i32> = Err(BookingError::NotFound("missing".to_string()));
    assert!(err.is_err());
}
