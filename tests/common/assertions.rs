//! Custom assertions for payload testing.
//!
//! Provides domain-specific assertions that make tests more readable
//! and provide better error messages.

use qrpayload::{ErrorKind, PayloadResult};

/// Asserts that `result` failed with the given kind.
///
/// # Panics
/// Panics if the result is `Ok` or carries a different kind.
pub fn assert_error_kind<T: std::fmt::Debug>(result: PayloadResult<T>, expected: ErrorKind) {
    match result {
        Ok(value) => panic!("expected {:?} error, got Ok({:?})", expected, value),
        Err(err) => assert_eq!(
            err.kind(),
            expected,
            "expected {:?} but got {:?}: {}",
            expected,
            err.kind(),
            err
        ),
    }
}

/// Asserts that `result` failed on `field` with the given kind.
pub fn assert_field_error<T: std::fmt::Debug>(
    result: PayloadResult<T>,
    field: &str,
    expected: ErrorKind,
) {
    match result {
        Ok(value) => panic!("expected error on '{}', got Ok({:?})", field, value),
        Err(err) => {
            assert_eq!(err.kind(), expected, "wrong kind for '{}': {}", field, err);
            assert_eq!(err.field(), field, "wrong field: {}", err);
        }
    }
}

/// Returns the first content line whose property name is `name`
/// (`NAME:` or `NAME;...:`) in a CRLF-separated vCard/iCalendar payload.
pub fn property<'a>(payload: &'a str, name: &str) -> Option<&'a str> {
    payload.split("\r\n").find_map(|line| {
        let rest = line.strip_prefix(name)?;
        if rest.starts_with(':') || rest.starts_with(';') {
            Some(line)
        } else {
            None
        }
    })
}

/// Asserts that every line of a vCard/iCalendar payload is CRLF-terminated
/// (no bare LF anywhere).
pub fn assert_crlf_only(payload: &str) {
    for (i, segment) in payload.split("\r\n").enumerate() {
        assert!(
            !segment.contains('\n') && !segment.contains('\r'),
            "line {} contains a bare line break: {:?}",
            i,
            segment
        );
    }
}
