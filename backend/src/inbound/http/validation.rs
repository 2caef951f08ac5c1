//! Request parsing helpers shared by the handlers.
//!
//! Path and body identifiers arrive as strings; malformed ones become
//! validation errors naming the offending field, the same shape the domain
//! produces for invalid form fields.

use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::domain::{Error, FieldErrors};

/// Parse a path or body identifier, reporting `field` on failure.
pub(crate) fn parse_id<T: FromStr>(value: &str, field: &'static str) -> Result<T, Error> {
    let mut errors = FieldErrors::new();
    match errors.collect(field, parse_field(value, field)) {
        Some(id) => Ok(id),
        None => Err(Error::validation(&errors)),
    }
}

/// Like [`parse_id`] for optional fields; blank strings count as absent.
pub(crate) fn parse_optional_id<T: FromStr>(
    value: Option<&str>,
    field: &'static str,
) -> Result<Option<T>, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_field(raw, field).map(Some),
    }
}

fn parse_field<T: FromStr>(value: &str, field: &'static str) -> Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("{field} must be a valid UUID"))
}

/// Validation error echoing the submitted form for re-display.
pub(crate) fn invalid_form(errors: &FieldErrors, input: &impl Serialize) -> Error {
    let input = serde_json::to_value(input).unwrap_or(Value::Null);
    Error::validation(errors).with_submitted_input(input)
}
