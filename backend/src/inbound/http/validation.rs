//! Shared validation helpers for inbound HTTP adapters.
//!
//! Failures become [`Error::invalid_request`] values whose `details` name the
//! offending field and a machine-readable code.

use serde_json::json;

use crate::domain::{Error, TodoId, TodoTitle, TodoValidationError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    EmptyTitle,
    TitleTooLong,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::EmptyTitle => "empty_title",
            ErrorCode::TitleTooLong => "title_too_long",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

pub(crate) const ID_FIELD: FieldName = FieldName::new("id");
pub(crate) const TITLE_FIELD: FieldName = FieldName::new("title");

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }

    fn with_max(self, code: ErrorCode, max: usize) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "max": max,
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("{name} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

/// Parse a path segment into a [`TodoId`].
pub(crate) fn parse_todo_id(value: &str) -> Result<TodoId, Error> {
    TodoId::new(value).map_err(|_| invalid_uuid_error(ID_FIELD, value))
}

pub(crate) fn title_error(field: FieldName, error: &TodoValidationError) -> Error {
    let name = field.as_str();
    match error {
        TodoValidationError::TitleTooLong { max } => {
            ValidationError::new(field, format!("{name} must be at most {max} characters"))
                .with_max(ErrorCode::TitleTooLong, *max)
        }
        _ => ValidationError::new(field, format!("{name} must not be empty"))
            .with_code(ErrorCode::EmptyTitle),
    }
}

/// Validate a raw title from a request body.
pub(crate) fn parse_title(value: String, field: FieldName) -> Result<TodoTitle, Error> {
    TodoTitle::new(value).map_err(|err| title_error(field, &err))
}
