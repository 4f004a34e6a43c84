//! Error types for ems.
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (validation, credentials, missing session, permissions)
//! - 4: Operation failed (store I/O or JSON)

use std::fmt;

use thiserror::Error;

use crate::fields::FormField;

/// Exit codes for the ems CLI.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for ems operations.
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("{0}")]
    Validation(FieldErrors),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not logged in. Run `ems login <email> --password <password>` first")]
    NotLoggedIn,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Employee not found: {0}")]
    EmployeeNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_)
            | Error::InvalidCredentials
            | Error::NotLoggedIn
            | Error::Forbidden(_)
            | Error::EmployeeNotFound(_)
            | Error::TaskNotFound(_)
            | Error::InvalidArgument(_) => exit_codes::USER_ERROR,

            Error::Io(_) | Error::Json(_) => exit_codes::OPERATION_FAILED,
        }
    }
}

/// Result type alias for ems operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A single field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

/// Field-level validation messages, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field. The first message per field wins.
    pub fn add(&mut self, field: FormField, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.errors.push(FieldError { field, message: message.into() });
        }
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Ok when no messages were recorded, otherwise a validation error.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field.label(), e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}
