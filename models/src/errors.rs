// models/src/errors.rs

pub use thiserror::Error;

use crate::appointment::AppointmentStatus;

/// A validation error raised before anything is persisted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The appointment status is outside the closed enumeration.
    #[error("invalid status value: {0}. Must be one of: {allowed}", allowed = AppointmentStatus::allowed_values())]
    InvalidStatus(String),
}

/// Outcome of checking caller input against the model rules.
pub type ValidationResult<T> = Result<T, ValidationError>;
