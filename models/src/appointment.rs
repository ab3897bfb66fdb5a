// models/src/appointment.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};
use crate::Metadata;

/// Closed set of appointment states. Serialized as `SCHEDULED`, `IN_PROGRESS`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "SCHEDULED",
            AppointmentStatus::InProgress => "IN_PROGRESS",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }

    /// Comma separated list used in validation messages.
    pub fn allowed_values() -> String {
        Self::ALL
            .iter()
            .map(AppointmentStatus::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = ValidationError;

    /// Exact match only; `scheduled` is rejected just like `BOGUS`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidStatus(s.to_string()))
    }
}

/// Appointment as exchanged with callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppointmentRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub client_id: String,
    pub patient_id: String,
    pub doctor_id: String,
    /// RFC 3339, stored as given.
    pub date: String,
    /// Minutes. Not range checked.
    pub duration: i64,
    /// Kept as a raw string so out-of-range values reach validation.
    pub status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl AppointmentRequest {
    /// Typed status; fails with the message callers see on a 400.
    pub fn parsed_status(&self) -> ValidationResult<AppointmentStatus> {
        self.status.parse()
    }
}

/// Appointment as persisted. Attributes the store left out read back empty,
/// except `status`, which must be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub patient_id: String,
    #[serde(default)]
    pub doctor_id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub duration: i64,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl Appointment {
    /// Builds a fresh record; both timestamps get `stamp`.
    pub fn from_request(
        request: &AppointmentRequest,
        status: AppointmentStatus,
        id: String,
        stamp: &str,
    ) -> Self {
        Appointment {
            id,
            client_id: request.client_id.clone(),
            patient_id: request.patient_id.clone(),
            doctor_id: request.doctor_id.clone(),
            date: request.date.clone(),
            duration: request.duration,
            status,
            notes: request.notes.clone(),
            created_at: stamp.to_string(),
            updated_at: stamp.to_string(),
            metadata: request.metadata.clone(),
        }
    }

    /// Replaces every mutable field with the caller's values. `id` and
    /// `created_at` survive from the stored record.
    pub fn overlay(
        self,
        request: &AppointmentRequest,
        status: AppointmentStatus,
        updated_at: String,
    ) -> Self {
        Appointment {
            id: self.id,
            created_at: self.created_at,
            updated_at,
            ..Appointment::from_request(request, status, String::new(), "")
        }
    }
}

impl From<&Appointment> for AppointmentRequest {
    fn from(appointment: &Appointment) -> Self {
        AppointmentRequest {
            id: appointment.id.clone(),
            client_id: appointment.client_id.clone(),
            patient_id: appointment.patient_id.clone(),
            doctor_id: appointment.doctor_id.clone(),
            date: appointment.date.clone(),
            duration: appointment.duration,
            status: appointment.status.to_string(),
            notes: appointment.notes.clone(),
            created_at: appointment.created_at.clone(),
            updated_at: appointment.updated_at.clone(),
            metadata: appointment.metadata.clone(),
        }
    }
}

/// Optional lookup parameters. Precedence: `id`, then `patient_id`, then `doctor_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetAppointmentRequest {
    pub id: String,
    pub client_id: String,
    pub patient_id: String,
    pub doctor_id: String,
}

impl GetAppointmentRequest {
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
            && self.client_id.is_empty()
            && self.patient_id.is_empty()
            && self.doctor_id.is_empty()
    }
}
