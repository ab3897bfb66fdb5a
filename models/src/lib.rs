// models/src/lib.rs
// Wire and storage shapes for the clinic record types.

pub mod appointment;
pub mod errors;
pub mod patient;

pub use appointment::{Appointment, AppointmentRequest, AppointmentStatus, GetAppointmentRequest};
pub use errors::{ValidationError, ValidationResult};
pub use patient::{document_key, GetPatientRequest, Patient, PatientRequest};

/// Open-ended metadata attached to every record.
pub type Metadata = serde_json::Map<String, serde_json::Value>;
