// clinic/src/service/mod.rs

pub mod appointments;
pub mod patients;

pub use self::appointments::{validate_status, AppointmentsService};
pub use self::patients::PatientsService;
