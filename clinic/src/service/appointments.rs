// clinic/src/service/appointments.rs

use std::sync::Arc;

use models::{Appointment, AppointmentRequest, AppointmentStatus, GetAppointmentRequest, ValidationResult};
use tracing::{error, info, warn};

use crate::errors::{ServiceError, ServiceResult};
use crate::repository::AppointmentsRepository;
use crate::util::{new_id, next_update_timestamp, now_timestamp};

const ENTITY: &str = "appointment";

/// Rejects anything outside the closed status enumeration.
pub fn validate_status(request: &AppointmentRequest) -> ValidationResult<AppointmentStatus> {
    request.parsed_status().map_err(|e| {
        error!(status = %request.status, "Invalid status value");
        e
    })
}

pub struct AppointmentsService {
    repository: Arc<dyn AppointmentsRepository>,
}

impl AppointmentsService {
    pub fn new(repository: Arc<dyn AppointmentsRepository>) -> Self {
        AppointmentsService { repository }
    }

    /// Persists a new appointment and echoes the caller's payload, stamped
    /// with the creation time.
    pub async fn create_appointment(&self, mut request: AppointmentRequest) -> ServiceResult<AppointmentRequest> {
        let status = validate_status(&request)?;
        let stamp = now_timestamp();
        let appointment = Appointment::from_request(&request, status, new_id(), &stamp);

        if let Err(e) = self.repository.save(&appointment).await {
            error!(error = %e, "Error on AppointmentsRepository.save");
            return Err(e.into());
        }
        info!(id = %appointment.id, "Appointment created");

        request.created_at = stamp.clone();
        request.updated_at = stamp;
        Ok(request)
    }

    /// Resolves by `id`, then `patient_id`, then `doctor_id`. Secondary
    /// lookups return the first match only.
    pub async fn get_appointment(&self, params: &GetAppointmentRequest) -> ServiceResult<AppointmentRequest> {
        if !params.id.is_empty() {
            info!(id = %params.id, "Getting appointment by ID");
            let appointment = self.find_by_id(&params.id).await.map_err(|e| {
                error!(id = %params.id, error = %e, "Error getting appointment by ID");
                e
            })?;
            return Ok(AppointmentRequest::from(&appointment));
        }

        if !params.patient_id.is_empty() {
            info!(patient_id = %params.patient_id, "Getting appointments by PatientID");
            let appointments = self
                .repository
                .get_by_patient_id(&params.patient_id)
                .await
                .map_err(|e| {
                    error!(patient_id = %params.patient_id, error = %e, "Error getting appointments by PatientID");
                    ServiceError::from(e)
                })?;
            return first_match(appointments, "patientID", &params.patient_id);
        }

        if !params.doctor_id.is_empty() {
            info!(doctor_id = %params.doctor_id, "Getting appointments by DoctorID");
            let appointments = self
                .repository
                .get_by_doctor_id(&params.doctor_id)
                .await
                .map_err(|e| {
                    error!(doctor_id = %params.doctor_id, error = %e, "Error getting appointments by DoctorID");
                    ServiceError::from(e)
                })?;
            return first_match(appointments, "doctorID", &params.doctor_id);
        }

        error!("Invalid parameters for GetAppointment");
        Err(ServiceError::InvalidParameters("ID, PatientID, or DoctorID"))
    }

    pub async fn get_all_appointments(&self, client_id: &str) -> ServiceResult<Vec<AppointmentRequest>> {
        if client_id.is_empty() {
            error!("Empty client-id provided to GetAllAppointments");
            return Err(ServiceError::EmptyClientId);
        }

        info!(client_id, "Getting all appointments by ClientID");
        let appointments = self.repository.get_by_client_id(client_id).await.map_err(|e| {
            error!(client_id, error = %e, "Error getting appointments by ClientID");
            ServiceError::from(e)
        })?;

        let result: Vec<AppointmentRequest> = appointments.iter().map(AppointmentRequest::from).collect();
        info!(count = result.len(), "Successfully retrieved appointments");
        Ok(result)
    }

    /// Overlays the caller's fields on the stored record and returns what
    /// was persisted.
    pub async fn update_appointment(&self, request: &AppointmentRequest) -> ServiceResult<AppointmentRequest> {
        if request.id.is_empty() {
            error!("Missing appointment ID for update");
            return Err(ServiceError::MissingUpdateId(ENTITY));
        }
        let status = validate_status(request)?;

        info!(id = %request.id, "Updating appointment");
        let existing = self.find_by_id(&request.id).await.map_err(|e| {
            error!(id = %request.id, error = %e, "Error fetching appointment to update");
            ServiceError::failed_to_find(ENTITY, &request.id, e)
        })?;

        let updated_at = next_update_timestamp(&existing.updated_at);
        let updated = existing.overlay(request, status, updated_at);
        self.repository.save(&updated).await.map_err(|e| {
            error!(id = %request.id, error = %e, "Error updating appointment");
            ServiceError::FailedToUpdate { entity: ENTITY, source: e }
        })?;

        info!(id = %request.id, "Appointment updated successfully");
        Ok(AppointmentRequest::from(&updated))
    }

    pub async fn delete_appointment(&self, id: &str) -> ServiceResult<()> {
        if id.is_empty() {
            error!("Empty ID provided for appointment deletion");
            return Err(ServiceError::EmptyId(ENTITY));
        }

        info!(id, "Deleting appointment");
        self.find_by_id(id).await.map_err(|e| {
            error!(id, error = %e, "Error finding appointment to delete");
            ServiceError::failed_to_find(ENTITY, id, e)
        })?;

        self.repository.delete(id).await.map_err(|e| {
            error!(id, error = %e, "Error deleting appointment");
            ServiceError::FailedToDelete { entity: ENTITY, source: e }
        })?;

        info!(id, "Appointment deleted successfully");
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> ServiceResult<Appointment> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("appointment with ID {} does not exist", id)))
    }
}

// TODO: expose every match once the get endpoint can return a list.
fn first_match(appointments: Vec<Appointment>, label: &str, value: &str) -> ServiceResult<AppointmentRequest> {
    match appointments.as_slice() {
        [] => Err(ServiceError::NotFound(format!("no appointments found for {}: {}", label, value))),
        [first, rest @ ..] => {
            if !rest.is_empty() {
                warn!(
                    matches = appointments.len(),
                    "{} {} matched several appointments, returning only the first",
                    label,
                    value
                );
            }
            Ok(AppointmentRequest::from(first))
        }
    }
}
