// rest_api/src/handlers/appointments.rs

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use clinic::service::validate_status;
use models::{AppointmentRequest, GetAppointmentRequest};
use serde::Deserialize;
use tracing::{error, info};

use super::{parse_body, resolve_id};
use crate::{AppState, RestApiError};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppointmentQuery {
    pub id: String,
    pub client_id: String,
    pub patient_id: String,
    pub doctor_id: String,
}

// Handler for POST /appointments
pub async fn create_appointment(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<AppointmentRequest>), RestApiError> {
    let request: AppointmentRequest = parse_body(&body)?;
    validate_status(&request).map_err(|e| RestApiError::InvalidInput(e.to_string()))?;

    let created = state
        .appointments
        .create_appointment(request)
        .await
        .map_err(|e| RestApiError::service("could not create appointment", e))?;
    Ok((StatusCode::CREATED, Json(created)))
}

// Handler for GET /appointments and /appointments/:id
pub async fn get_appointment(
    State(state): State<AppState>,
    path: Option<Path<String>>,
    Query(query): Query<AppointmentQuery>,
) -> Result<Json<AppointmentRequest>, RestApiError> {
    let params = GetAppointmentRequest {
        id: resolve_id(path, query.id),
        client_id: query.client_id,
        patient_id: query.patient_id,
        doctor_id: query.doctor_id,
    };
    if params.is_empty() {
        error!("No search parameter provided for appointment");
        return Err(RestApiError::InvalidInput(
            "at least one search parameter is required".to_string(),
        ));
    }

    let appointment = state
        .appointments
        .get_appointment(&params)
        .await
        .map_err(|e| RestApiError::service("could not retrieve appointment", e))?;
    Ok(Json(appointment))
}

// Handler for GET /appointments/all
pub async fn get_all_appointments(
    State(state): State<AppState>,
    Query(query): Query<AppointmentQuery>,
) -> Result<Json<Vec<AppointmentRequest>>, RestApiError> {
    if query.client_id.is_empty() {
        return Err(RestApiError::InvalidInput("missing clientId parameter".to_string()));
    }

    let appointments = state
        .appointments
        .get_all_appointments(&query.client_id)
        .await
        .map_err(|e| RestApiError::service("could not retrieve appointments", e))?;
    info!(count = appointments.len(), "Returning appointments");
    Ok(Json(appointments))
}

// Handler for PUT /appointments and /appointments/:id
pub async fn update_appointment(
    State(state): State<AppState>,
    path: Option<Path<String>>,
    body: Bytes,
) -> Result<Json<AppointmentRequest>, RestApiError> {
    let mut request: AppointmentRequest = parse_body(&body)?;
    request.id = resolve_id(path, std::mem::take(&mut request.id));
    if request.id.is_empty() {
        return Err(RestApiError::InvalidInput(
            "appointment ID is required for update".to_string(),
        ));
    }
    validate_status(&request).map_err(|e| RestApiError::InvalidInput(e.to_string()))?;

    let updated = state
        .appointments
        .update_appointment(&request)
        .await
        .map_err(|e| RestApiError::service("could not update appointment", e))?;
    Ok(Json(updated))
}

// Handler for DELETE /appointments and /appointments/:id
pub async fn delete_appointment(
    State(state): State<AppState>,
    path: Option<Path<String>>,
    Query(query): Query<AppointmentQuery>,
) -> Result<StatusCode, RestApiError> {
    let id = resolve_id(path, query.id);
    if id.is_empty() {
        return Err(RestApiError::InvalidInput("missing appointment ID".to_string()));
    }

    state
        .appointments
        .delete_appointment(&id)
        .await
        .map_err(|e| RestApiError::service("could not delete appointment", e))?;
    Ok(StatusCode::NO_CONTENT)
}
