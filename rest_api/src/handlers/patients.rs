// rest_api/src/handlers/patients.rs

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use models::{GetPatientRequest, PatientRequest};
use serde::Deserialize;
use tracing::{error, info};

use super::{parse_body, resolve_id};
use crate::{AppState, RestApiError};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatientQuery {
    pub id: String,
    pub client_id: String,
    pub doc_type: String,
    pub doc_number: String,
}

pub async fn create_patient(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<PatientRequest>), RestApiError> {
    let request: PatientRequest = parse_body(&body)?;
    let created = state
        .patients
        .create_patient(request)
        .await
        .map_err(|e| RestApiError::service("could not create patient", e))?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_patient(
    State(state): State<AppState>,
    path: Option<Path<String>>,
    Query(query): Query<PatientQuery>,
) -> Result<Json<PatientRequest>, RestApiError> {
    let params = GetPatientRequest {
        client_id: query.client_id,
        id: resolve_id(path, query.id),
        doc_type: query.doc_type,
        doc_number: query.doc_number,
    };
    if params.id.is_empty() && !params.has_document() {
        error!("Missing id or docType/docNumber for patient lookup");
        return Err(RestApiError::InvalidInput("missing required parameters".to_string()));
    }

    let patient = state
        .patients
        .get_patient(&params)
        .await
        .map_err(|e| RestApiError::service("could not retrieve patient", e))?;
    Ok(Json(patient))
}

pub async fn get_all_patients(
    State(state): State<AppState>,
    Query(query): Query<PatientQuery>,
) -> Result<Json<Vec<PatientRequest>>, RestApiError> {
    if query.client_id.is_empty() {
        return Err(RestApiError::InvalidInput("missing clientId parameter".to_string()));
    }

    let patients = state
        .patients
        .get_all_patients(&query.client_id)
        .await
        .map_err(|e| RestApiError::service("could not retrieve patients", e))?;
    info!(count = patients.len(), "Returning patients");
    Ok(Json(patients))
}

pub async fn update_patient(
    State(state): State<AppState>,
    path: Option<Path<String>>,
    body: Bytes,
) -> Result<Json<PatientRequest>, RestApiError> {
    let mut request: PatientRequest = parse_body(&body)?;
    request.id = resolve_id(path, std::mem::take(&mut request.id));
    if request.id.is_empty() {
        return Err(RestApiError::InvalidInput("patient ID is required for update".to_string()));
    }

    let updated = state
        .patients
        .update_patient(&request)
        .await
        .map_err(|e| RestApiError::service("could not update patient", e))?;
    Ok(Json(updated))
}

pub async fn delete_patient(
    State(state): State<AppState>,
    path: Option<Path<String>>,
    Query(query): Query<PatientQuery>,
) -> Result<StatusCode, RestApiError> {
    let id = resolve_id(path, query.id);
    if id.is_empty() {
        return Err(RestApiError::InvalidInput("missing patient ID".to_string()));
    }

    state
        .patients
        .delete_patient(&id)
        .await
        .map_err(|e| RestApiError::service("could not delete patient", e))?;
    Ok(StatusCode::NO_CONTENT)
}
