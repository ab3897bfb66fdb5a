// clinic/src/service/patients.rs

use std::sync::Arc;

use models::{GetPatientRequest, Patient, PatientRequest};
use tracing::{error, info};

use crate::errors::{ServiceError, ServiceResult};
use crate::repository::PatientsRepository;
use crate::util::{new_id, next_update_timestamp, now_timestamp};

const ENTITY: &str = "patient";

pub struct PatientsService {
    repository: Arc<dyn PatientsRepository>,
}

impl PatientsService {
    pub fn new(repository: Arc<dyn PatientsRepository>) -> Self {
        PatientsService { repository }
    }

    pub async fn create_patient(&self, mut request: PatientRequest) -> ServiceResult<PatientRequest> {
        let stamp = now_timestamp();
        let patient = Patient::from_request(&request, new_id(), &stamp);

        if let Err(e) = self.repository.save(&patient).await {
            error!(error = %e, "Error on PatientsRepository.save");
            return Err(e.into());
        }
        info!(id = %patient.id, "Patient created");

        request.created_at = stamp.clone();
        request.updated_at = stamp;
        Ok(request)
    }

    /// Resolves by `id`, then by `doc_type` + `doc_number`.
    pub async fn get_patient(&self, params: &GetPatientRequest) -> ServiceResult<PatientRequest> {
        if !params.id.is_empty() {
            info!(id = %params.id, "Getting patient by ID");
            let patient = self.find_by_id(&params.id).await.map_err(|e| {
                error!(id = %params.id, error = %e, "Error getting patient by ID");
                e
            })?;
            return Ok(PatientRequest::from(&patient));
        }

        if params.has_document() {
            info!(doc_type = %params.doc_type, doc_number = %params.doc_number, "Getting patient by Document");
            let patient = self
                .repository
                .get_by_document(&params.doc_type, &params.doc_number)
                .await
                .map_err(ServiceError::from)
                .and_then(|found| {
                    found.ok_or_else(|| {
                        ServiceError::NotFound(format!(
                            "no patient found for document {} {}",
                            params.doc_type, params.doc_number
                        ))
                    })
                })
                .map_err(|e| {
                    error!(
                        doc_type = %params.doc_type,
                        doc_number = %params.doc_number,
                        error = %e,
                        "Error getting patient by Document"
                    );
                    e
                })?;
            return Ok(PatientRequest::from(&patient));
        }

        error!("Invalid parameters for GetPatient");
        Err(ServiceError::InvalidParameters("ID or DocType/DocNumber"))
    }

    pub async fn get_all_patients(&self, client_id: &str) -> ServiceResult<Vec<PatientRequest>> {
        if client_id.is_empty() {
            error!("Empty client-id provided to GetAllPatients");
            return Err(ServiceError::EmptyClientId);
        }

        info!(client_id, "Getting all patients by ClientID");
        let patients = self.repository.get_by_client_id(client_id).await.map_err(|e| {
            error!(client_id, error = %e, "Error getting patients by ClientID");
            ServiceError::from(e)
        })?;

        let result: Vec<PatientRequest> = patients.iter().map(PatientRequest::from).collect();
        info!(count = result.len(), "Successfully retrieved patients");
        Ok(result)
    }

    pub async fn update_patient(&self, request: &PatientRequest) -> ServiceResult<PatientRequest> {
        if request.id.is_empty() {
            error!("Missing patient ID for update");
            return Err(ServiceError::MissingUpdateId(ENTITY));
        }

        info!(id = %request.id, "Updating patient");
        let existing = self.find_by_id(&request.id).await.map_err(|e| {
            error!(id = %request.id, error = %e, "Error fetching patient to update");
            ServiceError::failed_to_find(ENTITY, &request.id, e)
        })?;

        let updated_at = next_update_timestamp(&existing.updated_at);
        let updated = existing.overlay(request, updated_at);
        self.repository.save(&updated).await.map_err(|e| {
            error!(id = %request.id, error = %e, "Error updating patient");
            ServiceError::FailedToUpdate { entity: ENTITY, source: e }
        })?;

        info!(id = %request.id, "Patient updated successfully");
        Ok(PatientRequest::from(&updated))
    }

    pub async fn delete_patient(&self, id: &str) -> ServiceResult<()> {
        if id.is_empty() {
            error!("Empty ID provided for patient deletion");
            return Err(ServiceError::EmptyId(ENTITY));
        }

        info!(id, "Deleting patient");
        self.find_by_id(id).await.map_err(|e| {
            error!(id, error = %e, "Error finding patient to delete");
            ServiceError::failed_to_find(ENTITY, id, e)
        })?;

        self.repository.delete(id).await.map_err(|e| {
            error!(id, error = %e, "Error deleting patient");
            ServiceError::FailedToDelete { entity: ENTITY, source: e }
        })?;

        info!(id, "Patient deleted successfully");
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> ServiceResult<Patient> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("patient with ID {} does not exist", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StorageError;
    use crate::repository::MockPatientsRepository;
    use serde_json::json;

    fn sample_request() -> PatientRequest {
        PatientRequest {
            client_id: "client123".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            doc_type: "DNI".to_string(),
            doc_number: "12345678".to_string(),
            birth_date: "1990-01-01".to_string(),
            gender: "male".to_string(),
            country_code: "+54".to_string(),
            phone_number: "1122334455".to_string(),
            email: "john@example.com".to_string(),
            address_street: "Main St".to_string(),
            address_number: "123".to_string(),
            address_city: "Buenos Aires".to_string(),
            address_country: "Argentina".to_string(),
            zip_code: "1000".to_string(),
            metadata: json!({"key": "value"}).as_object().cloned(),
            ..Default::default()
        }
    }

    fn sample_patient(id: &str) -> Patient {
        let mut patient = Patient::from_request(&sample_request(), id.to_string(), "2024-01-01T00:00:00.000Z");
        patient.updated_at = "2024-01-02T00:00:00.000Z".to_string();
        patient
    }

    fn service(repo: MockPatientsRepository) -> PatientsService {
        PatientsService::new(Arc::new(repo))
    }

    fn db_error() -> StorageError {
        StorageError::DatabaseError("database error".to_string())
    }

    #[tokio::test]
    async fn create_patient_success() {
        let mut repo = MockPatientsRepository::new();
        repo.expect_save()
            .withf(|p| !p.id.is_empty() && p.doc_key == "DNI#12345678" && p.created_at == p.updated_at)
            .times(1)
            .returning(|_| Ok(()));

        let request = sample_request();
        let result = service(repo).create_patient(request.clone()).await.unwrap();
        assert_eq!(result.email, request.email);
        assert!(result.id.is_empty());
        assert!(!result.created_at.is_empty());
    }

    #[tokio::test]
    async fn create_patient_error() {
        let mut repo = MockPatientsRepository::new();
        repo.expect_save().returning(|_| Err(db_error()));

        let err = service(repo).create_patient(sample_request()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
    }

    #[tokio::test]
    async fn get_patient_by_id_success() {
        let mut repo = MockPatientsRepository::new();
        repo.expect_get_by_id()
            .withf(|id| id == "p-1")
            .returning(|id| Ok(Some(sample_patient(id))));
        repo.expect_get_by_document().never();

        let params = GetPatientRequest {
            id: "p-1".to_string(),
            doc_type: "DNI".to_string(),
            doc_number: "12345678".to_string(),
            ..Default::default()
        };
        let result = service(repo).get_patient(&params).await.unwrap();
        assert_eq!(result.id, "p-1");
        assert_eq!(result.first_name, "John");
    }

    #[tokio::test]
    async fn get_patient_by_id_error() {
        let mut repo = MockPatientsRepository::new();
        repo.expect_get_by_id().returning(|_| Err(db_error()));

        let params = GetPatientRequest {
            id: "p-1".to_string(),
            ..Default::default()
        };
        assert!(service(repo).get_patient(&params).await.is_err());
    }

    #[tokio::test]
    async fn get_patient_by_document_success() {
        let mut repo = MockPatientsRepository::new();
        repo.expect_get_by_document()
            .withf(|doc_type, doc_number| doc_type == "DNI" && doc_number == "12345678")
            .returning(|_, _| Ok(Some(sample_patient("p-1"))));

        let params = GetPatientRequest {
            doc_type: "DNI".to_string(),
            doc_number: "12345678".to_string(),
            ..Default::default()
        };
        let result = service(repo).get_patient(&params).await.unwrap();
        assert_eq!(result.id, "p-1");
    }

    #[tokio::test]
    async fn get_patient_by_document_not_found() {
        let mut repo = MockPatientsRepository::new();
        repo.expect_get_by_document().returning(|_, _| Ok(None));

        let params = GetPatientRequest {
            doc_type: "DNI".to_string(),
            doc_number: "0".to_string(),
            ..Default::default()
        };
        let err = service(repo).get_patient(&params).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn get_patient_invalid_params_skips_store() {
        let mut repo = MockPatientsRepository::new();
        repo.expect_get_by_id().never();
        repo.expect_get_by_document().never();

        let params = GetPatientRequest {
            doc_type: "DNI".to_string(),
            ..Default::default()
        };
        let err = service(repo).get_patient(&params).await.unwrap_err();
        assert!(err.to_string().starts_with("invalid parameters"));
    }

    #[tokio::test]
    async fn get_all_patients_success() {
        let mut repo = MockPatientsRepository::new();
        repo.expect_get_by_client_id()
            .returning(|_| Ok(vec![sample_patient("p-1"), sample_patient("p-2")]));

        let result = service(repo).get_all_patients("client123").await.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[1].id, "p-2");
    }

    #[tokio::test]
    async fn get_all_patients_empty_client_id() {
        let mut repo = MockPatientsRepository::new();
        repo.expect_get_by_client_id().never();

        let err = service(repo).get_all_patients("").await.unwrap_err();
        assert_eq!(err.to_string(), "client-id cannot be empty");
    }

    #[tokio::test]
    async fn get_all_patients_repository_error() {
        let mut repo = MockPatientsRepository::new();
        repo.expect_get_by_client_id().returning(|_| Err(db_error()));

        assert!(service(repo).get_all_patients("client123").await.is_err());
    }

    #[tokio::test]
    async fn update_patient_success() {
        let mut repo = MockPatientsRepository::new();
        repo.expect_get_by_id()
            .returning(|id| Ok(Some(sample_patient(id))));
        repo.expect_save()
            .withf(|p| {
                p.id == "p-1"
                    && p.created_at == "2024-01-01T00:00:00.000Z"
                    && p.updated_at.as_str() > "2024-01-02T00:00:00.000Z"
                    && p.doc_key == "PASSPORT#X9"
                    && p.first_name == "Johnny"
            })
            .times(1)
            .returning(|_| Ok(()));

        let mut request = sample_request();
        request.id = "p-1".to_string();
        request.first_name = "Johnny".to_string();
        request.doc_type = "PASSPORT".to_string();
        request.doc_number = "X9".to_string();

        let result = service(repo).update_patient(&request).await.unwrap();
        assert_eq!(result.created_at, "2024-01-01T00:00:00.000Z");
        assert_eq!(result.doc_type, "PASSPORT");
    }

    #[tokio::test]
    async fn update_patient_no_id() {
        let mut repo = MockPatientsRepository::new();
        repo.expect_get_by_id().never();
        repo.expect_save().never();

        let err = service(repo).update_patient(&sample_request()).await.unwrap_err();
        assert!(matches!(err, ServiceError::MissingUpdateId("patient")));
    }

    #[tokio::test]
    async fn update_patient_not_found() {
        let mut repo = MockPatientsRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));
        repo.expect_save().never();

        let mut request = sample_request();
        request.id = "p-1".to_string();
        let err = service(repo).update_patient(&request).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to find patient with ID p-1: patient with ID p-1 does not exist"
        );
    }

    #[tokio::test]
    async fn update_patient_save_error() {
        let mut repo = MockPatientsRepository::new();
        repo.expect_get_by_id()
            .returning(|id| Ok(Some(sample_patient(id))));
        repo.expect_save().returning(|_| Err(db_error()));

        let mut request = sample_request();
        request.id = "p-1".to_string();
        let err = service(repo).update_patient(&request).await.unwrap_err();
        assert!(matches!(err, ServiceError::FailedToUpdate { .. }));
    }

    #[tokio::test]
    async fn delete_patient_success() {
        let mut repo = MockPatientsRepository::new();
        repo.expect_get_by_id()
            .returning(|id| Ok(Some(sample_patient(id))));
        repo.expect_delete().times(1).returning(|_| Ok(()));

        service(repo).delete_patient("p-1").await.unwrap();
    }

    #[tokio::test]
    async fn delete_patient_empty_id() {
        let mut repo = MockPatientsRepository::new();
        repo.expect_get_by_id().never();
        repo.expect_delete().never();

        let err = service(repo).delete_patient("").await.unwrap_err();
        assert_eq!(err.to_string(), "patient ID cannot be empty");
    }

    #[tokio::test]
    async fn delete_patient_not_found() {
        let mut repo = MockPatientsRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));
        repo.expect_delete().never();

        let err = service(repo).delete_patient("p-1").await.unwrap_err();
        assert!(err.to_string().starts_with("failed to find patient with ID p-1"));
    }

    #[tokio::test]
    async fn delete_patient_delete_error() {
        let mut repo = MockPatientsRepository::new();
        repo.expect_get_by_id()
            .returning(|id| Ok(Some(sample_patient(id))));
        repo.expect_delete().returning(|_| Err(db_error()));

        let err = service(repo).delete_patient("p-1").await.unwrap_err();
        assert!(err.to_string().starts_with("failed to delete patient"));
    }
}
