// models/src/patient.rs

use serde::{Deserialize, Serialize};

use crate::Metadata;

/// Composite secondary key for document lookups.
pub fn document_key(doc_type: &str, doc_number: &str) -> String {
    format!("{}#{}", doc_type, doc_number)
}

/// Patient as exchanged with callers.
///
/// Every field except `id`, `metadata` and the timestamps is expected from
/// callers, but none of them is checked at runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub client_id: String,
    pub first_name: String,
    pub last_name: String,
    pub doc_type: String,
    pub doc_number: String,
    pub birth_date: String,
    pub gender: String,
    pub country_code: String,
    pub phone_number: String,
    pub email: String,
    pub address_street: String,
    pub address_number: String,
    pub address_city: String,
    pub address_country: String,
    pub zip_code: String,
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub updated_at: String,
}

/// Patient as persisted. `doc_key` is derived, never taken from callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Patient {
    pub id: String,
    pub client_id: String,
    pub first_name: String,
    pub last_name: String,
    pub doc_type: String,
    pub doc_number: String,
    pub doc_key: String,
    pub birth_date: String,
    pub gender: String,
    pub country_code: String,
    pub phone_number: String,
    pub email: String,
    pub address_street: String,
    pub address_number: String,
    pub address_city: String,
    pub address_country: String,
    pub zip_code: String,
    pub created_at: String,
    pub updated_at: String,
    pub metadata: Option<Metadata>,
}

impl Patient {
    pub fn from_request(request: &PatientRequest, id: String, stamp: &str) -> Self {
        let mut patient = Patient {
            id,
            client_id: request.client_id.clone(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            doc_type: request.doc_type.clone(),
            doc_number: request.doc_number.clone(),
            doc_key: String::new(),
            birth_date: request.birth_date.clone(),
            gender: request.gender.clone(),
            country_code: request.country_code.clone(),
            phone_number: request.phone_number.clone(),
            email: request.email.clone(),
            address_street: request.address_street.clone(),
            address_number: request.address_number.clone(),
            address_city: request.address_city.clone(),
            address_country: request.address_country.clone(),
            zip_code: request.zip_code.clone(),
            created_at: stamp.to_string(),
            updated_at: stamp.to_string(),
            metadata: request.metadata.clone(),
        };
        patient.refresh_doc_key();
        patient
    }

    /// Replaces every mutable field with the caller's values. `id` and
    /// `created_at` survive from the stored record.
    pub fn overlay(self, request: &PatientRequest, updated_at: String) -> Self {
        Patient {
            id: self.id,
            created_at: self.created_at,
            updated_at,
            ..Patient::from_request(request, String::new(), "")
        }
    }

    /// Recomputes `doc_key` from `doc_type` and `doc_number`.
    pub fn refresh_doc_key(&mut self) {
        self.doc_key = document_key(&self.doc_type, &self.doc_number);
    }
}

impl From<&Patient> for PatientRequest {
    fn from(patient: &Patient) -> Self {
        PatientRequest {
            id: patient.id.clone(),
            client_id: patient.client_id.clone(),
            first_name: patient.first_name.clone(),
            last_name: patient.last_name.clone(),
            doc_type: patient.doc_type.clone(),
            doc_number: patient.doc_number.clone(),
            birth_date: patient.birth_date.clone(),
            gender: patient.gender.clone(),
            country_code: patient.country_code.clone(),
            phone_number: patient.phone_number.clone(),
            email: patient.email.clone(),
            address_street: patient.address_street.clone(),
            address_number: patient.address_number.clone(),
            address_city: patient.address_city.clone(),
            address_country: patient.address_country.clone(),
            zip_code: patient.zip_code.clone(),
            metadata: patient.metadata.clone(),
            created_at: patient.created_at.clone(),
            updated_at: patient.updated_at.clone(),
        }
    }
}

/// Optional lookup parameters. Precedence: `id`, then `doc_type` + `doc_number`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetPatientRequest {
    pub client_id: String,
    pub id: String,
    pub doc_type: String,
    pub doc_number: String,
}

impl GetPatientRequest {
    pub fn has_document(&self) -> bool {
        !self.doc_type.is_empty() && !self.doc_number.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> PatientRequest {
        PatientRequest {
            client_id: "client123".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Gomez".to_string(),
            doc_type: "DNI".to_string(),
            doc_number: "30111222".to_string(),
            birth_date: "1990-05-04".to_string(),
            gender: "female".to_string(),
            email: "ana@example.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn should_build_document_key() {
        assert_eq!(document_key("DNI", "30111222"), "DNI#30111222");
        assert_eq!(document_key("", ""), "#");
    }

    #[test]
    fn from_request_derives_doc_key() {
        let patient = Patient::from_request(&sample_request(), "p-1".to_string(), "2025-01-01T00:00:00.000Z");
        assert_eq!(patient.doc_key, "DNI#30111222");
        assert_eq!(patient.created_at, patient.updated_at);
    }

    #[test]
    fn overlay_recomputes_doc_key_and_keeps_creation_time() {
        let existing = Patient::from_request(&sample_request(), "p-1".to_string(), "2024-01-01T00:00:00.000Z");
        let mut change = sample_request();
        change.doc_type = "PASSPORT".to_string();
        change.doc_number = "AB123".to_string();

        let updated = existing.overlay(&change, "2025-02-02T00:00:00.000Z".to_string());
        assert_eq!(updated.id, "p-1");
        assert_eq!(updated.doc_key, "PASSPORT#AB123");
        assert_eq!(updated.created_at, "2024-01-01T00:00:00.000Z");
        assert_eq!(updated.updated_at, "2025-02-02T00:00:00.000Z");
    }

    #[test]
    fn storage_model_maps_back_to_wire_without_doc_key() {
        let patient = Patient::from_request(&sample_request(), "p-1".to_string(), "2025-01-01T00:00:00.000Z");
        let wire = PatientRequest::from(&patient);
        assert_eq!(wire.id, "p-1");
        assert_eq!(wire.doc_number, "30111222");
        let value = serde_json::to_value(&wire).unwrap();
        assert!(value.get("doc_key").is_none());
    }

    #[test]
    fn document_lookup_needs_both_parts() {
        let mut request = GetPatientRequest {
            doc_type: "DNI".to_string(),
            ..Default::default()
        };
        assert!(!request.has_document());
        request.doc_number = "1".to_string();
        assert!(request.has_document());
    }
}
