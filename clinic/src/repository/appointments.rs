// clinic/src/repository/appointments.rs

use std::sync::Arc;

use async_trait::async_trait;
use models::Appointment;
use tracing::error;

use super::{from_item, from_items, to_item};
use crate::config::AppointmentsTableSettings;
use crate::errors::Result;
use crate::storage_engine::{IndexQuery, StorageEngine};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentsRepository: Send + Sync + 'static {
    /// Inserts or replaces the appointment stored under its `id`.
    async fn save(&self, appointment: &Appointment) -> Result<()>;
    async fn get_by_id(&self, id: &str) -> Result<Option<Appointment>>;
    async fn get_by_client_id(&self, client_id: &str) -> Result<Vec<Appointment>>;
    async fn get_by_patient_id(&self, patient_id: &str) -> Result<Vec<Appointment>>;
    async fn get_by_doctor_id(&self, doctor_id: &str) -> Result<Vec<Appointment>>;
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Appointments table on top of any storage engine.
pub struct StoreAppointmentsRepository {
    storage: Arc<dyn StorageEngine>,
    tables: AppointmentsTableSettings,
}

impl StoreAppointmentsRepository {
    pub fn new(storage: Arc<dyn StorageEngine>, tables: AppointmentsTableSettings) -> Self {
        StoreAppointmentsRepository { storage, tables }
    }

    async fn query(&self, index: &str, attribute: &str, value: &str) -> Result<Vec<Appointment>> {
        let items = self
            .storage
            .query_index(&self.tables.table, IndexQuery::new(index, attribute, value))
            .await?;
        from_items(items)
    }
}

#[async_trait]
impl AppointmentsRepository for StoreAppointmentsRepository {
    async fn save(&self, appointment: &Appointment) -> Result<()> {
        let item = to_item(appointment).map_err(|e| {
            error!(error = %e, "error marshalling appointment");
            e
        })?;
        self.storage.put_item(&self.tables.table, item).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Appointment>> {
        match self.storage.get_item(&self.tables.table, id).await? {
            Some(item) => Ok(Some(from_item(item)?)),
            None => Ok(None),
        }
    }

    async fn get_by_client_id(&self, client_id: &str) -> Result<Vec<Appointment>> {
        self.query(&self.tables.client_id_index, "client_id", client_id).await
    }

    async fn get_by_patient_id(&self, patient_id: &str) -> Result<Vec<Appointment>> {
        self.query(&self.tables.patient_id_index, "patient_id", patient_id).await
    }

    async fn get_by_doctor_id(&self, doctor_id: &str) -> Result<Vec<Appointment>> {
        self.query(&self.tables.doctor_id_index, "doctor_id", doctor_id).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.storage.delete_item(&self.tables.table, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StorageError;
    use crate::storage_engine::{InMemoryStorage, MockStorageEngine};
    use models::AppointmentStatus;
    use serde_json::json;

    fn tables() -> AppointmentsTableSettings {
        AppointmentsTableSettings {
            table: "AppointmentsTable".to_string(),
            client_id_index: "client_id_index".to_string(),
            patient_id_index: "patient_id_index".to_string(),
            doctor_id_index: "doctor_id_index".to_string(),
        }
    }

    fn sample_appointment(id: &str, patient_id: &str, doctor_id: &str) -> Appointment {
        Appointment {
            id: id.to_string(),
            client_id: "client123".to_string(),
            patient_id: patient_id.to_string(),
            doctor_id: doctor_id.to_string(),
            date: "2025-03-01T10:00:00Z".to_string(),
            duration: 30,
            status: AppointmentStatus::Scheduled,
            notes: "Regular checkup".to_string(),
            created_at: "2025-01-01T00:00:00.000Z".to_string(),
            updated_at: "2025-01-01T00:00:00.000Z".to_string(),
            metadata: json!({"key": "value"}).as_object().cloned(),
        }
    }

    fn repository() -> StoreAppointmentsRepository {
        StoreAppointmentsRepository::new(Arc::new(InMemoryStorage::new()), tables())
    }

    #[tokio::test]
    async fn save_then_get_by_id() {
        let repo = repository();
        let appointment = sample_appointment("a-1", "p-1", "d-1");
        repo.save(&appointment).await.unwrap();

        assert_eq!(repo.get_by_id("a-1").await.unwrap(), Some(appointment));
        assert_eq!(repo.get_by_id("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn secondary_lookups_use_their_attribute() {
        let repo = repository();
        repo.save(&sample_appointment("a-1", "p-1", "d-1")).await.unwrap();
        repo.save(&sample_appointment("a-2", "p-2", "d-1")).await.unwrap();
        repo.save(&sample_appointment("a-3", "p-1", "d-2")).await.unwrap();

        assert_eq!(repo.get_by_client_id("client123").await.unwrap().len(), 3);
        assert_eq!(repo.get_by_patient_id("p-1").await.unwrap().len(), 2);
        assert_eq!(repo.get_by_doctor_id("d-2").await.unwrap()[0].id, "a-3");
        assert!(repo.get_by_doctor_id("d-9").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let repo = repository();
        repo.save(&sample_appointment("a-1", "p-1", "d-1")).await.unwrap();
        repo.delete("a-1").await.unwrap();
        assert_eq!(repo.get_by_id("a-1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn queries_go_to_the_configured_index() {
        let mut storage = MockStorageEngine::new();
        storage
            .expect_query_index()
            .withf(|table, query| {
                table == "AppointmentsTable"
                    && query.index == "doctor_id_index"
                    && query.attribute == "doctor_id"
                    && query.value == "d-1"
                    && query.limit.is_none()
            })
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        let repo = StoreAppointmentsRepository::new(Arc::new(storage), tables());

        assert!(repo.get_by_doctor_id("d-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn storage_errors_are_propagated() {
        let mut storage = MockStorageEngine::new();
        storage
            .expect_put_item()
            .returning(|_, _| Err(StorageError::DatabaseError("throttled".to_string())));
        let repo = StoreAppointmentsRepository::new(Arc::new(storage), tables());

        let err = repo.save(&sample_appointment("a-1", "p-1", "d-1")).await.unwrap_err();
        assert!(err.to_string().contains("throttled"));
    }
}
