// clinic/src/repository/patients.rs

use std::sync::Arc;

use async_trait::async_trait;
use models::{document_key, Patient};
use tracing::error;

use super::{from_item, from_items, to_item};
use crate::config::PatientsTableSettings;
use crate::errors::Result;
use crate::storage_engine::{IndexQuery, StorageEngine};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatientsRepository: Send + Sync + 'static {
    /// Inserts or replaces the patient. `doc_key` is always recomputed.
    async fn save(&self, patient: &Patient) -> Result<()>;
    async fn get_by_id(&self, id: &str) -> Result<Option<Patient>>;
    async fn get_by_client_id(&self, client_id: &str) -> Result<Vec<Patient>>;
    async fn get_by_document(&self, doc_type: &str, doc_number: &str) -> Result<Option<Patient>>;
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Patients table on top of any storage engine.
pub struct StorePatientsRepository {
    storage: Arc<dyn StorageEngine>,
    tables: PatientsTableSettings,
}

impl StorePatientsRepository {
    pub fn new(storage: Arc<dyn StorageEngine>, tables: PatientsTableSettings) -> Self {
        StorePatientsRepository { storage, tables }
    }
}

#[async_trait]
impl PatientsRepository for StorePatientsRepository {
    async fn save(&self, patient: &Patient) -> Result<()> {
        let mut patient = patient.clone();
        patient.refresh_doc_key();
        let item = to_item(&patient).map_err(|e| {
            error!(error = %e, "error marshalling patient");
            e
        })?;
        self.storage.put_item(&self.tables.table, item).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Patient>> {
        match self.storage.get_item(&self.tables.table, id).await? {
            Some(item) => Ok(Some(from_item(item)?)),
            None => Ok(None),
        }
    }

    async fn get_by_client_id(&self, client_id: &str) -> Result<Vec<Patient>> {
        let items = self
            .storage
            .query_index(
                &self.tables.table,
                IndexQuery::new(&self.tables.client_id_index, "client_id", client_id),
            )
            .await?;
        from_items(items)
    }

    async fn get_by_document(&self, doc_type: &str, doc_number: &str) -> Result<Option<Patient>> {
        let doc_key = document_key(doc_type, doc_number);
        let items = self
            .storage
            .query_index(
                &self.tables.table,
                IndexQuery::new(&self.tables.doc_key_index, "doc_key", &doc_key).with_limit(1),
            )
            .await?;
        match items.into_iter().next() {
            Some(item) => Ok(Some(from_item(item)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.storage.delete_item(&self.tables.table, id).await
    }
}
