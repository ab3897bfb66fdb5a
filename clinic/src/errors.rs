// clinic/src/errors.rs

use models::errors::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database operation failed: {0}")]
    DatabaseError(String),

    #[error("Serialization/Deserialization error: {0}")]
    SerializationError(String),

    #[error("JSON serialization/deserialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::DatabaseError(err.to_string())
    }
}

/// Errors surfaced by the appointment and patient services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid parameters: must provide {0}")]
    InvalidParameters(&'static str),

    #[error("client-id cannot be empty")]
    EmptyClientId,

    #[error("{0} ID is required for update")]
    MissingUpdateId(&'static str),

    #[error("{0} ID cannot be empty")]
    EmptyId(&'static str),

    #[error("{0}")]
    NotFound(String),

    #[error("failed to find {entity} with ID {id}: {source}")]
    FailedToFind {
        entity: &'static str,
        id: String,
        source: Box<ServiceError>,
    },

    #[error("failed to update {entity}: {source}")]
    FailedToUpdate {
        entity: &'static str,
        source: StorageError,
    },

    #[error("failed to delete {entity}: {source}")]
    FailedToDelete {
        entity: &'static str,
        source: StorageError,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ServiceError {
    /// True for errors caused by caller input rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServiceError::Validation(_)
                | ServiceError::InvalidParameters(_)
                | ServiceError::EmptyClientId
                | ServiceError::MissingUpdateId(_)
                | ServiceError::EmptyId(_)
        )
    }

    pub(crate) fn failed_to_find(entity: &'static str, id: &str, source: ServiceError) -> Self {
        ServiceError::FailedToFind {
            entity,
            id: id.to_string(),
            source: Box::new(source),
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_are_client_errors() {
        assert!(ServiceError::EmptyClientId.is_client_error());
        assert!(ServiceError::MissingUpdateId("appointment").is_client_error());
        assert!(ServiceError::Validation(ValidationError::InvalidStatus("X".into())).is_client_error());
        assert!(!ServiceError::NotFound("gone".into()).is_client_error());
        assert!(!ServiceError::Storage(StorageError::DatabaseError("down".into())).is_client_error());
    }

    #[test]
    fn failed_to_find_wraps_cause() {
        let err = ServiceError::failed_to_find(
            "patient",
            "p-1",
            ServiceError::NotFound("patient with ID p-1 does not exist".into()),
        );
        assert_eq!(
            err.to_string(),
            "failed to find patient with ID p-1: patient with ID p-1 does not exist"
        );
        assert!(!err.is_client_error());
    }
}
