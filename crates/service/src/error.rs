use stoplight_core::LightError;
use stoplight_storage::StorageError;
use uuid::Uuid;

/// Errors surfaced by service operations to the transports.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Input or model failure from the light itself.
    #[error(transparent)]
    Light(#[from] LightError),

    /// The requested light does not exist.
    #[error("traffic light with id {id} not found")]
    NotFound { id: Uuid },

    /// Any other storage failure.
    #[error(transparent)]
    Storage(StorageError),

    /// Configuration named a backend this build does not provide.
    #[error("unsupported storage backend '{db_type}' (available: {available})")]
    UnsupportedBackend { db_type: String, available: String },
}

impl ServiceError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ServiceError::Light(e) if e.is_validation())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound { .. })
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { id } => ServiceError::NotFound { id },
            other => ServiceError::Storage(other),
        }
    }
}
