//! Storage backend selection by name.

use std::sync::Arc;

use stoplight_storage::{memory, InMemoryUnitOfWork, UnitOfWork};

use crate::error::ServiceError;

pub const DEFAULT_BACKEND: &str = memory::BACKEND_NAME;

/// Backend names this build can construct.
pub const AVAILABLE_BACKENDS: &[&str] = &[memory::BACKEND_NAME];

/// Build the unit of work for the backend called `db_type`.
///
/// Matching ignores case and surrounding whitespace. Each call builds a
/// new backend with its own store, so callers share the returned `Arc`
/// rather than calling this repeatedly.
pub fn unit_of_work_for(db_type: &str) -> Result<Arc<dyn UnitOfWork>, ServiceError> {
    match db_type.trim().to_ascii_lowercase().as_str() {
        memory::BACKEND_NAME | "memory" | "in-memory" => {
            tracing::debug!("using in-memory storage backend");
            Ok(Arc::new(InMemoryUnitOfWork::fresh()))
        }
        _ => Err(ServiceError::UnsupportedBackend {
            db_type: db_type.to_string(),
            available: AVAILABLE_BACKENDS.join(", "),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_aliases_resolve() {
        for name in ["inmemory", " InMemory ", "memory", "in-memory"] {
            let uow = unit_of_work_for(name).unwrap();
            assert_eq!(uow.backend_name(), "inmemory");
        }
    }

    #[test]
    fn unknown_backend_is_rejected() {
        match unit_of_work_for("postgresql+asyncpg") {
            Err(ServiceError::UnsupportedBackend { db_type, available }) => {
                assert_eq!(db_type, "postgresql+asyncpg");
                assert_eq!(available, "inmemory");
            }
            Err(other) => panic!("expected UnsupportedBackend, got {:?}", other),
            Ok(_) => panic!("expected UnsupportedBackend, got a backend"),
        }
    }

    #[tokio::test]
    async fn factory_backend_round_trips() {
        let uow = unit_of_work_for(DEFAULT_BACKEND).unwrap();
        let config = stoplight_core::LightConfig::new(2, 1, 2);
        let id = crate::upsert_light(&config, uow.as_ref()).await.unwrap();
        let light = crate::get_light(id, uow.as_ref()).await.unwrap();
        assert_eq!(light.total_time(), 5);
    }
}
