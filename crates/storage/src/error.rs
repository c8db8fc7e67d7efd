use std::fmt;

use uuid::Uuid;

/// Lifecycle position of a unit-of-work scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeState {
    Open,
    Committed,
    RolledBack,
}

impl fmt::Display for ScopeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScopeState::Open => "open",
            ScopeState::Committed => "committed",
            ScopeState::RolledBack => "rolled back",
        })
    }
}

/// All errors that can be returned by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No light is stored under the requested id.
    #[error("traffic light with id {id} not found")]
    NotFound { id: Uuid },

    /// `commit` or `rollback` was called on a scope that already ended.
    #[error("unit of work scope already {state}")]
    ScopeClosed { state: ScopeState },

    /// A backend-specific failure (connection, serialization, etc.).
    #[error("storage backend error: {0}")]
    Backend(String),
}
