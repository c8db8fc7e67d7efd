//! Application state.

use std::sync::Arc;

use stoplight_storage::UnitOfWork;

/// Application state shared across request handlers.
pub(crate) struct AppState {
    /// Storage backend every request opens its scope on.
    pub(crate) uow: Arc<dyn UnitOfWork>,
}
