use async_trait::async_trait;
use stoplight_core::TrafficLight;
use uuid::Uuid;

use crate::error::StorageError;

/// In-place edit applied by [`LightRepository::update`].
pub type LightUpdate = Box<dyn FnOnce(&mut TrafficLight) + Send>;

/// Storage for traffic lights keyed by id.
///
/// The store owns its own copy of every light. Mutating a value returned by
/// [`LightRepository::get`] has no effect until it is passed back through
/// [`LightRepository::upsert`].
#[async_trait]
pub trait LightRepository: Send + Sync {
    /// Create or fully replace the entry for `light.id()`.
    ///
    /// Fields are never merged with a previous entry. Returns the id.
    async fn upsert(&self, light: TrafficLight) -> Result<Uuid, StorageError>;

    /// Read the light stored under `id`.
    ///
    /// Returns `Err(StorageError::NotFound)` if there is none.
    async fn get(&self, id: Uuid) -> Result<TrafficLight, StorageError>;

    /// Apply `edit` to the light stored under `id` and return the result.
    ///
    /// Read, edit and write are atomic with respect to every other call on
    /// the same store, so concurrent updates never overwrite each other.
    /// Returns `Err(StorageError::NotFound)` if there is no such light.
    async fn update(&self, id: Uuid, edit: LightUpdate) -> Result<TrafficLight, StorageError>;
}

/// One open unit-of-work scope.
///
/// ## Scope Semantics
///
/// 1. [`UnitOfWork::begin`] opens the scope and returns the handle
/// 2. Repository calls go through [`Transaction::lights`]
/// 3. [`Transaction::commit`] makes the writes durable
///    OR [`Transaction::rollback`] aborts them
///
/// If the handle is dropped while still open, the backend MUST roll the
/// scope back. This covers every exit path, including early `?` returns.
/// After the scope has ended, a second `commit` or `rollback` returns
/// `Err(StorageError::ScopeClosed)`.
#[async_trait]
pub trait Transaction: Send + Sync {
    /// The repository this scope writes through.
    fn lights(&self) -> &dyn LightRepository;

    async fn commit(&mut self) -> Result<(), StorageError>;

    async fn rollback(&mut self) -> Result<(), StorageError>;
}

/// Factory for unit-of-work scopes over one storage backend.
///
/// Implementations must be `Send + Sync + 'static` so they can be shared as
/// `Arc<dyn UnitOfWork>` in HTTP application state.
#[async_trait]
pub trait UnitOfWork: Send + Sync + 'static {
    /// Open a new scope.
    async fn begin(&self) -> Result<Box<dyn Transaction>, StorageError>;

    /// Short backend name, e.g. `"inmemory"`.
    fn backend_name(&self) -> &'static str;
}
