//! In-memory storage backend.
//!
//! Lights live in a `HashMap` behind an async `RwLock`. Every unit of work
//! built from the same [`InMemoryLightRepository`] shares that map.
//!
//! Commit and rollback only record the scope outcome. Writes reach the map
//! as soon as `upsert` returns, so a rollback does not undo them. A durable
//! backend has to implement real transactional rollback.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use stoplight_core::TrafficLight;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ScopeState, StorageError};
use crate::traits::{LightRepository, LightUpdate, Transaction, UnitOfWork};

/// Backend name used by configuration to select this backend.
pub const BACKEND_NAME: &str = "inmemory";

#[derive(Debug, Default)]
pub struct InMemoryLightRepository {
    lights: RwLock<HashMap<Uuid, TrafficLight>>,
}

impl InMemoryLightRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored lights.
    pub async fn len(&self) -> usize {
        self.lights.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.lights.read().await.is_empty()
    }
}

#[async_trait]
impl LightRepository for InMemoryLightRepository {
    async fn upsert(&self, light: TrafficLight) -> Result<Uuid, StorageError> {
        let id = light.id();
        let replaced = self.lights.write().await.insert(id, light).is_some();
        tracing::debug!(%id, replaced, "stored traffic light");
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<TrafficLight, StorageError> {
        self.lights
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound { id })
    }

    async fn update(&self, id: Uuid, edit: LightUpdate) -> Result<TrafficLight, StorageError> {
        // The write guard spans the edit.
        let mut lights = self.lights.write().await;
        let light = lights.get_mut(&id).ok_or(StorageError::NotFound { id })?;
        edit(light);
        tracing::debug!(%id, "updated traffic light");
        Ok(light.clone())
    }
}

/// Scope outcome counters for one unit of work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeStats {
    pub begun: u64,
    pub committed: u64,
    pub rolled_back: u64,
}

#[derive(Debug, Default)]
struct ScopeCounters {
    begun: AtomicU64,
    committed: AtomicU64,
    rolled_back: AtomicU64,
}

impl ScopeCounters {
    fn snapshot(&self) -> ScopeStats {
        ScopeStats {
            begun: self.begun.load(Ordering::SeqCst),
            committed: self.committed.load(Ordering::SeqCst),
            rolled_back: self.rolled_back.load(Ordering::SeqCst),
        }
    }
}

/// Unit of work over an [`InMemoryLightRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryUnitOfWork {
    repository: Arc<InMemoryLightRepository>,
    counters: Arc<ScopeCounters>,
}

impl InMemoryUnitOfWork {
    pub fn new(repository: Arc<InMemoryLightRepository>) -> Self {
        Self {
            repository,
            counters: Arc::new(ScopeCounters::default()),
        }
    }

    /// A unit of work over its own empty repository.
    pub fn fresh() -> Self {
        Self::new(Arc::new(InMemoryLightRepository::new()))
    }

    pub fn repository(&self) -> &Arc<InMemoryLightRepository> {
        &self.repository
    }

    /// How many scopes this unit of work has begun, committed and rolled back.
    pub fn stats(&self) -> ScopeStats {
        self.counters.snapshot()
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn begin(&self) -> Result<Box<dyn Transaction>, StorageError> {
        let scope = self.counters.begun.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(scope, "begin unit of work");
        Ok(Box::new(InMemoryTransaction {
            repository: Arc::clone(&self.repository),
            counters: Arc::clone(&self.counters),
            scope,
            state: ScopeState::Open,
        }))
    }

    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }
}

struct InMemoryTransaction {
    repository: Arc<InMemoryLightRepository>,
    counters: Arc<ScopeCounters>,
    scope: u64,
    state: ScopeState,
}

impl InMemoryTransaction {
    fn finish(&mut self, outcome: ScopeState) -> Result<(), StorageError> {
        if self.state != ScopeState::Open {
            return Err(StorageError::ScopeClosed { state: self.state });
        }
        self.state = outcome;
        let counter = match outcome {
            ScopeState::Committed => &self.counters.committed,
            _ => &self.counters.rolled_back,
        };
        counter.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(scope = self.scope, state = %outcome, "unit of work finished");
        Ok(())
    }
}

#[async_trait]
impl Transaction for InMemoryTransaction {
    fn lights(&self) -> &dyn LightRepository {
        self.repository.as_ref()
    }

    async fn commit(&mut self) -> Result<(), StorageError> {
        self.finish(ScopeState::Committed)
    }

    async fn rollback(&mut self) -> Result<(), StorageError> {
        self.finish(ScopeState::RolledBack)
    }
}

impl Drop for InMemoryTransaction {
    fn drop(&mut self) {
        if self.state == ScopeState::Open {
            // Implicit rollback; the map writes stay in place.
            let _ = self.finish(ScopeState::RolledBack);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conformance::run_conformance_suite;

    fn light() -> TrafficLight {
        TrafficLight::with_times(10, 5, 10).unwrap()
    }

    #[tokio::test]
    async fn in_memory_backend_passes_conformance() {
        let report = run_conformance_suite(|| async { InMemoryUnitOfWork::fresh() }).await;
        assert!(report.failed == 0, "{report}");
        assert!(report.total > 0);
    }

    #[tokio::test]
    async fn commit_is_counted() {
        let uow = InMemoryUnitOfWork::fresh();
        let mut tx = uow.begin().await.unwrap();
        tx.lights().upsert(light()).await.unwrap();
        tx.commit().await.unwrap();
        drop(tx);
        assert_eq!(
            uow.stats(),
            ScopeStats {
                begun: 1,
                committed: 1,
                rolled_back: 0
            }
        );
    }

    #[tokio::test]
    async fn dropping_open_scope_rolls_back() {
        let uow = InMemoryUnitOfWork::fresh();
        {
            let _tx = uow.begin().await.unwrap();
        }
        assert_eq!(uow.stats().rolled_back, 1);
        assert_eq!(uow.stats().committed, 0);
    }

    #[tokio::test]
    async fn rollback_keeps_applied_writes() {
        let uow = InMemoryUnitOfWork::fresh();
        let stored = light();
        let id = stored.id();
        let mut tx = uow.begin().await.unwrap();
        tx.lights().upsert(stored).await.unwrap();
        tx.rollback().await.unwrap();
        drop(tx);

        assert_eq!(uow.stats().rolled_back, 1);
        assert!(uow.repository().get(id).await.is_ok());
    }

    #[tokio::test]
    async fn clones_share_one_store() {
        let uow = InMemoryUnitOfWork::fresh();
        let other = uow.clone();
        let stored = light();
        let id = stored.id();
        uow.repository().upsert(stored).await.unwrap();
        assert_eq!(other.repository().get(id).await.unwrap().id(), id);
        assert_eq!(other.repository().len().await, 1);
    }

    #[tokio::test]
    async fn concurrent_upserts_all_land() {
        let repo = Arc::new(InMemoryLightRepository::new());
        let mut handles = Vec::new();
        for _ in 0..32 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.upsert(light()).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(repo.len().await, 32);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_updates_are_not_lost() {
        let repo = Arc::new(InMemoryLightRepository::new());
        let id = repo.upsert(light()).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..200 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.update(id, Box::new(|l: &mut TrafficLight| l.increment(1)))
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(repo.get(id).await.unwrap().signal_count(), 200);
    }
}
