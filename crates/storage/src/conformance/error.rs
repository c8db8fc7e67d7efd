use std::future::Future;

use stoplight_core::TrafficLight;
use uuid::Uuid;

use super::{make_light, TestResult};
use crate::{StorageError, UnitOfWork};

pub(super) async fn run_error_tests<U, F, Fut>(factory: &F) -> Vec<TestResult>
where
    U: UnitOfWork,
    F: Fn() -> Fut,
    Fut: Future<Output = U>,
{
    vec![
        TestResult::from_result(
            "error",
            "get_on_empty_store_is_not_found",
            get_on_empty_store_is_not_found(factory).await,
        ),
        TestResult::from_result(
            "error",
            "not_found_carries_requested_id",
            not_found_carries_requested_id(factory).await,
        ),
        TestResult::from_result(
            "error",
            "unknown_id_not_found_beside_stored_light",
            unknown_id_not_found_beside_stored_light(factory).await,
        ),
        TestResult::from_result(
            "error",
            "update_unknown_id_is_not_found",
            update_unknown_id_is_not_found(factory).await,
        ),
    ]
}

// ── 1. get on an empty store returns NotFound ─────────────────────────────────

async fn get_on_empty_store_is_not_found<U, F, Fut>(factory: &F) -> Result<(), String>
where
    U: UnitOfWork,
    F: Fn() -> Fut,
    Fut: Future<Output = U>,
{
    let uow = factory().await;
    let tx = uow.begin().await.map_err(|e| e.to_string())?;
    match tx.lights().get(Uuid::new_v4()).await {
        Err(StorageError::NotFound { .. }) => Ok(()),
        other => Err(format!("expected NotFound, got {:?}", other)),
    }
}

// ── 2. NotFound reports the id that was asked for ─────────────────────────────

async fn not_found_carries_requested_id<U, F, Fut>(factory: &F) -> Result<(), String>
where
    U: UnitOfWork,
    F: Fn() -> Fut,
    Fut: Future<Output = U>,
{
    let uow = factory().await;
    let wanted = Uuid::new_v4();
    let tx = uow.begin().await.map_err(|e| e.to_string())?;
    match tx.lights().get(wanted).await {
        Err(StorageError::NotFound { id }) if id == wanted => Ok(()),
        Err(StorageError::NotFound { id }) => {
            Err(format!("NotFound for {}, expected {}", id, wanted))
        }
        other => Err(format!("expected NotFound, got {:?}", other)),
    }
}

// ── 3. A populated store still misses unknown ids ─────────────────────────────

async fn unknown_id_not_found_beside_stored_light<U, F, Fut>(factory: &F) -> Result<(), String>
where
    U: UnitOfWork,
    F: Fn() -> Fut,
    Fut: Future<Output = U>,
{
    let uow = factory().await;
    let mut tx = uow.begin().await.map_err(|e| e.to_string())?;
    tx.lights()
        .upsert(make_light(1, 1, 1)?)
        .await
        .map_err(|e| e.to_string())?;
    tx.commit().await.map_err(|e| e.to_string())?;

    let tx = uow.begin().await.map_err(|e| e.to_string())?;
    match tx.lights().get(Uuid::new_v4()).await {
        Err(StorageError::NotFound { .. }) => Ok(()),
        other => Err(format!("expected NotFound, got {:?}", other)),
    }
}

// ── 4. update on an unknown id returns NotFound ───────────────────────────────

async fn update_unknown_id_is_not_found<U, F, Fut>(factory: &F) -> Result<(), String>
where
    U: UnitOfWork,
    F: Fn() -> Fut,
    Fut: Future<Output = U>,
{
    let uow = factory().await;
    let wanted = Uuid::new_v4();
    let tx = uow.begin().await.map_err(|e| e.to_string())?;
    match tx
        .lights()
        .update(wanted, Box::new(|l: &mut TrafficLight| l.increment(1)))
        .await
    {
        Err(StorageError::NotFound { id }) if id == wanted => Ok(()),
        other => Err(format!("expected NotFound for {}, got {:?}", wanted, other)),
    }
}
