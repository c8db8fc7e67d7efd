//! Unit-of-work scope lifecycle conformance tests.
//!
//! Verifies that scopes can be committed or rolled back exactly once, that
//! committed writes are visible to later scopes, and that dropping an open
//! scope is a clean implicit rollback.

use std::future::Future;

use super::{make_light, TestResult};
use crate::{ScopeState, StorageError, UnitOfWork};

pub(super) async fn run_scope_tests<U, F, Fut>(factory: &F) -> Vec<TestResult>
where
    U: UnitOfWork,
    F: Fn() -> Fut,
    Fut: Future<Output = U>,
{
    vec![
        TestResult::from_result(
            "scope",
            "begin_and_commit_empty_scope",
            begin_and_commit_empty_scope(factory).await,
        ),
        TestResult::from_result(
            "scope",
            "begin_and_rollback_empty_scope",
            begin_and_rollback_empty_scope(factory).await,
        ),
        TestResult::from_result(
            "scope",
            "second_commit_is_scope_closed",
            second_commit_is_scope_closed(factory).await,
        ),
        TestResult::from_result(
            "scope",
            "commit_after_rollback_is_scope_closed",
            commit_after_rollback_is_scope_closed(factory).await,
        ),
        TestResult::from_result(
            "scope",
            "committed_write_visible_to_next_scope",
            committed_write_visible_to_next_scope(factory).await,
        ),
        TestResult::from_result(
            "scope",
            "dropped_scope_leaves_backend_usable",
            dropped_scope_leaves_backend_usable(factory).await,
        ),
        TestResult::from_result(
            "scope",
            "overlapping_scopes_are_allowed",
            overlapping_scopes_are_allowed(factory).await,
        ),
    ]
}

async fn begin_and_commit_empty_scope<U, F, Fut>(factory: &F) -> Result<(), String>
where
    U: UnitOfWork,
    F: Fn() -> Fut,
    Fut: Future<Output = U>,
{
    let uow = factory().await;
    let mut tx = uow.begin().await.map_err(|e| e.to_string())?;
    tx.commit().await.map_err(|e| e.to_string())
}

async fn begin_and_rollback_empty_scope<U, F, Fut>(factory: &F) -> Result<(), String>
where
    U: UnitOfWork,
    F: Fn() -> Fut,
    Fut: Future<Output = U>,
{
    let uow = factory().await;
    let mut tx = uow.begin().await.map_err(|e| e.to_string())?;
    tx.rollback().await.map_err(|e| e.to_string())
}

async fn second_commit_is_scope_closed<U, F, Fut>(factory: &F) -> Result<(), String>
where
    U: UnitOfWork,
    F: Fn() -> Fut,
    Fut: Future<Output = U>,
{
    let uow = factory().await;
    let mut tx = uow.begin().await.map_err(|e| e.to_string())?;
    tx.commit().await.map_err(|e| e.to_string())?;
    match tx.commit().await {
        Err(StorageError::ScopeClosed {
            state: ScopeState::Committed,
        }) => Ok(()),
        other => Err(format!("expected ScopeClosed(committed), got {:?}", other)),
    }
}

async fn commit_after_rollback_is_scope_closed<U, F, Fut>(factory: &F) -> Result<(), String>
where
    U: UnitOfWork,
    F: Fn() -> Fut,
    Fut: Future<Output = U>,
{
    let uow = factory().await;
    let mut tx = uow.begin().await.map_err(|e| e.to_string())?;
    tx.rollback().await.map_err(|e| e.to_string())?;
    match tx.commit().await {
        Err(StorageError::ScopeClosed {
            state: ScopeState::RolledBack,
        }) => Ok(()),
        other => Err(format!("expected ScopeClosed(rolled back), got {:?}", other)),
    }
}

async fn committed_write_visible_to_next_scope<U, F, Fut>(factory: &F) -> Result<(), String>
where
    U: UnitOfWork,
    F: Fn() -> Fut,
    Fut: Future<Output = U>,
{
    let uow = factory().await;
    let light = make_light(4, 2, 4)?;
    let id = light.id();

    let mut tx = uow.begin().await.map_err(|e| e.to_string())?;
    tx.lights().upsert(light).await.map_err(|e| e.to_string())?;
    tx.commit().await.map_err(|e| e.to_string())?;
    drop(tx);

    let tx = uow.begin().await.map_err(|e| e.to_string())?;
    tx.lights()
        .get(id)
        .await
        .map(|_| ())
        .map_err(|e| format!("committed light not visible: {}", e))
}

async fn dropped_scope_leaves_backend_usable<U, F, Fut>(factory: &F) -> Result<(), String>
where
    U: UnitOfWork,
    F: Fn() -> Fut,
    Fut: Future<Output = U>,
{
    let uow = factory().await;
    {
        let _abandoned = uow.begin().await.map_err(|e| e.to_string())?;
    }

    let light = make_light(1, 2, 3)?;
    let id = light.id();
    let mut tx = uow.begin().await.map_err(|e| e.to_string())?;
    tx.lights().upsert(light).await.map_err(|e| e.to_string())?;
    tx.commit().await.map_err(|e| e.to_string())?;

    let tx = uow.begin().await.map_err(|e| e.to_string())?;
    tx.lights()
        .get(id)
        .await
        .map(|_| ())
        .map_err(|e| format!("write after dropped scope not visible: {}", e))
}

async fn overlapping_scopes_are_allowed<U, F, Fut>(factory: &F) -> Result<(), String>
where
    U: UnitOfWork,
    F: Fn() -> Fut,
    Fut: Future<Output = U>,
{
    let uow = factory().await;
    let mut first = uow.begin().await.map_err(|e| e.to_string())?;
    let mut second = uow.begin().await.map_err(|e| e.to_string())?;

    first
        .lights()
        .upsert(make_light(1, 1, 1)?)
        .await
        .map_err(|e| e.to_string())?;
    second
        .lights()
        .upsert(make_light(2, 2, 2)?)
        .await
        .map_err(|e| e.to_string())?;

    second.commit().await.map_err(|e| e.to_string())?;
    first.commit().await.map_err(|e| e.to_string())
}
