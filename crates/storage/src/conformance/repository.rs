//! Repository read/write conformance tests.

use std::future::Future;

use stoplight_core::{LightConfig, TrafficLight};

use super::{make_light, TestResult};
use crate::UnitOfWork;

pub(super) async fn run_repository_tests<U, F, Fut>(factory: &F) -> Vec<TestResult>
where
    U: UnitOfWork,
    F: Fn() -> Fut,
    Fut: Future<Output = U>,
{
    vec![
        TestResult::from_result(
            "repository",
            "upsert_returns_light_id",
            upsert_returns_light_id(factory).await,
        ),
        TestResult::from_result(
            "repository",
            "get_after_upsert_returns_snapshot",
            get_after_upsert_returns_snapshot(factory).await,
        ),
        TestResult::from_result(
            "repository",
            "upsert_replaces_whole_entry",
            upsert_replaces_whole_entry(factory).await,
        ),
        TestResult::from_result(
            "repository",
            "distinct_ids_are_independent",
            distinct_ids_are_independent(factory).await,
        ),
        TestResult::from_result(
            "repository",
            "store_owns_its_copy",
            store_owns_its_copy(factory).await,
        ),
        TestResult::from_result(
            "repository",
            "update_edits_stored_light",
            update_edits_stored_light(factory).await,
        ),
    ]
}

/// `upsert` returns the id carried by the light.
async fn upsert_returns_light_id<U, F, Fut>(factory: &F) -> Result<(), String>
where
    U: UnitOfWork,
    F: Fn() -> Fut,
    Fut: Future<Output = U>,
{
    let uow = factory().await;
    let light = make_light(10, 5, 10)?;
    let expected = light.id();

    let mut tx = uow.begin().await.map_err(|e| e.to_string())?;
    let id = tx.lights().upsert(light).await.map_err(|e| e.to_string())?;
    tx.commit().await.map_err(|e| e.to_string())?;

    if id != expected {
        return Err(format!("expected id {}, got {}", expected, id));
    }
    Ok(())
}

/// A committed light reads back equal to what was written.
async fn get_after_upsert_returns_snapshot<U, F, Fut>(factory: &F) -> Result<(), String>
where
    U: UnitOfWork,
    F: Fn() -> Fut,
    Fut: Future<Output = U>,
{
    let uow = factory().await;
    let light = make_light(3, 1, 4)?;

    let mut tx = uow.begin().await.map_err(|e| e.to_string())?;
    let id = tx
        .lights()
        .upsert(light.clone())
        .await
        .map_err(|e| e.to_string())?;
    tx.commit().await.map_err(|e| e.to_string())?;

    let tx = uow.begin().await.map_err(|e| e.to_string())?;
    let got = tx.lights().get(id).await.map_err(|e| e.to_string())?;
    if got != light {
        return Err(format!("read back {:?}, expected {:?}", got, light));
    }
    Ok(())
}

/// A second upsert with the same id replaces every field.
async fn upsert_replaces_whole_entry<U, F, Fut>(factory: &F) -> Result<(), String>
where
    U: UnitOfWork,
    F: Fn() -> Fut,
    Fut: Future<Output = U>,
{
    let uow = factory().await;
    let first = make_light(10, 5, 10)?;
    let id = first.id();
    let replacement = TrafficLight::new(&LightConfig {
        id: Some(id),
        ..LightConfig::new(1, 0, 2).with_signal_count(9)
    })
    .map_err(|e| e.to_string())?;

    let mut tx = uow.begin().await.map_err(|e| e.to_string())?;
    tx.lights().upsert(first).await.map_err(|e| e.to_string())?;
    tx.lights()
        .upsert(replacement.clone())
        .await
        .map_err(|e| e.to_string())?;
    tx.commit().await.map_err(|e| e.to_string())?;

    let tx = uow.begin().await.map_err(|e| e.to_string())?;
    let got = tx.lights().get(id).await.map_err(|e| e.to_string())?;
    if got != replacement {
        return Err(format!("expected replacement {:?}, got {:?}", replacement, got));
    }
    Ok(())
}

/// Writing one id leaves another untouched.
async fn distinct_ids_are_independent<U, F, Fut>(factory: &F) -> Result<(), String>
where
    U: UnitOfWork,
    F: Fn() -> Fut,
    Fut: Future<Output = U>,
{
    let uow = factory().await;
    let a = make_light(1, 1, 1)?;
    let b = make_light(2, 2, 2)?;

    let mut tx = uow.begin().await.map_err(|e| e.to_string())?;
    let id_a = tx.lights().upsert(a).await.map_err(|e| e.to_string())?;
    let id_b = tx.lights().upsert(b).await.map_err(|e| e.to_string())?;
    tx.commit().await.map_err(|e| e.to_string())?;

    let tx = uow.begin().await.map_err(|e| e.to_string())?;
    let got_a = tx.lights().get(id_a).await.map_err(|e| e.to_string())?;
    let got_b = tx.lights().get(id_b).await.map_err(|e| e.to_string())?;
    if got_a.total_time() != 3 || got_b.total_time() != 6 {
        return Err(format!(
            "expected total times 3 and 6, got {} and {}",
            got_a.total_time(),
            got_b.total_time()
        ));
    }
    Ok(())
}

/// Mutating the caller's copy after upsert does not change the stored light.
async fn store_owns_its_copy<U, F, Fut>(factory: &F) -> Result<(), String>
where
    U: UnitOfWork,
    F: Fn() -> Fut,
    Fut: Future<Output = U>,
{
    let uow = factory().await;
    let mut light = make_light(10, 5, 10)?;

    let mut tx = uow.begin().await.map_err(|e| e.to_string())?;
    let id = tx
        .lights()
        .upsert(light.clone())
        .await
        .map_err(|e| e.to_string())?;
    tx.commit().await.map_err(|e| e.to_string())?;

    light.increment(7);

    let tx = uow.begin().await.map_err(|e| e.to_string())?;
    let mut got = tx.lights().get(id).await.map_err(|e| e.to_string())?;
    if got.signal_count() != 0 {
        return Err(format!(
            "stored signal_count changed to {} without an upsert",
            got.signal_count()
        ));
    }

    got.increment(3);
    let again = tx.lights().get(id).await.map_err(|e| e.to_string())?;
    if again.signal_count() != 0 {
        return Err(format!(
            "returned copy aliases the store: signal_count {}",
            again.signal_count()
        ));
    }
    Ok(())
}

/// `update` applies the edit to the stored light and returns the new value.
async fn update_edits_stored_light<U, F, Fut>(factory: &F) -> Result<(), String>
where
    U: UnitOfWork,
    F: Fn() -> Fut,
    Fut: Future<Output = U>,
{
    let uow = factory().await;
    let light = make_light(10, 5, 10)?;

    let mut tx = uow.begin().await.map_err(|e| e.to_string())?;
    let id = tx.lights().upsert(light).await.map_err(|e| e.to_string())?;
    let returned = tx
        .lights()
        .update(id, Box::new(|l: &mut TrafficLight| l.increment(4)))
        .await
        .map_err(|e| e.to_string())?;
    tx.commit().await.map_err(|e| e.to_string())?;

    if returned.signal_count() != 4 {
        return Err(format!(
            "update returned signal_count {}, expected 4",
            returned.signal_count()
        ));
    }
    let tx = uow.begin().await.map_err(|e| e.to_string())?;
    let got = tx.lights().get(id).await.map_err(|e| e.to_string())?;
    if got != returned {
        return Err(format!("stored {:?} differs from returned {:?}", got, returned));
    }
    Ok(())
}
