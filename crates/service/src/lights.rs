//! Service operations shared by the CLI and HTTP transports.
//!
//! Each operation runs inside one unit-of-work scope. Input is validated
//! before the scope is opened, so a rejected request never starts a
//! transaction.

use stoplight_core::{LightConfig, TrafficLight};
use stoplight_storage::UnitOfWork;
use uuid::Uuid;

use crate::error::ServiceError;

/// Create a light from `config`, or replace the one with `config.id`.
///
/// Returns the stored light's id.
pub async fn upsert_light(config: &LightConfig, uow: &dyn UnitOfWork) -> Result<Uuid, ServiceError> {
    let light = TrafficLight::new(config)?;

    let mut tx = uow.begin().await?;
    let id = tx.lights().upsert(light).await?;
    tx.commit().await?;

    tracing::info!(%id, backend = uow.backend_name(), "upserted traffic light");
    Ok(id)
}

/// Read a light by id.
///
/// The scope is read-only and ends in an implicit rollback.
pub async fn get_light(id: Uuid, uow: &dyn UnitOfWork) -> Result<TrafficLight, ServiceError> {
    let tx = uow.begin().await?;
    let light = tx.lights().get(id).await?;
    Ok(light)
}

/// Move a stored light forward by `steps` ticks and store the result.
///
/// The increment runs inside the repository's atomic update, so concurrent
/// advances of one light all count. `updated_at` keeps its construction value.
pub async fn advance_light(
    id: Uuid,
    steps: u32,
    uow: &dyn UnitOfWork,
) -> Result<TrafficLight, ServiceError> {
    let mut tx = uow.begin().await?;
    let light = tx
        .lights()
        .update(id, Box::new(move |light: &mut TrafficLight| light.increment(steps)))
        .await?;
    tx.commit().await?;

    tracing::debug!(%id, steps, signal_count = light.signal_count(), "advanced traffic light");
    Ok(light)
}
