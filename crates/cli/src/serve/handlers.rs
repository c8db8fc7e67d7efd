//! HTTP route handlers: health and traffic lights.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use stoplight_core::LightConfig;
use stoplight_service::ServiceError;
use uuid::Uuid;

use super::json_error;
use super::state::AppState;

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health() -> impl IntoResponse {
    let response = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(response))
}

/// POST /traffic-lights
pub(crate) async fn handle_upsert_light(
    State(state): State<Arc<AppState>>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    let parsed = match body {
        Ok(Json(parsed)) => parsed,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "rejected traffic light body");
            return json_error(StatusCode::BAD_REQUEST, &rejection.body_text()).into_response();
        }
    };

    let config = match LightConfig::from_json(&parsed) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "rejected traffic light input");
            return service_error(e.into());
        }
    };

    match stoplight_service::upsert_light(&config, state.uow.as_ref()).await {
        Ok(id) => (StatusCode::OK, Json(serde_json::json!({ "id": id }))).into_response(),
        Err(e) => service_error(e),
    }
}

/// GET /traffic-lights/{id}
pub(crate) async fn handle_get_light(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match stoplight_service::get_light(id, state.uow.as_ref()).await {
        Ok(light) => (StatusCode::OK, Json(light)).into_response(),
        Err(e) => service_error(e),
    }
}

/// GET /traffic-lights/{id}/color
pub(crate) async fn handle_color(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let light = match stoplight_service::get_light(id, state.uow.as_ref()).await {
        Ok(light) => light,
        Err(e) => return service_error(e),
    };
    match light.color() {
        Ok(color) => {
            let response = serde_json::json!({
                "id": light.id(),
                "color": color,
                "signal_count": light.signal_count(),
            });
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => service_error(e.into()),
    }
}

#[derive(Debug, Deserialize)]
struct AdvanceRequest {
    #[serde(default = "one_step")]
    steps: u32,
}

fn one_step() -> u32 {
    1
}

/// POST /traffic-lights/{id}/advance
///
/// An empty body advances by one tick.
pub(crate) async fn handle_advance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let steps = if body.iter().all(u8::is_ascii_whitespace) {
        one_step()
    } else {
        match serde_json::from_slice::<AdvanceRequest>(&body) {
            Ok(request) => request.steps,
            Err(e) => {
                return json_error(
                    StatusCode::BAD_REQUEST,
                    &format!("'steps' must be a non-negative integer: {}", e),
                )
                .into_response()
            }
        }
    };

    match stoplight_service::advance_light(id, steps, state.uow.as_ref()).await {
        Ok(light) => (StatusCode::OK, Json(light)).into_response(),
        Err(e) => service_error(e),
    }
}

fn parse_id(raw: &str) -> Result<Uuid, Response> {
    Uuid::parse_str(raw).map_err(|_| {
        json_error(
            StatusCode::BAD_REQUEST,
            &format!("'{}' is not a valid traffic light id", raw),
        )
        .into_response()
    })
}

/// Map a service failure onto a status code.
///
/// Light errors carry their structured `detail` next to the message.
fn service_error(err: ServiceError) -> Response {
    let status = if err.is_validation() {
        StatusCode::BAD_REQUEST
    } else if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        tracing::error!(error = %err, "request failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };
    match &err {
        ServiceError::Light(light_err) => (status, Json(light_err.to_json_value())).into_response(),
        _ => json_error(status, &err.to_string()).into_response(),
    }
}
