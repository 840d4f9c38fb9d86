//! JSON REST handlers feeding switch and sensor readings.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use dryplug_app::ports::{ActuatorGateway, Clock, EngineStateStore, ReadingInput, SensorGateway};
use dryplug_domain::entity::{EntityState, NumericState};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for a switch update, e.g. `{"state": "on"}`.
#[derive(Debug, Deserialize)]
pub struct UpdateSwitchRequest {
    pub state: EntityState,
}

/// Request body for a sensor update, e.g. `{"state": {"value": 72.5}}` or
/// `{"state": "unavailable"}`.
#[derive(Debug, Deserialize)]
pub struct UpdateSensorRequest {
    pub state: NumericState,
}

/// Possible responses from the update endpoints.
pub enum UpdateResponse {
    NoContent,
}

impl IntoResponse for UpdateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `PUT /api/switches/{entity}`
pub async fn update_switch<S, A, St, C>(
    State(state): State<AppState<S, A, St, C>>,
    Path(entity): Path<String>,
    Json(req): Json<UpdateSwitchRequest>,
) -> Result<UpdateResponse, ApiError>
where
    S: SensorGateway + ReadingInput + Send + Sync + 'static,
    A: ActuatorGateway + Send + Sync + 'static,
    St: EngineStateStore + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    state.sensors.update_switch(&entity, req.state).await?;
    Ok(UpdateResponse::NoContent)
}

/// `PUT /api/sensors/{entity}`
pub async fn update_sensor<S, A, St, C>(
    State(state): State<AppState<S, A, St, C>>,
    Path(entity): Path<String>,
    Json(req): Json<UpdateSensorRequest>,
) -> Result<UpdateResponse, ApiError>
where
    S: SensorGateway + ReadingInput + Send + Sync + 'static,
    A: ActuatorGateway + Send + Sync + 'static,
    St: EngineStateStore + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    state.sensors.update_numeric(&entity, req.state).await?;
    Ok(UpdateResponse::NoContent)
}
