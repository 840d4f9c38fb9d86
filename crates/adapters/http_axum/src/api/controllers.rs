//! JSON REST handlers for supervised controllers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use dryplug_app::ports::{ActuatorGateway, Clock, EngineStateStore, SensorGateway};
use dryplug_app::supervisor::ControllerView;
use dryplug_domain::error::DryPlugError;
use dryplug_domain::id::ControllerKey;
use dryplug_domain::snapshot::TickSnapshot;

use crate::error::ApiError;
use crate::state::AppState;

/// Public representation of a controller.
#[derive(Debug, Serialize)]
pub struct ControllerBody {
    pub id: String,
    pub name: String,
    pub auto_control_entity: String,
    pub status_unique_id: String,
    /// Status label, `null` until the first successful tick.
    pub status: Option<&'static str>,
    pub snapshot: Option<TickSnapshot>,
}

impl From<ControllerView> for ControllerBody {
    fn from(view: ControllerView) -> Self {
        Self {
            id: view.config.key.to_string(),
            name: view.config.name.clone(),
            auto_control_entity: view.config.auto_control_entity(),
            status_unique_id: view.config.key.status_unique_id(),
            status: view.snapshot.map(|s| s.status().label()),
            snapshot: view.snapshot,
        }
    }
}

/// Request body for the auto-control toggle.
#[derive(Debug, Deserialize)]
pub struct AutoControlRequest {
    pub on: bool,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<ControllerBody>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<ControllerBody>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the auto-control endpoint.
pub enum AutoControlResponse {
    NoContent,
}

impl IntoResponse for AutoControlResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/controllers`
pub async fn list<S, A, St, C>(
    State(state): State<AppState<S, A, St, C>>,
) -> Result<ListResponse, ApiError>
where
    S: SensorGateway + Send + Sync + 'static,
    A: ActuatorGateway + Send + Sync + 'static,
    St: EngineStateStore + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let controllers = state
        .supervisor
        .list()
        .into_iter()
        .map(ControllerBody::from)
        .collect();
    Ok(ListResponse::Ok(Json(controllers)))
}

/// `GET /api/controllers/{id}`
pub async fn get<S, A, St, C>(
    State(state): State<AppState<S, A, St, C>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    S: SensorGateway + Send + Sync + 'static,
    A: ActuatorGateway + Send + Sync + 'static,
    St: EngineStateStore + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let key: ControllerKey = id.parse().map_err(DryPlugError::from)?;
    let view = state.supervisor.get(&key)?;
    Ok(GetResponse::Ok(Json(view.into())))
}

/// `PUT /api/controllers/{id}/auto_control`
pub async fn set_auto_control<S, A, St, C>(
    State(state): State<AppState<S, A, St, C>>,
    Path(id): Path<String>,
    Json(req): Json<AutoControlRequest>,
) -> Result<AutoControlResponse, ApiError>
where
    S: SensorGateway + Send + Sync + 'static,
    A: ActuatorGateway + Send + Sync + 'static,
    St: EngineStateStore + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let key: ControllerKey = id.parse().map_err(DryPlugError::from)?;
    state.supervisor.set_auto_control(&key, req.on).await?;
    Ok(AutoControlResponse::NoContent)
}
