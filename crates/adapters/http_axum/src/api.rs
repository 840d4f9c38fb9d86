//! JSON REST API.
//!
//! - `GET /api/controllers`                  : every controller with its latest snapshot
//! - `GET /api/controllers/{id}`             : one controller
//! - `PUT /api/controllers/{id}/auto_control`: turn automatic control on or off
//! - `PUT /api/switches/{entity}`            : feed a switch state
//! - `PUT /api/sensors/{entity}`             : feed a sensor reading

#[allow(clippy::missing_errors_doc)]
pub mod controllers;
#[allow(clippy::missing_errors_doc)]
pub mod entities;

use axum::Router;
use axum::routing::{get, put};

use dryplug_app::ports::{ActuatorGateway, Clock, EngineStateStore, ReadingInput, SensorGateway};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<S, A, St, C>() -> Router<AppState<S, A, St, C>>
where
    S: SensorGateway + ReadingInput + Send + Sync + 'static,
    A: ActuatorGateway + Send + Sync + 'static,
    St: EngineStateStore + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/controllers", get(controllers::list::<S, A, St, C>))
        .route("/controllers/{id}", get(controllers::get::<S, A, St, C>))
        .route(
            "/controllers/{id}/auto_control",
            put(controllers::set_auto_control::<S, A, St, C>),
        )
        .route(
            "/switches/{entity}",
            put(entities::update_switch::<S, A, St, C>),
        )
        .route(
            "/sensors/{entity}",
            put(entities::update_sensor::<S, A, St, C>),
        )
}
