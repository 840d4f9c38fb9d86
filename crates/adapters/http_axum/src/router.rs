//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use dryplug_app::ports::{ActuatorGateway, Clock, EngineStateStore, ReadingInput, SensorGateway};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests the API routes under `/api` and includes a [`TraceLayer`] that logs
/// each HTTP request/response at the `DEBUG` level.
pub fn build<S, A, St, C>(state: AppState<S, A, St, C>) -> Router
where
    S: SensorGateway + ReadingInput + Send + Sync + 'static,
    A: ActuatorGateway + Send + Sync + 'static,
    St: EngineStateStore + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::{StubEnvironment, test_state};

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let (state, _env) = test_state(StubEnvironment::default());
        let app = build(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_return_not_found_when_route_unknown() {
        let (state, _env) = test_state(StubEnvironment::default());
        let app = build(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/devices")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
