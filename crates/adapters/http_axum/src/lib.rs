//! # dryplug-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a small JSON API exposing the latest tick snapshot and status of
//!   every supervised controller (`/api/controllers`, `/api/controllers/{id}`)
//! - Let clients flip a controller's auto-control toggle
//!   (`PUT /api/controllers/{id}/auto_control`)
//! - Let clients feed switch and sensor readings
//!   (`PUT /api/switches/{entity}`, `PUT /api/sensors/{entity}`)
//! - Map application errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `dryplug-app` (for port traits and the supervisor) and
//! `dryplug-domain` (for types used in response mapping). Never leaks axum
//! types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
mod test_support;
