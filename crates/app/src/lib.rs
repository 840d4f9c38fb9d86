//! # dryplug-app
//!
//! Application layer: the control engine and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `SensorGateway`: read switch and numeric sensor states
//!   - `ActuatorGateway`: turn a switch on or off
//!   - `ReadingInput`: feed switch and sensor readings from outside
//!   - `EngineStateStore`: load/save/delete the persisted engine state
//!   - `Clock`: wall-clock time in the controller's local offset
//! - Provide the **control engine**: one tick fuses the readings into an
//!   actuation decision, updates and persists the engine state, and returns a
//!   snapshot
//! - Provide the **supervisor** that owns one periodic, non-overlapping task
//!   per controller and publishes the latest snapshot
//!
//! ## Dependency rule
//! Depends on `dryplug-domain` only (plus `tokio` for tasks, timers and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod engine;
pub mod ports;
pub mod supervisor;

#[cfg(test)]
mod test_support;
