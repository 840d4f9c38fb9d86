//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the engine and the adapter
//! layer can depend on them without creating circular dependencies.

pub mod clock;
pub mod gateway;
pub mod state_store;

pub use clock::{Clock, SystemClock};
pub use gateway::{ActuatorGateway, ReadingInput, SensorGateway};
pub use state_store::EngineStateStore;
