//! Entity readings: what the sensor gateway reports for a reference.
//!
//! A reference (e.g. `switch.cellar_plug`, `sensor.cellar_power`) resolves
//! either to nothing (the gateway returns `None`) or to one of the states
//! defined here.

mod numeric;
mod state;

pub use numeric::NumericState;
pub use state::{EntityState, UnknownEntityState};
