//! Virtual device implementations: switch, sensor, power meter.

mod meter;
mod sensor;
mod switch;

pub use meter::VirtualMeter;
pub use sensor::VirtualSensor;
pub use switch::VirtualSwitch;

/// Wrapper enum for the concrete virtual device types.
pub enum VirtualDevice {
    Switch(VirtualSwitch),
    Sensor(VirtualSensor),
    Meter(VirtualMeter),
}
