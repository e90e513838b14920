// Domain layer: launch models and ports. No external dependencies.

pub mod model;
pub mod ports;
