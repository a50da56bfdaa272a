// Domain layer: form values, remote answers and the ports the workflow calls through.

pub mod model;
pub mod ports;
