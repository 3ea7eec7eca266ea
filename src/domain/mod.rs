// Domain layer: chart data model and the ports to external backends.

pub mod model;
pub mod ports;
