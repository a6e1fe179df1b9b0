// Domain layer: report data model and ports (interfaces).

pub mod model;
pub mod ports;
