// Domain layer: core models and ports (interfaces). No transport or file I/O here.

pub mod model;
pub mod ports;
