// Domain layer: entities, travel tiers and ports. No I/O here.

pub mod model;
pub mod ports;
pub mod travel;
