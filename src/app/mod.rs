// Application layer: roster parsing, travel classification, reporting and the pipeline wiring.

pub mod classifier;
pub mod pipelines;
pub mod report;
pub mod roster;
