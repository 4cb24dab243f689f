pub mod roster_pipeline;
