// Scoring: composite formula and the engine that drives the sub-scores.

pub mod composite;
pub mod engine;
