//! Simulation engine.
//!
//! [`SimulationEngine`] is the only caller of the
//! [`RequestGovernor`](crate::governor::RequestGovernor): it turns a
//! decision into prompts, routes each branch through the governed request
//! path, degrades to procedural generation when no payload comes back, and
//! assembles/persists the finished [`SimulationResult`](crate::SimulationResult).
//!
//! Construct engines through [`Verdandi::builder()`].

mod builder;
mod simulation;

pub use builder::{Verdandi, VerdandiBuilder};
pub use simulation::SimulationEngine;
