//! System-driven benchmark scenarios.
//!
//! # Scenarios
//!
//! - **Particles**: high entity count, execute systems plus a reactive respawn system
//! - **Group churn**: many overlapping groups, markers toggled at random

pub mod churn;
pub mod particles;

pub use churn::{ChurnConfig, ChurnScenario};
pub use particles::{ParticleConfig, ParticleScenario};

use rusty_pool::ecs::Result;

/// Common trait for benchmark scenarios.
pub trait Scenario {
    /// Human-readable name of the scenario.
    fn name(&self) -> &'static str;

    /// Brief description of what this scenario tests.
    fn description(&self) -> &'static str;

    /// Number of live entities in this scenario.
    fn entity_count(&self) -> usize;

    /// Set up the scenario (create entities, initialize systems).
    fn setup(&mut self) -> Result<()>;

    /// Run one "frame" of the scenario.
    fn update(&mut self) -> Result<()>;

    /// Clean up the scenario.
    fn teardown(&mut self);
}
