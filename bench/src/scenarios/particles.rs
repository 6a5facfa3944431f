//! Particle system benchmark scenario.
//!
//! Simulates a high-volume particle system with:
//! - 100,000 particles
//! - Components: Particle, Position, Velocity, Lifetime
//! - Systems: movement, lifetime decay, and a reactive respawn of expired particles
//!
//! This scenario tests:
//! - Group iteration with per-entity component access
//! - Reactive collection (particles expiring every frame)
//! - Entity destroy/create throughput with id recycling

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rusty_pool::{
    System,
    ecs::{
        Execute, Matcher, Pool, Reaction, Reactive, Result, SystemContainer, entity::Entity,
        group,
    },
};

use crate::components::{Expired, Lifetime, Particle, Position, Velocity};
use crate::scenarios::Scenario;

/// Configuration for the particle benchmark.
pub struct ParticleConfig {
    /// Total number of particles to maintain.
    pub particle_count: usize,
    /// Simulated delta time per frame.
    pub delta_time: f32,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            particle_count: 100_000,
            delta_time: 1.0 / 60.0, // 60 FPS
            seed: 12345,
        }
    }
}

struct ParticleFactory(ChaCha8Rng);

impl ParticleFactory {
    fn create_particle(&mut self, pool: &mut Pool) -> Result<Entity> {
        let rng = &mut self.0;
        let position = Position {
            x: rng.gen_range(-100.0..100.0),
            y: rng.gen_range(-100.0..100.0),
            z: rng.gen_range(-100.0..100.0),
        };
        let velocity = Velocity {
            x: rng.gen_range(-10.0..10.0),
            y: rng.gen_range(-10.0..10.0),
            z: rng.gen_range(-10.0..10.0),
        };
        let lifetime = Lifetime {
            remaining: rng.gen_range(1.0..5.0),
            total: 5.0,
        };

        let entity = pool.create_entity();
        pool.entity_mut(entity)?
            .add(Particle)?
            .add(position)?
            .add(velocity)?
            .add(lifetime)?;
        Ok(entity)
    }
}

/// System: Update particle positions based on velocity.
#[derive(System)]
#[system(execute)]
struct Movement {
    delta_time: f32,
    moving: Option<group::Id>,
}

impl Execute for Movement {
    fn execute(&mut self, pool: &mut Pool) -> Result<()> {
        let moving = *self.moving.get_or_insert_with(|| {
            pool.get_group(Matcher::all_of(pool.spec::<(Particle, Position, Velocity)>()))
        });
        for entity in pool.group(moving).entities().to_vec() {
            let velocity = *pool.entity(entity)?.get::<Velocity>()?;
            let mut entity = pool.entity_mut(entity)?;
            let position = entity.get_mut::<Position>()?;
            position.x += velocity.x * self.delta_time;
            position.y += velocity.y * self.delta_time;
            position.z += velocity.z * self.delta_time;
        }
        Ok(())
    }
}

/// System: Decay particle lifetimes and flag the ones that ran out.
#[derive(System)]
#[system(execute)]
struct LifetimeDecay {
    delta_time: f32,
    alive: Option<group::Id>,
}

impl Execute for LifetimeDecay {
    fn execute(&mut self, pool: &mut Pool) -> Result<()> {
        let alive = *self.alive.get_or_insert_with(|| {
            pool.get_group(
                Matcher::all_of(pool.spec::<Lifetime>()).and_none_of(pool.spec::<Expired>()),
            )
        });
        for entity in pool.group(alive).entities().to_vec() {
            let mut entity = pool.entity_mut(entity)?;
            let lifetime = entity.get_mut::<Lifetime>()?;
            lifetime.remaining -= self.delta_time;
            if lifetime.remaining <= 0.0 {
                entity.add(Expired)?;
            }
        }
        Ok(())
    }
}

/// System: Replace every expired particle with a fresh one.
#[derive(System)]
#[system(reactive)]
struct Respawn {
    factory: ParticleFactory,
}

impl Reactive for Respawn {
    fn reaction(&mut self, pool: &mut Pool) -> Reaction {
        Reaction::added(Matcher::all_of(pool.spec::<Expired>()))
    }

    fn react(&mut self, pool: &mut Pool, entities: &[Entity]) -> Result<()> {
        for entity in entities {
            pool.destroy_entity(*entity)?;
            self.factory.create_particle(pool)?;
        }
        Ok(())
    }
}

/// Particle system benchmark scenario.
pub struct ParticleScenario {
    config: ParticleConfig,
    pool: Pool,
    systems: SystemContainer,
}

impl ParticleScenario {
    /// Create a new particle scenario with default config.
    pub fn new() -> Self {
        Self::with_config(ParticleConfig::default())
    }

    /// Create a new particle scenario with custom config.
    pub fn with_config(config: ParticleConfig) -> Self {
        Self {
            pool: Pool::new(),
            systems: SystemContainer::new(),
            config,
        }
    }

    /// Get current particle count.
    pub fn current_count(&self) -> usize {
        self.pool.entity_count()
    }
}

impl Default for ParticleScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for ParticleScenario {
    fn name(&self) -> &'static str {
        "particles"
    }

    fn description(&self) -> &'static str {
        "High-volume particle system with movement, lifetime, and reactive respawn"
    }

    fn entity_count(&self) -> usize {
        self.config.particle_count
    }

    fn setup(&mut self) -> Result<()> {
        let mut factory = ParticleFactory(ChaCha8Rng::seed_from_u64(self.config.seed));
        for _ in 0..self.config.particle_count {
            factory.create_particle(&mut self.pool)?;
        }

        let delta_time = self.config.delta_time;
        self.systems
            .add(Movement {
                delta_time,
                moving: None,
            })?
            .add(LifetimeDecay {
                delta_time,
                alive: None,
            })?
            .add(Respawn { factory })?;
        self.systems.initialize(&mut self.pool)
    }

    fn update(&mut self) -> Result<()> {
        self.systems.execute(&mut self.pool)
    }

    fn teardown(&mut self) {
        self.systems.deactivate_reactive_systems(&mut self.pool);
        self.pool.destroy_all_entities();
    }
}
