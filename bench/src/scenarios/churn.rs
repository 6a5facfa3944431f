//! Group churn benchmark scenario.
//!
//! Keeps a fixed population of entities and many overlapping groups built from eight marker
//! components, then toggles random markers on random entities every frame.
//!
//! This scenario tests:
//! - Routing cost of one component change across the groups that reference it
//! - Group enter/exit bookkeeping under heavy transition rates

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rusty_pool::ecs::{
    Matcher, Pool, Result,
    component::{self, Component},
    entity::Entity,
    group,
};

use crate::components::{
    MARKER_COUNT, MarkerA, MarkerB, MarkerC, MarkerD, MarkerE, MarkerF, MarkerG, MarkerH,
};
use crate::scenarios::Scenario;

/// Configuration for the group churn benchmark.
pub struct ChurnConfig {
    /// Number of live entities.
    pub entity_count: usize,
    /// Number of groups, built from random matchers over the markers.
    pub group_count: usize,
    /// Marker toggles per frame.
    pub toggles_per_frame: usize,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for ChurnConfig {
    fn default() -> Self {
        Self {
            entity_count: 10_000,
            group_count: 32,
            toggles_per_frame: 1_000,
            seed: 12345,
        }
    }
}

/// Group churn benchmark scenario.
pub struct ChurnScenario {
    config: ChurnConfig,
    pool: Pool,
    rng: ChaCha8Rng,
    entities: Vec<Entity>,
    groups: Vec<group::Id>,
}

impl ChurnScenario {
    pub fn new() -> Self {
        Self::with_config(ChurnConfig::default())
    }

    pub fn with_config(config: ChurnConfig) -> Self {
        Self {
            pool: Pool::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            entities: Vec::with_capacity(config.entity_count),
            groups: Vec::with_capacity(config.group_count),
            config,
        }
    }

    /// Total membership across all groups.
    pub fn membership(&self) -> usize {
        self.groups
            .iter()
            .map(|id| self.pool.group(*id).count())
            .sum()
    }

    /// Number of distinct groups the pool built; equal random matchers share one.
    pub fn distinct_groups(&self) -> usize {
        self.pool.group_count()
    }

    fn markers(&self) -> [component::Id; MARKER_COUNT] {
        [
            self.pool.register::<MarkerA>(),
            self.pool.register::<MarkerB>(),
            self.pool.register::<MarkerC>(),
            self.pool.register::<MarkerD>(),
            self.pool.register::<MarkerE>(),
            self.pool.register::<MarkerF>(),
            self.pool.register::<MarkerG>(),
            self.pool.register::<MarkerH>(),
        ]
    }

    fn random_matcher(&mut self, markers: &[component::Id; MARKER_COUNT]) -> Matcher {
        let rng = &mut self.rng;
        let mut pick = |min: usize, max: usize| -> Vec<component::Id> {
            let n = rng.gen_range(min..max);
            (0..n)
                .map(|_| markers[rng.gen_range(0..MARKER_COUNT)])
                .collect()
        };
        let all = pick(1, 3);
        let any = pick(0, 3);
        let none = pick(0, 2);
        Matcher::all_of(all).and_any_of(any).and_none_of(none)
    }

    fn toggle<C: Component + Default>(pool: &mut Pool, entity: Entity) -> Result<()> {
        let mut entity = pool.entity_mut(entity)?;
        if entity.has::<C>() {
            entity.remove::<C>()?;
        } else {
            entity.add(C::default())?;
        }
        Ok(())
    }
}

impl Default for ChurnScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for ChurnScenario {
    fn name(&self) -> &'static str {
        "group_churn"
    }

    fn description(&self) -> &'static str {
        "Random marker toggles across many overlapping groups"
    }

    fn entity_count(&self) -> usize {
        self.config.entity_count
    }

    fn setup(&mut self) -> Result<()> {
        let markers = self.markers();
        for _ in 0..self.config.group_count {
            let matcher = self.random_matcher(&markers);
            self.groups.push(self.pool.get_group(matcher));
        }
        for _ in 0..self.config.entity_count {
            self.entities.push(self.pool.create_entity());
        }
        Ok(())
    }

    fn update(&mut self) -> Result<()> {
        for _ in 0..self.config.toggles_per_frame {
            let entity = self.entities[self.rng.gen_range(0..self.entities.len())];
            let pool = &mut self.pool;
            match self.rng.gen_range(0..MARKER_COUNT) {
                0 => Self::toggle::<MarkerA>(pool, entity)?,
                1 => Self::toggle::<MarkerB>(pool, entity)?,
                2 => Self::toggle::<MarkerC>(pool, entity)?,
                3 => Self::toggle::<MarkerD>(pool, entity)?,
                4 => Self::toggle::<MarkerE>(pool, entity)?,
                5 => Self::toggle::<MarkerF>(pool, entity)?,
                6 => Self::toggle::<MarkerG>(pool, entity)?,
                _ => Self::toggle::<MarkerH>(pool, entity)?,
            }
        }
        Ok(())
    }

    fn teardown(&mut self) {
        self.pool.destroy_all_entities();
        self.entities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn churn_scenario_moves_entities_between_groups() {
        let mut scenario = ChurnScenario::with_config(ChurnConfig {
            entity_count: 50,
            group_count: 8,
            toggles_per_frame: 200,
            ..Default::default()
        });

        scenario.setup().unwrap();
        assert!(scenario.distinct_groups() <= 8);
        for _ in 0..5 {
            scenario.update().unwrap();
        }
        assert_eq!(scenario.pool.entity_count(), 50);

        scenario.teardown();
        assert_eq!(scenario.membership(), 0);
    }
}
