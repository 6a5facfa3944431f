use rusty_pool::{
    Component, System,
    ecs::{
        Execute, Matcher, Pool, Reaction, Reactive, Result, SystemContainer, entity::Entity,
    },
};

const BOUNDS: f32 = 10.0;
const TICKS: usize = 20;

#[derive(Component, Debug, Clone, Copy)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Component, Debug, Clone, Copy)]
struct Velocity {
    dx: f32,
    dy: f32,
}

#[derive(Component)]
struct Escaped;

/// Moves every body that has not escaped yet. Positions are replaced rather than edited so
/// reactive systems hear about it.
#[derive(System)]
#[system(execute)]
struct Movement;

impl Execute for Movement {
    fn execute(&mut self, pool: &mut Pool) -> Result<()> {
        let moving = pool.get_group(
            Matcher::all_of(pool.spec::<(Position, Velocity)>())
                .and_none_of(pool.spec::<Escaped>()),
        );
        for entity in pool.group(moving).entities().to_vec() {
            let view = pool.entity(entity)?;
            let position = *view.get::<Position>()?;
            let velocity = *view.get::<Velocity>()?;
            pool.entity_mut(entity)?.replace(Position {
                x: position.x + velocity.dx,
                y: position.y + velocity.dy,
            })?;
        }
        Ok(())
    }
}

/// Flags bodies whose updated position left the bounds.
#[derive(System)]
#[system(reactive)]
struct Boundary;

impl Reactive for Boundary {
    fn reaction(&mut self, pool: &mut Pool) -> Reaction {
        Reaction::updated(Matcher::all_of(pool.spec::<Position>()))
            .with_exclude(Matcher::all_of(pool.spec::<Escaped>()))
    }

    fn react(&mut self, pool: &mut Pool, entities: &[Entity]) -> Result<()> {
        for entity in entities {
            let position = *pool.entity(*entity)?.get::<Position>()?;
            if position.x.abs() > BOUNDS || position.y.abs() > BOUNDS {
                pool.entity_mut(*entity)?.add(Escaped)?;
            }
        }
        Ok(())
    }
}

/// Destroys escaped bodies.
#[derive(System)]
#[system(reactive)]
struct Reaper {
    reaped: usize,
}

impl Reactive for Reaper {
    fn reaction(&mut self, pool: &mut Pool) -> Reaction {
        Reaction::added(Matcher::all_of(pool.spec::<Escaped>()))
    }

    fn react(&mut self, pool: &mut Pool, entities: &[Entity]) -> Result<()> {
        for entity in entities {
            pool.destroy_entity(*entity)?;
            self.reaped += 1;
            println!("{entity} escaped ({} so far)", self.reaped);
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let mut pool = Pool::new();
    for i in 0..8 {
        let speed = 0.25 * (i + 1) as f32;
        let entity = pool.create_entity();
        pool.entity_mut(entity)?
            .add(Position { x: 0.0, y: 0.0 })?
            .add(Velocity {
                dx: speed,
                dy: -speed / 2.0,
            })?;
    }

    let mut systems = SystemContainer::new();
    systems
        .add(Movement)?
        .add(Boundary)?
        .add(Reaper { reaped: 0 })?;
    systems.initialize(&mut pool)?;

    let bodies = pool.get_group(Matcher::all_of(pool.spec::<Position>()));
    for tick in 1..=TICKS {
        systems.execute(&mut pool)?;
        println!("tick {tick}: {} bodies in bounds", pool.group(bodies).count());
    }
    Ok(())
}
