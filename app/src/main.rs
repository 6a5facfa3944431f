use clap::Parser;
use log::{debug, info};
use rusty_pool::{
    Component, System,
    ecs::{BindPool, Execute, Initialize, Matcher, Pool, Result, SystemContainer, group},
};

/// Drive a pool through a few ticks of a demo system.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of execute passes to run after initialization.
    #[arg(long, default_value_t = 2)]
    ticks: usize,

    /// Entities the demo system creates on every pass.
    #[arg(long, default_value_t = 1)]
    entities_per_tick: usize,
}

#[derive(Component, Debug, Clone)]
struct DemoComponent {
    first: String,
    second: u64,
}

#[derive(System)]
#[system(bind_pool, initialize, execute)]
struct DemoSystem {
    per_tick: usize,
    created: u64,
    group: Option<group::Id>,
}

impl DemoSystem {
    fn new(per_tick: usize) -> Self {
        Self {
            per_tick,
            created: 0,
            group: None,
        }
    }

    fn spawn(&mut self, pool: &mut Pool) -> Result<()> {
        let entity = pool.create_entity();
        pool.entity_mut(entity)?.add(DemoComponent {
            first: format!("demo-{}", self.created),
            second: self.created,
        })?;
        let component = pool.entity(entity)?.get::<DemoComponent>()?;
        debug!("{entity} carries `{}` #{}", component.first, component.second);
        self.created += 1;
        Ok(())
    }

    fn report(&self, pool: &Pool, stage: &str) {
        if let Some(group) = self.group {
            info!(
                "{stage}: {} entities match {}",
                pool.group(group).count(),
                pool.group(group).matcher()
            );
        }
    }
}

impl BindPool for DemoSystem {
    fn bind_pool(&mut self, pool: &mut Pool) -> Result<()> {
        self.group = Some(pool.get_group(Matcher::all_of(pool.spec::<DemoComponent>())));
        Ok(())
    }
}

impl Initialize for DemoSystem {
    fn initialize(&mut self, pool: &mut Pool) -> Result<()> {
        self.spawn(pool)?;
        self.report(pool, "initialize");
        Ok(())
    }
}

impl Execute for DemoSystem {
    fn execute(&mut self, pool: &mut Pool) -> Result<()> {
        for _ in 0..self.per_tick {
            self.spawn(pool)?;
        }
        self.report(pool, "execute");
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut pool = Pool::new();
    let demo = pool.create_system(DemoSystem::new(args.entities_per_tick))?;

    let mut systems = SystemContainer::new();
    systems.add(demo)?;
    systems.initialize(&mut pool)?;
    for tick in 0..args.ticks {
        info!("tick {tick}");
        systems.execute(&mut pool)?;
    }

    info!("done with {} entities", pool.entity_count());
    Ok(())
}
