use log::{debug, info, warn};

use crate::ecs::{
    Collector, Pool,
    entity::Entity,
    error::{Error, Result},
    system::{Capabilities, Execute, Initialize, Reaction, System},
};

/// The collector feeding a reactive system, and the reaction it was built from.
struct Reactor {
    collector: Collector,
    reaction: Reaction,
}

struct Entry {
    system: Box<dyn System>,
    capabilities: Capabilities,
    reactor: Option<Reactor>,
}

/// An ordered list of systems with a one-time initialization stage and a repeated execute stage.
///
/// Systems run in registration order in both stages; there is no reordering. The first hook that
/// fails aborts the pass and its error is returned as is.
///
/// A container is itself a [`System`] with the initialize and execute capabilities, so containers
/// nest: adding one container to another runs the inner systems at that position.
#[derive(Default)]
pub struct SystemContainer {
    entries: Vec<Entry>,
    initialized: bool,
}

impl SystemContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a system.
    ///
    /// Fails with [`Error::AlreadyInitialized`] once the container has been initialized.
    pub fn add<S: System>(&mut self, system: S) -> Result<&mut Self> {
        self.add_boxed(Box::new(system))
    }

    pub fn add_boxed(&mut self, mut system: Box<dyn System>) -> Result<&mut Self> {
        if self.initialized {
            return Err(Error::AlreadyInitialized);
        }
        let capabilities = Capabilities::of(system.as_mut());
        if capabilities.is_empty() {
            warn!(
                "system `{}` has no capabilities and will never run",
                system.name()
            );
        } else {
            debug!("added system `{}` {:?}", system.name(), capabilities);
        }
        self.entries.push(Entry {
            system,
            capabilities,
            reactor: None,
        });
        Ok(self)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Names of the systems, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.system.name())
    }

    /// Run every initialize hook once, in registration order.
    ///
    /// Reactive systems start collecting before any hook runs, so changes made during
    /// initialization reach them on the first execute pass.
    ///
    /// If a hook fails, its error is returned, every collector started here is dropped, and the
    /// container (nested containers included) is left uninitialized so the call can be retried.
    /// Fails with [`Error::AlreadyInitialized`] once a call has succeeded.
    pub fn initialize(&mut self, pool: &mut Pool) -> Result<()> {
        if self.initialized {
            return Err(Error::AlreadyInitialized);
        }

        for entry in &mut self.entries {
            if !entry.capabilities.reactive {
                continue;
            }
            if let Some(reactive) = entry.system.as_reactive() {
                let reaction = reactive.reaction(pool);
                let collector = Collector::new(pool, reaction.matcher.clone(), reaction.trigger);
                entry.reactor = Some(Reactor {
                    collector,
                    reaction,
                });
            }
        }

        if let Err(error) = self.run_initialize_hooks(pool) {
            warn!("initialization failed, rolling back: {error}");
            self.reset(pool);
            return Err(error);
        }

        self.initialized = true;
        info!("initialized {} systems", self.entries.len());
        Ok(())
    }

    fn run_initialize_hooks(&mut self, pool: &mut Pool) -> Result<()> {
        for entry in &mut self.entries {
            if !entry.capabilities.initialize {
                continue;
            }
            if let Some(system) = entry.system.as_initialize() {
                system.initialize(pool)?;
            }
        }
        Ok(())
    }

    /// Drop every collector and mark this container and its nested containers uninitialized.
    fn reset(&mut self, pool: &mut Pool) {
        for entry in &mut self.entries {
            if let Some(mut reactor) = entry.reactor.take() {
                reactor.collector.deactivate(pool);
            }
            if let Some(nested) = entry.system.as_container() {
                nested.reset(pool);
            }
        }
        self.initialized = false;
    }

    /// Run one pass: every execute hook, and every reactive system with collected entities, in
    /// registration order.
    ///
    /// When a reactive system fails, the entities it was handed stay collected for the next pass.
    ///
    /// Fails with [`Error::NotInitialized`] before [`initialize`](Self::initialize).
    pub fn execute(&mut self, pool: &mut Pool) -> Result<()> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }

        for entry in &mut self.entries {
            if entry.capabilities.execute
                && let Some(system) = entry.system.as_execute()
            {
                system.execute(pool)?;
            }

            let Some(reactor) = &mut entry.reactor else {
                continue;
            };
            if reactor.collector.is_empty() {
                continue;
            }
            let entities: Vec<Entity> = reactor
                .collector
                .drain()
                .into_iter()
                .filter(|entity| reactor.reaction.accepts(pool, *entity))
                .collect();
            if entities.is_empty() {
                continue;
            }
            if let Some(system) = entry.system.as_reactive()
                && let Err(error) = system.react(pool, &entities)
            {
                // Handed back so the next pass sees them again
                reactor.collector.restore(entities);
                return Err(error);
            }
        }
        Ok(())
    }

    /// Resume collecting for every reactive system, including those of nested containers.
    pub fn activate_reactive_systems(&mut self, pool: &mut Pool) {
        self.each_reactor(&mut |reactor| reactor.collector.activate(pool));
    }

    /// Stop collecting for every reactive system and drop what was collected.
    pub fn deactivate_reactive_systems(&mut self, pool: &mut Pool) {
        self.each_reactor(&mut |reactor| reactor.collector.deactivate(pool));
    }

    /// Drop what every reactive system collected so far.
    pub fn clear_reactive_systems(&mut self) {
        self.each_reactor(&mut |reactor| reactor.collector.clear());
    }

    fn each_reactor(&mut self, f: &mut dyn FnMut(&mut Reactor)) {
        for entry in &mut self.entries {
            if let Some(reactor) = &mut entry.reactor {
                f(reactor);
            }
            if let Some(nested) = entry.system.as_container() {
                nested.each_reactor(f);
            }
        }
    }
}

impl System for SystemContainer {
    fn as_initialize(&mut self) -> Option<&mut dyn Initialize> {
        Some(self)
    }

    fn as_execute(&mut self) -> Option<&mut dyn Execute> {
        Some(self)
    }

    fn as_container(&mut self) -> Option<&mut SystemContainer> {
        Some(self)
    }
}

impl Initialize for SystemContainer {
    fn initialize(&mut self, pool: &mut Pool) -> Result<()> {
        SystemContainer::initialize(self, pool)
    }
}

impl Execute for SystemContainer {
    fn execute(&mut self, pool: &mut Pool) -> Result<()> {
        SystemContainer::execute(self, pool)
    }
}
