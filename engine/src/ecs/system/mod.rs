//! Systems and the container that drives them.
//!
//! # Overview
//!
//! A system is any `'static` type that implements [`System`] plus one or more capability traits:
//!
//! - [`BindPool`]: receives the pool once, when created through [`Pool::create_system`]
//! - [`Initialize`]: runs once, when the owning [`SystemContainer`] is initialized
//! - [`Execute`]: runs on every [`SystemContainer::execute`] pass
//! - [`Reactive`]: runs on an execute pass only when the entities it watches changed
//!
//! [`System`] exposes the capabilities through `as_*` accessors, which `#[derive(System)]`
//! generates from a `#[system(...)]` attribute:
//!
//! ```rust,ignore
//! use rusty_pool::{System, ecs::{Execute, Matcher, Pool, Result}};
//!
//! #[derive(System)]
//! #[system(execute)]
//! struct Movement;
//!
//! impl Execute for Movement {
//!     fn execute(&mut self, pool: &mut Pool) -> Result<()> {
//!         let moving = pool.get_group(Matcher::all_of(pool.spec::<(Position, Velocity)>()));
//!         for entity in pool.group(moving).entities().to_vec() {
//!             let velocity = *pool.entity(entity)?.get::<Velocity>()?;
//!             let mut entity = pool.entity_mut(entity)?;
//!             let position = entity.get_mut::<Position>()?;
//!             position.x += velocity.dx;
//!             position.y += velocity.dy;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let mut systems = SystemContainer::new();
//! systems.add(Movement)?;
//! systems.initialize(&mut pool)?;
//! systems.execute(&mut pool)?;
//! ```
mod container;

use crate::ecs::{Matcher, Pool, Trigger, entity::Entity, error::Result};

pub use container::SystemContainer;

/// Receives the pool a system is created for.
pub trait BindPool {
    fn bind_pool(&mut self, pool: &mut Pool) -> Result<()>;
}

/// One-time setup, run in registration order by [`SystemContainer::initialize`].
pub trait Initialize {
    fn initialize(&mut self, pool: &mut Pool) -> Result<()>;
}

/// Per-tick work, run in registration order by [`SystemContainer::execute`].
pub trait Execute {
    fn execute(&mut self, pool: &mut Pool) -> Result<()>;
}

/// Work driven by group changes rather than by every tick.
///
/// When the container is initialized it asks the system for its [`Reaction`] and starts collecting
/// the entities that fire it. On each execute pass the collected entities are drained, filtered
/// through the reaction's `ensure` and `exclude` matchers, and handed to [`react`](Self::react) if
/// any remain.
pub trait Reactive {
    fn reaction(&mut self, pool: &mut Pool) -> Reaction;

    fn react(&mut self, pool: &mut Pool, entities: &[Entity]) -> Result<()>;
}

/// What a [`Reactive`] system watches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub matcher: Matcher,
    pub trigger: Trigger,
    /// Collected entities must still match this when the system runs.
    pub ensure: Option<Matcher>,
    /// Collected entities must not match this when the system runs.
    pub exclude: Option<Matcher>,
}

impl Reaction {
    pub fn new(matcher: Matcher, trigger: Trigger) -> Self {
        Self {
            matcher,
            trigger,
            ensure: None,
            exclude: None,
        }
    }

    /// React to entities entering the group for `matcher`.
    pub fn added(matcher: Matcher) -> Self {
        Self::new(matcher, Trigger::Added)
    }

    /// React to entities leaving the group for `matcher`.
    pub fn removed(matcher: Matcher) -> Self {
        Self::new(matcher, Trigger::Removed)
    }

    /// React to members of the group for `matcher` having a component replaced.
    pub fn updated(matcher: Matcher) -> Self {
        Self::new(matcher, Trigger::Updated)
    }

    pub fn with_ensure(mut self, matcher: Matcher) -> Self {
        self.ensure = Some(matcher);
        self
    }

    pub fn with_exclude(mut self, matcher: Matcher) -> Self {
        self.exclude = Some(matcher);
        self
    }

    /// Determine if a collected entity should be handed to the system.
    pub(crate) fn accepts(&self, pool: &Pool, entity: Entity) -> bool {
        let Ok(entity) = pool.entity(entity) else {
            return false;
        };
        self.ensure.as_ref().is_none_or(|m| entity.matches(m))
            && !self.exclude.as_ref().is_some_and(|m| entity.matches(m))
    }
}

/// A unit of logic that a [`SystemContainer`] drives.
///
/// Every accessor defaults to `None`; a system exposes a capability by returning itself. Use
/// `#[derive(System)]` rather than writing the accessors by hand.
pub trait System: 'static {
    /// Name used in logs and errors.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn as_bind_pool(&mut self) -> Option<&mut dyn BindPool> {
        None
    }

    fn as_initialize(&mut self) -> Option<&mut dyn Initialize> {
        None
    }

    fn as_execute(&mut self) -> Option<&mut dyn Execute> {
        None
    }

    fn as_reactive(&mut self) -> Option<&mut dyn Reactive> {
        None
    }

    /// Nested containers expose themselves so reactive controls reach their systems.
    fn as_container(&mut self) -> Option<&mut SystemContainer> {
        None
    }
}

/// The capabilities a system exposed when it entered a container.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub bind_pool: bool,
    pub initialize: bool,
    pub execute: bool,
    pub reactive: bool,
}

impl Capabilities {
    pub fn of(system: &mut dyn System) -> Self {
        Self {
            bind_pool: system.as_bind_pool().is_some(),
            initialize: system.as_initialize().is_some(),
            execute: system.as_execute().is_some(),
            reactive: system.as_reactive().is_some(),
        }
    }

    /// Determine if the system takes part in no lifecycle stage at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
