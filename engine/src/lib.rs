//! An entity-component-system runtime built around a pool of entities and cached, incrementally
//! maintained groups.
//!
//! The central object is the [`Pool`](ecs::Pool): it owns every entity and its component slots,
//! and it memoizes one [`Group`](ecs::Group) per distinct [`Matcher`](ecs::Matcher). Every
//! component mutation is routed synchronously to the groups that reference the changed component
//! type, so group membership is always exact when a mutating call returns.
//!
//! Per-tick logic lives in systems held by a [`SystemContainer`](ecs::SystemContainer), which
//! sequences one-time initialization and repeated execution in registration order.
//!
//! ```rust,ignore
//! use rusty_pool::ecs::{Matcher, Pool};
//! use rusty_pool::Component;
//!
//! #[derive(Component)]
//! struct Position { x: f32, y: f32 }
//!
//! let mut pool = Pool::new();
//! let entity = pool.create_entity();
//! pool.entity_mut(entity)?.add(Position { x: 0.0, y: 0.0 })?;
//!
//! let positioned = pool.get_group(Matcher::all_of(pool.spec::<Position>()));
//! assert_eq!(pool.group(positioned).count(), 1);
//! ```

// Lets the derive macros refer to `::rusty_pool` from inside this crate as well.
extern crate self as rusty_pool;

pub mod ecs;

pub use rusty_pool_macros::{Component, System};
