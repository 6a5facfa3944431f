//! Component identification for the ECS.
//!
//! Components are plain data attached to entities. Every distinct component type is assigned a
//! small, dense [`Id`] by a [`Registry`] the first time the type is seen. The id addresses the
//! entity's component slot table and is what [`Matcher`](crate::ecs::Matcher)s are built from.
//!
//! ## Architecture
//!
//! - [`Component`]: The marker trait every component type implements
//! - [`Id`]: The dense identifier of a registered component type
//! - [`Registry`]: Thread-safe, append-only mapping from Rust types to ids
//! - [`Spec`]: A sorted, de-duplicated set of component ids
//!
//! ## Usage
//!
//! ```ignore
//! use rusty_pool::ecs::component::Registry;
//! use rusty_pool::Component;
//!
//! #[derive(Component)]
//! struct Position { x: f32, y: f32 }
//!
//! let registry = Registry::new();
//! let pos_id = registry.register::<Position>();
//! assert_eq!(registry.register::<Position>(), pos_id);
//! ```

use std::fmt;

mod registry;
mod spec;

pub use registry::Registry;
pub use spec::{IntoSpec, Spec};

/// A component identifier. Ids are dense and zero-based, in registration order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Construct a new component Id from a raw u32 value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the index of this component if it were to live in indexable storage (e.g. Vec)
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Id {
    #[inline]
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<usize> for Id {
    #[inline]
    fn from(value: usize) -> Self {
        Self::new(value as u32)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A trait representing a component in the ECS.
///
/// At present this only sets the required trait bounds for a type to be stored in an entity's
/// slot table. Use `#[derive(Component)]` to implement it.
pub trait Component: 'static + Sized + Send + Sync {}
