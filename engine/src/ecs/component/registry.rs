use std::{
    any::{TypeId, type_name},
    sync::{
        PoisonError, RwLock,
        atomic::{AtomicU32, Ordering},
    },
};

use dashmap::DashMap;

use crate::ecs::component::{Component, Id, IntoSpec, Spec};

/// A thread-safe component registry. This is responsible for assigning each component type a
/// stable, dense identifier for the lifetime of the registry.
///
/// Lookups of already registered types are lock-free reads via `DashMap`. Registration of a new
/// type takes a single shard of the map plus a write lock on the name table, so two threads racing
/// to register the same new type still agree on one id.
///
/// Why thread-safe?
/// - Pools are single threaded, but several pools (possibly built on different threads) can share
///   one registry, and all of them must agree on component ids.
pub struct Registry {
    /// Map from TypeId to component Id. Lock-free reads via sharded concurrent hashmap.
    type_map: DashMap<TypeId, Id>,

    /// Type names indexed by component id, for diagnostics. Append-only.
    names: RwLock<Vec<&'static str>>,

    /// Next available component identifier.
    next_id: AtomicU32,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create a new, empty component registry.
    #[inline]
    pub fn new() -> Self {
        Self {
            type_map: DashMap::new(),
            names: RwLock::new(Vec::new()),
            next_id: AtomicU32::new(0),
        }
    }

    /// Get the identifier for component type `C`, registering it on first use.
    ///
    /// Calling this repeatedly for the same type always yields the same id; a previously unseen
    /// type receives the next sequential id.
    pub fn register<C: Component>(&self) -> Id {
        let type_id = TypeId::of::<C>();

        // Fast path: check if already registered (lock-free read)
        if let Some(id) = self.type_map.get(&type_id) {
            return *id;
        }

        // Slow path: the entry API keeps two racing threads from both allocating an id.
        *self
            .type_map
            .entry(type_id)
            .or_insert_with(|| {
                let id_value = self.next_id.fetch_add(1, Ordering::AcqRel);

                let mut names = self.names.write().unwrap_or_else(PoisonError::into_inner);
                let index = id_value as usize;
                if index >= names.len() {
                    names.resize(index + 1, "<unregistered>");
                }
                names[index] = type_name::<C>();

                log::trace!("registered component `{}` as {}", type_name::<C>(), id_value);
                Id(id_value)
            })
            .value()
    }

    /// Get the component ID for a provided type `C`, if registered.
    #[inline]
    pub fn get<C: Component>(&self) -> Option<Id> {
        self.type_map
            .get(&TypeId::of::<C>())
            .map(|entry| *entry.value())
    }

    /// The number of distinct component types registered so far.
    #[inline]
    pub fn count(&self) -> usize {
        self.next_id.load(Ordering::Acquire) as usize
    }

    /// The Rust type name registered under `id`, if any.
    pub fn name(&self, id: Id) -> Option<&'static str> {
        let names = self.names.read().unwrap_or_else(PoisonError::into_inner);
        names.get(id.index()).copied()
    }

    /// Get a component specification for a generic type `IS` which implements [`IntoSpec`].
    #[inline]
    pub fn spec<IS: IntoSpec>(&self) -> Spec {
        IS::into_spec(self)
    }
}
