//! The per-entity component slot table.

use std::any::Any;

use fixedbitset::FixedBitSet;

use crate::ecs::component::{Component, Id};

type Erased = Box<dyn Any + Send + Sync>;

/// Sparse table of component values indexed by component [`Id`], plus a bitset mirroring which
/// slots are occupied. Matchers are evaluated against the bitset alone.
///
/// Every slot holds at most one value, which is what enforces "one component of each type per
/// entity".
#[derive(Default)]
pub(crate) struct Slots {
    values: Vec<Option<Erased>>,
    mask: FixedBitSet,
    len: usize,
}

impl Slots {
    /// Create a slot table pre-sized for `capacity` component types.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut values = Vec::with_capacity(capacity);
        values.resize_with(capacity, || None);
        Self {
            values,
            mask: FixedBitSet::with_capacity(capacity),
            len: 0,
        }
    }

    /// Bitset of occupied component ids.
    #[inline]
    pub fn mask(&self) -> &FixedBitSet {
        &self.mask
    }

    #[inline]
    pub fn contains(&self, id: Id) -> bool {
        self.mask.contains(id.index())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Ids of the occupied slots, ascending.
    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.mask.ones().map(Id::from)
    }

    pub fn get<C: Component>(&self, id: Id) -> Option<&C> {
        self.values
            .get(id.index())?
            .as_ref()?
            .downcast_ref::<C>()
    }

    pub fn get_mut<C: Component>(&mut self, id: Id) -> Option<&mut C> {
        self.values
            .get_mut(id.index())?
            .as_mut()?
            .downcast_mut::<C>()
    }

    /// Store `value` in the empty slot `id`. The caller has checked the slot is empty.
    pub fn insert<C: Component>(&mut self, id: Id, value: C) {
        let index = id.index();
        if index >= self.values.len() {
            self.values.resize_with(index + 1, || None);
        }
        self.mask.grow(index + 1);

        debug_assert!(self.values[index].is_none(), "slot {id} is occupied");
        self.values[index] = Some(Box::new(value));
        self.mask.insert(index);
        self.len += 1;
    }

    /// Overwrite the value in slot `id` in place, reusing its allocation. Returns the value back if
    /// the slot is empty or holds another type.
    pub fn overwrite<C: Component>(&mut self, id: Id, value: C) -> Result<(), C> {
        match self.get_mut::<C>(id) {
            Some(current) => {
                *current = value;
                Ok(())
            }
            None => Err(value),
        }
    }

    /// Clear slot `id`, returning whether it was occupied.
    pub fn remove(&mut self, id: Id) -> bool {
        let Some(slot) = self.values.get_mut(id.index()) else {
            return false;
        };
        if slot.take().is_none() {
            return false;
        }
        self.mask.set(id.index(), false);
        self.len -= 1;
        true
    }
}
