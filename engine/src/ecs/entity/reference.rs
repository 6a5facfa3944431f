use std::any::type_name;

use crate::ecs::{
    Matcher, Pool,
    component::{self, Component},
    entity::{Entity, slots::Slots},
    error::{Error, Result},
};

/// A reference to a live entity with read-only access to its components.
///
/// The lifetime `'p` ties the reference to the [`Pool`] that owns the entity, so the pool cannot be
/// mutated while the reference exists.
pub struct Ref<'p> {
    /// The entity this reference points to.
    entity: Entity,
    /// The entity's component slots.
    slots: &'p Slots,
    /// The registry of known components.
    components: &'p component::Registry,
}

impl<'p> Ref<'p> {
    #[inline]
    pub(crate) const fn new(
        entity: Entity,
        slots: &'p Slots,
        components: &'p component::Registry,
    ) -> Self {
        Self {
            entity,
            slots,
            components,
        }
    }

    /// Get the entity this reference points to.
    #[inline]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Determine if a `C` component is attached.
    pub fn has<C: Component>(&self) -> bool {
        self.components
            .get::<C>()
            .is_some_and(|id| self.slots.contains(id))
    }

    /// Determine if a component with the given id is attached.
    #[inline]
    pub fn has_id(&self, id: component::Id) -> bool {
        self.slots.contains(id)
    }

    /// Get the attached `C` component.
    ///
    /// Fails with [`Error::MissingComponent`] if the entity has no `C`.
    pub fn get<C: Component>(&self) -> Result<&'p C> {
        self.components
            .get::<C>()
            .and_then(|id| self.slots.get::<C>(id))
            .ok_or_else(|| missing::<C>(self.entity))
    }

    /// Ids of all attached components, ascending.
    pub fn component_ids(&self) -> impl Iterator<Item = component::Id> + 'p {
        self.slots.ids()
    }

    /// Number of attached components.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.len() == 0
    }

    /// Evaluate `matcher` against the entity's current components.
    #[inline]
    pub fn matches(&self, matcher: &Matcher) -> bool {
        matcher.matches_mask(self.slots.mask())
    }
}

/// A mutable reference to a live entity.
///
/// Every composition change made through this handle (`add`, `replace`, `remove`, `remove_all`) is
/// routed through the owning [`Pool`], which updates every affected group before the call returns.
/// Mutating a component's fields with [`get_mut`](Self::get_mut) does not notify anyone.
pub struct RefMut<'p> {
    /// The entity this reference points to.
    entity: Entity,
    /// The pool that owns the entity.
    pool: &'p mut Pool,
}

impl<'p> RefMut<'p> {
    #[inline]
    pub(crate) fn new(entity: Entity, pool: &'p mut Pool) -> Self {
        Self { entity, pool }
    }

    /// Get the entity this reference points to.
    #[inline]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Borrow a read-only view of the entity.
    #[inline]
    pub fn view(&self) -> Result<Ref<'_>> {
        self.pool.entity(self.entity)
    }

    /// Determine if a `C` component is attached.
    pub fn has<C: Component>(&self) -> bool {
        self.view().is_ok_and(|entity| entity.has::<C>())
    }

    /// Get the attached `C` component.
    pub fn get<C: Component>(&self) -> Result<&C> {
        self.pool.entity(self.entity)?.get::<C>()
    }

    /// Get the attached `C` component mutably. Field changes are not reported to groups; use
    /// [`replace`](Self::replace) when listeners should observe the new value.
    pub fn get_mut<C: Component>(&mut self) -> Result<&mut C> {
        self.pool.component_mut::<C>(self.entity)
    }

    /// Attach a `C` component.
    ///
    /// Fails with [`Error::DuplicateComponent`] if one is already attached.
    pub fn add<C: Component>(&mut self, component: C) -> Result<&mut Self> {
        self.pool.add_component(self.entity, component)?;
        Ok(self)
    }

    /// Attach a `C` component, or overwrite the attached one in place.
    pub fn replace<C: Component>(&mut self, component: C) -> Result<&mut Self> {
        self.pool.replace_component(self.entity, component)?;
        Ok(self)
    }

    /// Detach the `C` component.
    ///
    /// Fails with [`Error::MissingComponent`] if none is attached.
    pub fn remove<C: Component>(&mut self) -> Result<&mut Self> {
        self.pool.remove_component::<C>(self.entity)?;
        Ok(self)
    }

    /// Detach every component, in ascending id order.
    pub fn remove_all(&mut self) -> Result<&mut Self> {
        self.pool.remove_all_components(self.entity)?;
        Ok(self)
    }

    /// Evaluate `matcher` against the entity's current components.
    pub fn matches(&self, matcher: &Matcher) -> bool {
        self.view().is_ok_and(|entity| entity.matches(matcher))
    }
}

/// Build a [`Error::MissingComponent`] for component type `C`.
pub(crate) fn missing<C: Component>(entity: Entity) -> Error {
    Error::MissingComponent {
        entity,
        component: type_name::<C>(),
    }
}
