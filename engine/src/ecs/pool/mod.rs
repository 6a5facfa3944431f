//! The pool owns every entity and every group of a runtime.
//!
//! All composition changes go through the pool. After an entity's slot table changes, the pool
//! forwards the change to the groups whose matcher references that component (and only those),
//! so every group is consistent again before the mutating call returns.
//!
//! # Example
//!
//! ```ignore
//! use rusty_pool::ecs::{Matcher, Pool};
//!
//! let mut pool = Pool::new();
//! let entity = pool.create_entity();
//! pool.entity_mut(entity)?
//!     .add(Position { x: 0.0, y: 0.0 })?
//!     .add(Velocity { dx: 1.0, dy: 0.0 })?;
//!
//! let moving = pool.get_group(Matcher::all_of(pool.spec::<(Position, Velocity)>()));
//! assert_eq!(pool.group(moving).count(), 1);
//!
//! pool.destroy_entity(entity)?;
//! assert!(pool.group(moving).is_empty());
//! ```
mod config;

use std::{any::type_name, collections::HashMap, sync::Arc};

use log::{debug, trace, warn};

pub use config::Config;

use crate::ecs::{
    Matcher,
    component::{self, Component, IntoSpec, Spec},
    entity::{self, Entity, Ref, RefMut, reference::missing, slots::Slots},
    error::{Error, Result},
    group::{self, Change, Group},
    system::System,
};

/// One row of the entity table. Rows are reused when their id is recycled, and so is the slot
/// table allocation.
#[derive(Default)]
struct Record {
    /// The live entity occupying this row, if any.
    entity: Option<Entity>,
    slots: Slots,
}

/// The root object of the runtime: entities, their components, and the memoized groups.
pub struct Pool {
    config: Config,

    /// Component ids, possibly shared with other pools.
    components: Arc<component::Registry>,

    allocator: entity::Allocator,

    /// Entity table indexed by entity id.
    records: Vec<Record>,

    /// Number of live entities.
    live: usize,

    /// Every group ever requested, indexed by `group::Id`.
    groups: Vec<Group>,

    /// Matcher to group memo. `Matcher` hashes on its precomputed value and compares its three id
    /// sets on collision.
    group_cache: HashMap<Matcher, group::Id>,

    /// For each component id, the groups whose matcher references it.
    groups_by_component: Vec<Vec<group::Id>>,

    /// Groups whose matcher accepts an entity without components.
    unconditional_groups: Vec<group::Id>,
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

impl Pool {
    /// Create a pool with default sizing and its own component registry.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_registry(config, Arc::new(component::Registry::new()))
    }

    /// Create a pool that takes its component ids from `components`. Pools sharing a registry
    /// agree on every component id.
    pub fn with_registry(config: Config, components: Arc<component::Registry>) -> Self {
        Self {
            config,
            components,
            allocator: entity::Allocator::with_capacity(config.entity_capacity),
            records: Vec::with_capacity(config.entity_capacity),
            live: 0,
            groups: Vec::with_capacity(config.group_capacity),
            group_cache: HashMap::with_capacity(config.group_capacity),
            groups_by_component: Vec::new(),
            unconditional_groups: Vec::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The component registry this pool takes its ids from.
    #[inline]
    pub fn components(&self) -> &Arc<component::Registry> {
        &self.components
    }

    /// Get the id of component type `C`, registering it on first use.
    #[inline]
    pub fn register<C: Component>(&self) -> component::Id {
        self.components.register::<C>()
    }

    /// Build the id set for a component type or tuple of types.
    #[inline]
    pub fn spec<IS: IntoSpec>(&self) -> Spec {
        self.components.spec::<IS>()
    }

    /// Create a new entity with no components.
    ///
    /// The entity immediately enters every group whose matcher accepts an empty entity.
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.allocator.alloc();
        let index = entity.index();
        if index == self.records.len() {
            self.records.push(Record::default());
        }
        self.records[index].entity = Some(entity);
        self.live += 1;
        debug!("created entity {entity}");

        for id in &self.unconditional_groups {
            self.groups[id.index()].admit_created(entity);
        }
        entity
    }

    /// Destroy a live entity.
    ///
    /// Its components are removed one at a time in ascending id order, each change updating the
    /// groups as a normal removal would. The entity then leaves any group it is still in, and its
    /// id is released for reuse under a new generation.
    ///
    /// Fails with [`Error::UnknownEntity`] if `entity` is not live in this pool.
    pub fn destroy_entity(&mut self, entity: Entity) -> Result<()> {
        if !self.has_entity(entity) {
            warn!("attempted to destroy {entity}, which is not live");
            return Err(Error::UnknownEntity(entity));
        }
        self.destroy_live(entity);
        Ok(())
    }

    /// Destroy every live entity, in ascending id order.
    pub fn destroy_all_entities(&mut self) {
        let entities: Vec<_> = self.entities().collect();
        for entity in entities {
            self.destroy_live(entity);
        }
    }

    fn destroy_live(&mut self, entity: Entity) {
        self.clear_components(entity);
        for id in &self.unconditional_groups {
            self.groups[id.index()].evict_destroyed(entity);
        }
        self.records[entity.index()].entity = None;
        self.allocator.free(entity);
        self.live -= 1;
        debug!("destroyed entity {entity}");
    }

    /// Determine if `entity` is live in this pool. Stale handles of a recycled id are not.
    #[inline]
    pub fn has_entity(&self, entity: Entity) -> bool {
        self.record(entity).is_ok()
    }

    /// Number of live entities.
    #[inline]
    pub fn entity_count(&self) -> usize {
        self.live
    }

    /// The live entities, in ascending id order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.records.iter().filter_map(|record| record.entity)
    }

    /// Number of destroyed entity ids waiting to be reused.
    #[inline]
    pub fn reusable_entity_count(&self) -> usize {
        self.allocator.reusable_count()
    }

    /// Borrow a read-only handle to a live entity.
    pub fn entity(&self, entity: Entity) -> Result<Ref<'_>> {
        let record = self.record(entity)?;
        Ok(Ref::new(entity, &record.slots, &self.components))
    }

    /// Borrow a mutable handle to a live entity, through which components are added, replaced and
    /// removed.
    pub fn entity_mut(&mut self, entity: Entity) -> Result<RefMut<'_>> {
        self.record(entity)?;
        Ok(RefMut::new(entity, self))
    }

    /// Get the group for `matcher`, creating it on first request.
    ///
    /// Logically equal matchers (same three id sets, whatever the construction order) always map
    /// to the same group. A new group is filled with a single scan of the live entities; from then
    /// on it is maintained incrementally.
    pub fn get_group(&mut self, matcher: Matcher) -> group::Id {
        if let Some(id) = self.group_cache.get(&matcher) {
            return *id;
        }

        let id = group::Id::new(self.groups.len() as u32);
        let mut group = Group::new(id, matcher.clone(), self.live);
        for record in &self.records {
            if let Some(entity) = record.entity
                && matcher.matches_mask(record.slots.mask())
            {
                group.seed(entity);
            }
        }

        for component in matcher.component_ids().ids() {
            let index = component.index();
            if index >= self.groups_by_component.len() {
                self.groups_by_component.resize_with(index + 1, Vec::new);
            }
            self.groups_by_component[index].push(id);
        }
        if matcher.is_unconditional() {
            self.unconditional_groups.push(id);
        }

        debug!(
            "created group {} for {matcher} with {} entities",
            id.index(),
            group.count()
        );
        self.groups.push(group);
        self.group_cache.insert(matcher, id);
        id
    }

    /// Get a group created by this pool.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not returned by [`get_group`](Self::get_group) on this pool.
    #[inline]
    pub fn group(&self, id: group::Id) -> &Group {
        &self.groups[id.index()]
    }

    /// Get a group created by this pool mutably, to manage its subscriptions.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not returned by [`get_group`](Self::get_group) on this pool.
    #[inline]
    pub fn group_mut(&mut self, id: group::Id) -> &mut Group {
        &mut self.groups[id.index()]
    }

    #[inline]
    pub fn try_group(&self, id: group::Id) -> Option<&Group> {
        self.groups.get(id.index())
    }

    /// Number of groups created so far.
    #[inline]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Construct a system bound to this pool. If the system is pool-bindable, its
    /// [`bind_pool`](crate::ecs::BindPool::bind_pool) hook runs before it is returned.
    pub fn create_system<S: System>(&mut self, mut system: S) -> Result<S> {
        if let Some(bindable) = system.as_bind_pool() {
            bindable.bind_pool(self)?;
        }
        Ok(system)
    }

    pub(crate) fn component_mut<C: Component>(&mut self, entity: Entity) -> Result<&mut C> {
        let id = self.components.get::<C>();
        let record = self.record_mut(entity)?;
        id.and_then(|id| record.slots.get_mut::<C>(id))
            .ok_or_else(|| missing::<C>(entity))
    }

    pub(crate) fn add_component<C: Component>(&mut self, entity: Entity, value: C) -> Result<()> {
        self.record(entity)?;
        let id = self.components.register::<C>();
        let slots = &mut self.records[entity.index()].slots;
        if slots.contains(id) {
            return Err(Error::DuplicateComponent {
                entity,
                component: type_name::<C>(),
            });
        }
        slots.insert(id, value);
        trace!("added `{}` to {entity}", type_name::<C>());
        self.route(entity, id, Change::Added);
        Ok(())
    }

    pub(crate) fn replace_component<C: Component>(
        &mut self,
        entity: Entity,
        value: C,
    ) -> Result<()> {
        self.record(entity)?;
        let id = self.components.register::<C>();
        let slots = &mut self.records[entity.index()].slots;
        let change = match slots.overwrite(id, value) {
            Ok(()) => Change::Replaced,
            Err(value) => {
                slots.insert(id, value);
                Change::Added
            }
        };
        trace!("replaced `{}` on {entity} ({change:?})", type_name::<C>());
        self.route(entity, id, change);
        Ok(())
    }

    pub(crate) fn remove_component<C: Component>(&mut self, entity: Entity) -> Result<()> {
        self.record(entity)?;
        let Some(id) = self.components.get::<C>() else {
            return Err(missing::<C>(entity));
        };
        if !self.records[entity.index()].slots.remove(id) {
            return Err(missing::<C>(entity));
        }
        trace!("removed `{}` from {entity}", type_name::<C>());
        self.route(entity, id, Change::Removed);
        Ok(())
    }

    pub(crate) fn remove_all_components(&mut self, entity: Entity) -> Result<()> {
        self.record(entity)?;
        self.clear_components(entity);
        Ok(())
    }

    fn clear_components(&mut self, entity: Entity) {
        let ids: Vec<_> = self.records[entity.index()].slots.ids().collect();
        for id in ids {
            self.records[entity.index()].slots.remove(id);
            trace!(
                "removed `{}` from {entity}",
                self.components.name(id).unwrap_or("<unknown>")
            );
            self.route(entity, id, Change::Removed);
        }
    }

    /// Forward a change of `component` on `entity` to the groups that reference it.
    fn route(&mut self, entity: Entity, component: component::Id, change: Change) {
        let Some(interested) = self.groups_by_component.get(component.index()) else {
            return;
        };
        let mask = self.records[entity.index()].slots.mask();
        for id in interested {
            self.groups[id.index()].handle(entity, component, mask, change);
        }
    }

    fn record(&self, entity: Entity) -> Result<&Record> {
        self.records
            .get(entity.index())
            .filter(|record| record.entity == Some(entity))
            .ok_or(Error::UnknownEntity(entity))
    }

    fn record_mut(&mut self, entity: Entity) -> Result<&mut Record> {
        self.records
            .get_mut(entity.index())
            .filter(|record| record.entity == Some(entity))
            .ok_or(Error::UnknownEntity(entity))
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        collections::{BTreeSet, HashSet},
        rc::Rc,
        sync::Arc,
    };

    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::ecs::group::{EventKind, Trigger};

    #[derive(crate::Component, Debug, Clone, Copy, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(crate::Component, Debug, Clone, Copy, PartialEq)]
    struct Velocity {
        dx: f32,
        dy: f32,
    }

    #[derive(crate::Component, Debug, Clone, Copy, PartialEq)]
    struct Frozen;

    #[derive(crate::Component, Debug, Clone, Copy, PartialEq)]
    struct Tag(u8);

    fn position() -> Position {
        Position { x: 0.0, y: 0.0 }
    }

    fn velocity() -> Velocity {
        Velocity { dx: 1.0, dy: 0.0 }
    }

    fn record_events(pool: &mut Pool, group: group::Id) -> Rc<RefCell<Vec<group::Event>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let group = pool.group_mut(group);
        group.subscribe(Trigger::AddedOrRemoved, {
            let sink = Rc::clone(&sink);
            move |event| sink.borrow_mut().push(*event)
        });
        group.on_entity_updated(move |event| sink.borrow_mut().push(*event));
        events
    }

    #[test]
    fn positions_and_velocities_end_to_end() {
        // Given
        let mut pool = Pool::new();
        let e1 = pool.create_entity();
        pool.entity_mut(e1).unwrap().add(position()).unwrap();
        let e2 = pool.create_entity();
        pool.entity_mut(e2)
            .unwrap()
            .add(position())
            .unwrap()
            .add(velocity())
            .unwrap();

        // When
        let positioned = pool.get_group(Matcher::all_of(pool.spec::<Position>()));
        let moving = pool.get_group(Matcher::all_of(pool.spec::<(Position, Velocity)>()));

        // Then
        assert_eq!(pool.group(positioned).count(), 2);
        assert_eq!(pool.group(moving).count(), 1);
        assert_eq!(pool.group(moving).single(), Some(e2));

        // When
        pool.destroy_entity(e2).unwrap();

        // Then
        assert_eq!(pool.group(positioned).count(), 1);
        assert_eq!(pool.group(positioned).single(), Some(e1));
        assert_eq!(pool.group(moving).count(), 0);
        assert_eq!(pool.entity_count(), 1);
    }

    #[test]
    fn equal_matchers_share_one_group() {
        // Given
        let mut pool = Pool::new();
        let position = pool.register::<Position>();
        let velocity = pool.register::<Velocity>();

        // When
        let a = pool.get_group(Matcher::all_of([position, velocity]));
        let b = pool.get_group(Matcher::all_of([velocity, position]));
        let c = pool.get_group(Matcher::any_of([position, velocity]));

        // Then
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(pool.group_count(), 2);
        assert!(std::ptr::eq(pool.group(a), pool.group(b)));
    }

    #[test]
    fn group_built_late_sees_existing_entities() {
        // Given
        let mut pool = Pool::new();
        let entities: Vec<_> = (0..5).map(|_| pool.create_entity()).collect();
        for entity in &entities[1..4] {
            pool.entity_mut(*entity).unwrap().add(Tag(1)).unwrap();
        }

        // When
        let tagged = pool.get_group(Matcher::all_of(pool.spec::<Tag>()));

        // Then
        let members: BTreeSet<_> = pool.group(tagged).iter().collect();
        assert_eq!(members, entities[1..4].iter().copied().collect::<BTreeSet<_>>());
    }

    #[test]
    fn exactly_one_notification_per_transition() {
        // Given
        let mut pool = Pool::new();
        let moving = pool.get_group(Matcher::all_of(pool.spec::<(Position, Velocity)>()));
        let events = record_events(&mut pool, moving);
        let entity = pool.create_entity();

        // When - Only the second add completes the match
        pool.entity_mut(entity).unwrap().add(position()).unwrap();
        pool.entity_mut(entity).unwrap().add(velocity()).unwrap();

        // Then
        assert_eq!(events.borrow().len(), 1);
        assert_eq!(events.borrow()[0].kind, EventKind::Added);

        // When - A replace keeps the entity in place
        pool.entity_mut(entity)
            .unwrap()
            .replace(Velocity { dx: 2.0, dy: 2.0 })
            .unwrap();

        // Then
        assert_eq!(events.borrow().len(), 2);
        assert_eq!(events.borrow()[1].kind, EventKind::Updated);
        assert!(pool.group(moving).contains(entity));

        // When
        pool.entity_mut(entity).unwrap().remove::<Position>().unwrap();
        pool.entity_mut(entity).unwrap().remove::<Velocity>().unwrap();

        // Then
        let kinds: Vec<_> = events.borrow().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EventKind::Added, EventKind::Updated, EventKind::Removed]
        );
        assert_eq!(
            events.borrow()[2].component,
            Some(pool.register::<Position>())
        );
    }

    #[test]
    fn changes_to_one_entity_leave_others_silent() {
        // Given - One entity already in the group and one that never matches
        let mut pool = Pool::new();
        let positioned = pool.get_group(Matcher::all_of(pool.spec::<Position>()));
        let member = pool.create_entity();
        pool.entity_mut(member).unwrap().add(position()).unwrap();
        let outsider = pool.create_entity();
        pool.entity_mut(outsider).unwrap().add(velocity()).unwrap();
        let entity = pool.create_entity();
        let events = record_events(&mut pool, positioned);

        // When
        pool.entity_mut(entity).unwrap().add(position()).unwrap();
        pool.entity_mut(entity)
            .unwrap()
            .replace(Position { x: 1.0, y: 1.0 })
            .unwrap();
        pool.entity_mut(entity).unwrap().add(velocity()).unwrap();
        pool.entity_mut(entity).unwrap().remove::<Position>().unwrap();

        // Then
        let seen: Vec<_> = events.borrow().iter().map(|e| (e.kind, e.entity)).collect();
        assert_eq!(
            seen,
            vec![
                (EventKind::Added, entity),
                (EventKind::Updated, entity),
                (EventKind::Removed, entity),
            ]
        );
        assert_eq!(pool.group(positioned).entities(), [member]);
        assert!(!pool.group(positioned).contains(outsider));
    }

    #[test]
    fn none_of_exits_and_reenters() {
        // Given
        let mut pool = Pool::new();
        let thawed = pool.get_group(
            Matcher::all_of(pool.spec::<Position>()).and_none_of(pool.spec::<Frozen>()),
        );
        let entity = pool.create_entity();
        pool.entity_mut(entity).unwrap().add(position()).unwrap();
        assert!(pool.group(thawed).contains(entity));

        // When
        pool.entity_mut(entity).unwrap().add(Frozen).unwrap();

        // Then
        assert!(!pool.group(thawed).contains(entity));

        // When
        pool.entity_mut(entity).unwrap().remove::<Frozen>().unwrap();

        // Then
        assert!(pool.group(thawed).contains(entity));
    }

    #[test]
    fn unconditional_groups_follow_entity_lifetime() {
        // Given
        let mut pool = Pool::new();
        let everything = pool.get_group(Matcher::none_of(component::Spec::EMPTY));
        let unfrozen = pool.get_group(Matcher::none_of(pool.spec::<Frozen>()));

        // When
        let entity = pool.create_entity();

        // Then
        assert!(pool.group(everything).contains(entity));
        assert!(pool.group(unfrozen).contains(entity));

        // When
        pool.entity_mut(entity).unwrap().add(Frozen).unwrap();

        // Then
        assert!(pool.group(everything).contains(entity));
        assert!(!pool.group(unfrozen).contains(entity));

        // When
        pool.destroy_entity(entity).unwrap();

        // Then
        assert!(pool.group(everything).is_empty());
        assert!(pool.group(unfrozen).is_empty());
    }

    #[test]
    fn destroyed_entity_is_unknown() {
        // Given
        let mut pool = Pool::new();
        let entity = pool.create_entity();
        pool.entity_mut(entity).unwrap().add(position()).unwrap();
        pool.destroy_entity(entity).unwrap();

        // Then
        assert_eq!(pool.destroy_entity(entity), Err(Error::UnknownEntity(entity)));
        assert!(matches!(pool.entity(entity), Err(Error::UnknownEntity(_))));
        assert!(matches!(pool.entity_mut(entity), Err(Error::UnknownEntity(_))));
        assert!(!pool.has_entity(entity));
        assert_eq!(pool.reusable_entity_count(), 1);
    }

    #[test]
    fn recycled_id_does_not_revive_stale_handle() {
        // Given
        let mut pool = Pool::new();
        let stale = pool.create_entity();
        pool.destroy_entity(stale).unwrap();

        // When
        let fresh = pool.create_entity();

        // Then - Same slot, new generation, no leftover components
        assert_eq!(fresh.id(), stale.id());
        assert_ne!(fresh, stale);
        assert!(pool.has_entity(fresh));
        assert!(!pool.has_entity(stale));
        assert!(pool.entity(fresh).unwrap().is_empty());
        assert_eq!(
            pool.entity_mut(stale).map(|_| ()),
            Err(Error::UnknownEntity(stale))
        );
    }

    #[test]
    fn failed_add_changes_nothing() {
        // Given
        let mut pool = Pool::new();
        let positioned = pool.get_group(Matcher::all_of(pool.spec::<Position>()));
        let events = record_events(&mut pool, positioned);
        let entity = pool.create_entity();
        pool.entity_mut(entity).unwrap().add(position()).unwrap();

        // When
        let result = pool
            .entity_mut(entity)
            .unwrap()
            .add(Position { x: 5.0, y: 5.0 })
            .map(|_| ());

        // Then
        assert!(matches!(result, Err(Error::DuplicateComponent { .. })));
        assert_eq!(events.borrow().len(), 1);
        assert_eq!(
            pool.entity(entity).unwrap().get::<Position>().unwrap(),
            &position()
        );
    }

    #[test]
    fn destroy_all_empties_every_group() {
        // Given
        let mut pool = Pool::new();
        let positioned = pool.get_group(Matcher::all_of(pool.spec::<Position>()));
        for _ in 0..10 {
            let entity = pool.create_entity();
            pool.entity_mut(entity).unwrap().add(position()).unwrap();
        }

        // When
        pool.destroy_all_entities();

        // Then
        assert_eq!(pool.entity_count(), 0);
        assert_eq!(pool.entities().count(), 0);
        assert!(pool.group(positioned).is_empty());
        assert_eq!(pool.reusable_entity_count(), 10);
    }

    #[test]
    fn pools_can_share_a_registry() {
        // Given
        let registry = Arc::new(component::Registry::new());
        let velocity = registry.register::<Velocity>();

        // When
        let a = Pool::with_registry(Config::default(), Arc::clone(&registry));
        let b = Pool::with_registry(Config::default().with_entity_capacity(4), registry);

        // Then
        assert_eq!(a.register::<Velocity>(), velocity);
        assert_eq!(a.register::<Position>(), b.register::<Position>());
        assert_eq!(b.config().entity_capacity, 4);
    }

    #[test]
    fn listener_sees_event_once_mutation_is_done() {
        // Given
        let mut pool = Pool::new();
        let moving = pool.get_group(Matcher::all_of(pool.spec::<(Position, Velocity)>()));
        let seen = Rc::new(RefCell::new(HashSet::new()));
        let sink = Rc::clone(&seen);
        pool.group_mut(moving)
            .on_entity_added(move |event| {
                sink.borrow_mut().insert(event.entity);
            });

        // When
        let entity = pool.create_entity();
        pool.entity_mut(entity)
            .unwrap()
            .add(velocity())
            .unwrap()
            .add(position())
            .unwrap();

        // Then
        assert!(seen.borrow().contains(&entity));
        assert_eq!(pool.group(moving).entities(), &[entity]);
    }

    /// Apply one random composition change to `entity`, ignoring expected refusals.
    fn mutate(pool: &mut Pool, entity: Entity, rng: &mut ChaCha8Rng) {
        let mut handle = pool.entity_mut(entity).unwrap();
        let op = rng.gen_range(0..3);
        let result = match (rng.gen_range(0..4), op) {
            (0, 0) => handle.add(position()).map(|_| ()),
            (0, 1) => handle.replace(Position { x: 1.0, y: 1.0 }).map(|_| ()),
            (0, _) => handle.remove::<Position>().map(|_| ()),
            (1, 0) => handle.add(velocity()).map(|_| ()),
            (1, 1) => handle.replace(velocity()).map(|_| ()),
            (1, _) => handle.remove::<Velocity>().map(|_| ()),
            (2, 0) => handle.add(Frozen).map(|_| ()),
            (2, 1) => handle.replace(Frozen).map(|_| ()),
            (2, _) => handle.remove::<Frozen>().map(|_| ()),
            (_, 0) => handle.add(Tag(rng.r#gen())).map(|_| ()),
            (_, 1) => handle.replace(Tag(rng.r#gen())).map(|_| ()),
            (_, _) => handle.remove::<Tag>().map(|_| ()),
        };
        match result {
            Ok(()) | Err(Error::DuplicateComponent { .. } | Error::MissingComponent { .. }) => {}
            Err(other) => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn groups_agree_with_brute_force_scan() {
        // Given
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
        let mut pool = Pool::with_config(Config::default().with_entity_capacity(8));
        let [p, v, f, t] = [
            pool.register::<Position>(),
            pool.register::<Velocity>(),
            pool.register::<Frozen>(),
            pool.register::<Tag>(),
        ];
        let matchers = [
            Matcher::all_of(p),
            Matcher::all_of([p, v]),
            Matcher::all_of([p, v]).and_none_of(f),
            Matcher::any_of([v, t]),
            Matcher::any_of([f, t]).and_all_of(p),
            Matcher::none_of(f),
            Matcher::none_of(Spec::EMPTY),
            Matcher::all_of(t).and_any_of([p, v]).and_none_of(f),
        ];
        let groups: Vec<_> = matchers
            .iter()
            .take(4)
            .map(|m| pool.get_group(m.clone()))
            .collect();
        let mut live: Vec<Entity> = Vec::new();

        for step in 0..3_000 {
            // When
            match rng.gen_range(0..10) {
                0 | 1 => live.push(pool.create_entity()),
                2 if !live.is_empty() => {
                    let entity = live.swap_remove(rng.gen_range(0..live.len()));
                    pool.destroy_entity(entity).unwrap();
                }
                _ if !live.is_empty() => {
                    let entity = live[rng.gen_range(0..live.len())];
                    mutate(&mut pool, entity, &mut rng);
                }
                _ => {}
            }

            // Late groups are built from a scan and maintained afterwards
            if step == 1_000 {
                for matcher in &matchers[4..] {
                    pool.get_group(matcher.clone());
                }
            }

            // Then
            assert_eq!(pool.entity_count(), live.len());
            for index in 0..pool.group_count() {
                let group = pool.group(group::Id::new(index as u32));
                let expected: BTreeSet<_> = pool
                    .entities()
                    .filter(|e| pool.entity(*e).unwrap().matches(group.matcher()))
                    .collect();
                let actual: BTreeSet<_> = group.iter().collect();
                assert_eq!(actual.len(), group.count(), "duplicate member at step {step}");
                assert_eq!(actual, expected, "group {} at step {step}", group.matcher());
            }
        }
        assert_eq!(groups.len(), 4);
    }
}
