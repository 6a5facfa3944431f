//! Live, incrementally maintained entity sets.
//!
//! A [`Group`] holds exactly the live entities of its pool that satisfy one [`Matcher`]. Groups are
//! created and cached by the [`Pool`](crate::ecs::Pool); the pool forwards every component change
//! to the groups whose matcher references the changed component, and each group re-evaluates only
//! the changed entity. There is never a full re-scan after a group has been built.
//!
//! Groups also publish [`Event`]s when entities enter, leave, or have a component replaced while
//! staying inside. Subscribe with [`Group::on_entity_added`] and friends, or use a [`Collector`] to
//! buffer affected entities for a later pass.
//!
//! ```rust,ignore
//! let moving = pool.get_group(Matcher::all_of(pool.spec::<(Position, Velocity)>()));
//! pool.group_mut(moving).on_entity_added(|event| log::info!("{} started moving", event.entity));
//!
//! for entity in pool.group(moving).entities().to_vec() {
//!     // ...
//! }
//! ```

mod collector;
mod event;
mod members;

use fixedbitset::FixedBitSet;

use crate::ecs::{Matcher, component, entity::Entity};

pub use collector::Collector;
pub use event::{Event, EventKind, ListenerId, Trigger};

use event::Listener;
use members::Members;

/// A group identifier, unique within the pool that created the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    #[inline]
    pub(crate) const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the index of this group in its pool's group storage.
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// The kind of component change a pool forwards to its groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Change {
    Added,
    Replaced,
    Removed,
}

/// The set of entities matching one [`Matcher`], kept current by the owning pool.
pub struct Group {
    id: Id,
    matcher: Matcher,
    members: Members,
    listeners: Vec<Listener>,
    next_listener: u32,
}

impl Group {
    pub(crate) fn new(id: Id, matcher: Matcher, capacity: usize) -> Self {
        Self {
            id,
            matcher,
            members: Members::with_capacity(capacity),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Number of member entities. O(1).
    #[inline]
    pub fn count(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.len() == 0
    }

    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.members.contains(entity)
    }

    /// The member entities. Order is unspecified but does not change until membership does.
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        self.members.as_slice()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.members.as_slice().iter().copied()
    }

    /// The only member, if the group has exactly one.
    pub fn single(&self) -> Option<Entity> {
        match self.members.as_slice() {
            [entity] => Some(*entity),
            _ => None,
        }
    }

    /// Call `callback` each time an entity enters the group.
    pub fn on_entity_added(&mut self, callback: impl FnMut(&Event) + 'static) -> ListenerId {
        self.subscribe(Trigger::Added, callback)
    }

    /// Call `callback` each time an entity leaves the group.
    pub fn on_entity_removed(&mut self, callback: impl FnMut(&Event) + 'static) -> ListenerId {
        self.subscribe(Trigger::Removed, callback)
    }

    /// Call `callback` each time a member has one of the matched components replaced.
    pub fn on_entity_updated(&mut self, callback: impl FnMut(&Event) + 'static) -> ListenerId {
        self.subscribe(Trigger::Updated, callback)
    }

    /// Call `callback` for every event that fires `trigger`.
    ///
    /// Callbacks run synchronously inside the pool operation that caused the event, so they cannot
    /// reach the pool themselves. Record what they need and act on it after the operation returns.
    pub fn subscribe(
        &mut self,
        trigger: Trigger,
        callback: impl FnMut(&Event) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(Listener {
            id,
            trigger,
            callback: Box::new(callback),
        });
        id
    }

    /// Drop a subscription. Returns `false` if `listener` was not subscribed to this group.
    pub fn unsubscribe(&mut self, listener: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != listener);
        self.listeners.len() != before
    }

    #[inline]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Add a matching entity while the group is being built. No events are published.
    pub(crate) fn seed(&mut self, entity: Entity) {
        self.members.insert(entity);
    }

    /// Re-evaluate `entity` after a change to `component`, given its new component `mask`.
    pub(crate) fn handle(
        &mut self,
        entity: Entity,
        component: component::Id,
        mask: &FixedBitSet,
        change: Change,
    ) {
        let matches = self.matcher.matches_mask(mask);
        let member = self.members.contains(entity);
        let kind = match (matches, member) {
            (true, false) => {
                self.members.insert(entity);
                EventKind::Added
            }
            (false, true) => {
                self.members.remove(entity);
                EventKind::Removed
            }
            (true, true) if change == Change::Replaced => EventKind::Updated,
            _ => return,
        };
        log::trace!("{:?} {entity} in group {} ({})", kind, self.id.0, self.matcher);
        self.emit(Event {
            kind,
            entity,
            component: Some(component),
        });
    }

    /// Admit a freshly created entity without components, if the matcher accepts one.
    pub(crate) fn admit_created(&mut self, entity: Entity) {
        if self.matcher.matches_mask(&FixedBitSet::new()) && self.members.insert(entity) {
            self.emit(Event {
                kind: EventKind::Added,
                entity,
                component: None,
            });
        }
    }

    /// Drop a destroyed entity that is still a member.
    pub(crate) fn evict_destroyed(&mut self, entity: Entity) {
        if self.members.remove(entity) {
            self.emit(Event {
                kind: EventKind::Removed,
                entity,
                component: None,
            });
        }
    }

    fn emit(&mut self, event: Event) {
        for listener in &mut self.listeners {
            if listener.trigger.fires_on(event.kind) {
                (listener.callback)(&event);
            }
        }
    }
}
