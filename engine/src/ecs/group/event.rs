use crate::ecs::{component, entity::Entity};

/// What happened to an entity with respect to one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The entity started matching and entered the group.
    Added,
    /// The entity stopped matching (or was destroyed) and left the group.
    Removed,
    /// The entity stayed in the group while one of its components was replaced.
    Updated,
}

/// A group membership notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Event {
    pub kind: EventKind,
    pub entity: Entity,
    /// The component whose change caused the event, or `None` when the entity was created or
    /// destroyed.
    pub component: Option<component::Id>,
}

/// Which events a listener or collector reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Added,
    Removed,
    AddedOrRemoved,
    Updated,
}

impl Trigger {
    /// Determine if an event of `kind` fires this trigger.
    #[inline]
    pub fn fires_on(self, kind: EventKind) -> bool {
        matches!(
            (self, kind),
            (Trigger::Added, EventKind::Added)
                | (Trigger::Removed, EventKind::Removed)
                | (Trigger::AddedOrRemoved, EventKind::Added | EventKind::Removed)
                | (Trigger::Updated, EventKind::Updated)
        )
    }
}

/// Handle returned by a group subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u32);

/// A subscribed callback.
pub(crate) struct Listener {
    pub id: ListenerId,
    pub trigger: Trigger,
    pub callback: Box<dyn FnMut(&Event)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_table() {
        use EventKind::*;

        assert!(Trigger::Added.fires_on(Added));
        assert!(!Trigger::Added.fires_on(Removed));
        assert!(Trigger::Removed.fires_on(Removed));
        assert!(Trigger::AddedOrRemoved.fires_on(Added));
        assert!(Trigger::AddedOrRemoved.fires_on(Removed));
        assert!(!Trigger::AddedOrRemoved.fires_on(Updated));
        assert!(Trigger::Updated.fires_on(Updated));
        assert!(!Trigger::Updated.fires_on(Added));
    }
}
