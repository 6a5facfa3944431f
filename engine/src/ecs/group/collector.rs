use std::{cell::RefCell, collections::HashSet, rc::Rc};

use crate::ecs::{
    Matcher, Pool,
    entity::Entity,
    group::{self, ListenerId, Trigger},
};

/// Entities buffered in first-seen order, each at most once.
#[derive(Default)]
struct Buffer {
    order: Vec<Entity>,
    seen: HashSet<Entity>,
}

impl Buffer {
    fn push(&mut self, entity: Entity) {
        if self.seen.insert(entity) {
            self.order.push(entity);
        }
    }

    fn take(&mut self) -> Vec<Entity> {
        self.seen.clear();
        std::mem::take(&mut self.order)
    }

    /// Put `entities` back ahead of whatever arrived since they were taken.
    fn restore(&mut self, entities: Vec<Entity>) {
        let newer = std::mem::take(&mut self.order);
        self.seen.clear();
        for entity in entities.into_iter().chain(newer) {
            self.push(entity);
        }
    }
}

/// Buffers the entities a group reports for one [`Trigger`] until they are drained.
///
/// A collector is what drives reactive systems: it watches a group between executions and hands
/// the system only the entities that changed, deduplicated. While deactivated it is unsubscribed
/// from its group and holds nothing.
pub struct Collector {
    group: group::Id,
    trigger: Trigger,
    listener: Option<ListenerId>,
    buffer: Rc<RefCell<Buffer>>,
}

impl Collector {
    /// Watch the group for `matcher` in `pool`, creating it if needed. The collector starts active.
    pub fn new(pool: &mut Pool, matcher: Matcher, trigger: Trigger) -> Self {
        let group = pool.get_group(matcher);
        let mut collector = Self {
            group,
            trigger,
            listener: None,
            buffer: Rc::default(),
        };
        collector.activate(pool);
        collector
    }

    #[inline]
    pub fn group(&self) -> group::Id {
        self.group
    }

    #[inline]
    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.listener.is_some()
    }

    /// Subscribe to the group again. Does nothing if already active.
    pub fn activate(&mut self, pool: &mut Pool) {
        if self.listener.is_some() {
            return;
        }
        let buffer = Rc::clone(&self.buffer);
        let listener = pool
            .group_mut(self.group)
            .subscribe(self.trigger, move |event| buffer.borrow_mut().push(event.entity));
        self.listener = Some(listener);
        log::debug!("collector on group {} activated", self.group.index());
    }

    /// Unsubscribe from the group and drop everything buffered.
    pub fn deactivate(&mut self, pool: &mut Pool) {
        if let Some(listener) = self.listener.take() {
            pool.group_mut(self.group).unsubscribe(listener);
            log::debug!("collector on group {} deactivated", self.group.index());
        }
        self.clear();
    }

    /// Number of buffered entities.
    pub fn len(&self) -> usize {
        self.buffer.borrow().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.borrow().order.is_empty()
    }

    /// Take the buffered entities, in the order they were first reported.
    pub fn drain(&mut self) -> Vec<Entity> {
        self.buffer.borrow_mut().take()
    }

    pub fn clear(&mut self) {
        self.buffer.borrow_mut().take();
    }

    /// Hand back entities taken by [`drain`](Self::drain) that were not dealt with. They go ahead
    /// of anything collected since, and are dropped if the collector has been deactivated.
    pub(crate) fn restore(&mut self, entities: Vec<Entity>) {
        if self.is_active() {
            self.buffer.borrow_mut().restore(entities);
        }
    }
}
