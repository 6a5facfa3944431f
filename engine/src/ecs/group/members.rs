use crate::ecs::entity::Entity;

/// Sparse set of entities: a dense vector for iteration plus a sparse index from entity id to
/// dense position. Insert, remove and lookup are O(1); iteration touches only members.
///
/// Removal swaps the last member into the hole, so iteration order is stable only until the next
/// membership change.
#[derive(Debug, Default)]
pub(crate) struct Members {
    dense: Vec<Entity>,
    sparse: Vec<Option<usize>>,
}

impl Members {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            dense: Vec::with_capacity(capacity),
            sparse: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Entity] {
        &self.dense
    }

    /// Determine if this exact entity (id and generation) is a member.
    pub fn contains(&self, entity: Entity) -> bool {
        self.position(entity).is_some()
    }

    fn position(&self, entity: Entity) -> Option<usize> {
        let row = (*self.sparse.get(entity.index())?)?;
        (self.dense[row] == entity).then_some(row)
    }

    /// Insert `entity`, returning `false` if it was already a member.
    pub fn insert(&mut self, entity: Entity) -> bool {
        if self.contains(entity) {
            return false;
        }
        let index = entity.index();
        if index >= self.sparse.len() {
            self.sparse.resize(index + 1, None);
        }
        self.sparse[index] = Some(self.dense.len());
        self.dense.push(entity);
        true
    }

    /// Remove `entity`, returning `false` if it was not a member.
    pub fn remove(&mut self, entity: Entity) -> bool {
        let Some(row) = self.position(entity) else {
            return false;
        };
        self.dense.swap_remove(row);
        self.sparse[entity.index()] = None;
        if let Some(moved) = self.dense.get(row) {
            self.sparse[moved.index()] = Some(row);
        }
        true
    }
}
