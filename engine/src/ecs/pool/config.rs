/// Sizing hints for a [`Pool`](super::Pool).
///
/// Nothing here is a hard limit: every table grows past its initial capacity on demand. The
/// capacities only save reallocations when the expected population is known up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Number of entities the entity table is pre-sized for.
    pub entity_capacity: usize,
    /// Number of distinct groups the group cache is pre-sized for.
    pub group_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entity_capacity: 256,
            group_capacity: 16,
        }
    }
}

impl Config {
    #[inline]
    pub fn with_entity_capacity(mut self, capacity: usize) -> Self {
        self.entity_capacity = capacity;
        self
    }

    #[inline]
    pub fn with_group_capacity(mut self, capacity: usize) -> Self {
        self.group_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = Config::default().with_entity_capacity(10);

        assert_eq!(config.entity_capacity, 10);
        assert_eq!(config.group_capacity, Config::default().group_capacity);
        assert_eq!(config.with_group_capacity(2).group_capacity, 2);
    }
}
