//! Immutable predicates over the set of components attached to an entity.
//!
//! A [`Matcher`] combines three component sets:
//!
//! - **all-of**: every listed component must be attached
//! - **any-of**: at least one listed component must be attached (ignored when empty)
//! - **none-of**: no listed component may be attached
//!
//! Sets are normalized (sorted and de-duplicated) on construction and the hash is computed once
//! from the normalized sets, so `all_of([a, b])` and `all_of([b, a])` are the same cache key. The
//! [`Pool`](crate::ecs::Pool) relies on this to hand out exactly one group per logical query.
//!
//! ```rust,ignore
//! let renderable = Matcher::all_of(pool.spec::<(Position, Sprite)>())
//!     .and_none_of(pool.spec::<Hidden>());
//! ```

use std::{
    fmt,
    hash::{DefaultHasher, Hash, Hasher},
};

use fixedbitset::FixedBitSet;

use crate::ecs::component::{self, Spec};

/// An immutable, hashable predicate over component composition.
#[derive(Debug, Clone)]
pub struct Matcher {
    all: Spec,
    any: Spec,
    none: Spec,
    /// Precomputed from the three normalized sets.
    hash: u64,
}

impl Matcher {
    /// Matches entities that have every component in `ids`.
    pub fn all_of(ids: impl Into<Spec>) -> Self {
        Self::from_parts(ids.into(), Spec::EMPTY, Spec::EMPTY)
    }

    /// Matches entities that have at least one component in `ids`.
    pub fn any_of(ids: impl Into<Spec>) -> Self {
        Self::from_parts(Spec::EMPTY, ids.into(), Spec::EMPTY)
    }

    /// Matches entities that have none of the components in `ids`.
    pub fn none_of(ids: impl Into<Spec>) -> Self {
        Self::from_parts(Spec::EMPTY, Spec::EMPTY, ids.into())
    }

    /// Extend the all-of set with `ids`.
    pub fn and_all_of(self, ids: impl Into<Spec>) -> Self {
        Self::from_parts(self.all.union(&ids.into()), self.any, self.none)
    }

    /// Extend the any-of set with `ids`.
    pub fn and_any_of(self, ids: impl Into<Spec>) -> Self {
        Self::from_parts(self.all, self.any.union(&ids.into()), self.none)
    }

    /// Extend the none-of set with `ids`.
    pub fn and_none_of(self, ids: impl Into<Spec>) -> Self {
        Self::from_parts(self.all, self.any, self.none.union(&ids.into()))
    }

    fn from_parts(all: Spec, any: Spec, none: Spec) -> Self {
        let mut hasher = DefaultHasher::new();
        // Length prefixes keep ([a], [b], []) apart from ([a, b], [], []).
        for spec in [&all, &any, &none] {
            spec.len().hash(&mut hasher);
            spec.ids().hash(&mut hasher);
        }
        let hash = hasher.finish();
        Self {
            all,
            any,
            none,
            hash,
        }
    }

    #[inline]
    pub fn all(&self) -> &Spec {
        &self.all
    }

    #[inline]
    pub fn any(&self) -> &Spec {
        &self.any
    }

    #[inline]
    pub fn none(&self) -> &Spec {
        &self.none
    }

    /// The precomputed hash of this matcher.
    #[inline]
    pub fn hash_value(&self) -> u64 {
        self.hash
    }

    /// Every component id this matcher references, in any of its sets.
    pub fn component_ids(&self) -> Spec {
        self.all.union(&self.any).union(&self.none)
    }

    /// True when an entity without any components satisfies this matcher, i.e. both the all-of and
    /// any-of sets are empty.
    #[inline]
    pub fn is_unconditional(&self) -> bool {
        self.all.is_empty() && self.any.is_empty()
    }

    /// Evaluate the matcher against a bitset of attached component ids.
    pub fn matches_mask(&self, mask: &FixedBitSet) -> bool {
        let has = |id: &component::Id| mask.contains(id.index());
        self.all.ids().iter().all(has)
            && (self.any.is_empty() || self.any.ids().iter().any(has))
            && !self.none.ids().iter().any(has)
    }
}

impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.all == other.all
            && self.any == other.any
            && self.none == other.none
    }
}

impl Eq for Matcher {}

impl Hash for Matcher {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (label, spec) in [("AllOf", &self.all), ("AnyOf", &self.any), ("NoneOf", &self.none)] {
            if spec.is_empty() {
                continue;
            }
            if !first {
                f.write_str(".")?;
            }
            first = false;
            write!(f, "{label}(")?;
            for (i, id) in spec.ids().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{id}")?;
            }
            f.write_str(")")?;
        }
        if first {
            f.write_str("Any")?;
        }
        Ok(())
    }
}
