use crate::{
    all_tuples,
    ecs::component::{Component, Id, Registry},
};

/// A set of component ids, kept sorted and de-duplicated so that two specs built from the same
/// ids in any order compare and hash identically.
///
/// Specs are the building blocks of [`Matcher`](crate::ecs::Matcher)s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Spec {
    ids: Vec<Id>,
}

impl Spec {
    /// An empty component specification.
    pub const EMPTY: Self = Spec { ids: Vec::new() };

    /// Construct a new Spec from the given component IDs.
    #[inline]
    pub fn new(ids: impl Into<Vec<Id>>) -> Self {
        let mut ids = ids.into();
        ids.sort();
        ids.dedup();
        ids.shrink_to_fit();

        Self { ids }
    }

    /// Get the component IDs in this specification, in ascending order.
    #[inline]
    pub fn ids(&self) -> &[Id] {
        &self.ids
    }

    /// Determine if this specification contains the given component ID.
    #[inline]
    pub fn contains(&self, id: Id) -> bool {
        // Binary search since the IDs are sorted.
        self.ids.binary_search(&id).is_ok()
    }

    /// Determine if this specification contains any component IDs in the other specification.
    #[inline]
    pub fn contains_any(&self, other: &Spec) -> bool {
        other.ids.iter().any(|id| self.contains(*id))
    }

    /// Create a new spec that is the union with the other spec.
    #[inline]
    pub fn union(&self, other: &Spec) -> Self {
        let mut ids = Vec::with_capacity(self.ids.len() + other.ids.len());
        ids.extend_from_slice(&self.ids);
        ids.extend_from_slice(&other.ids);
        Self::new(ids)
    }

    /// Returns true if this spec is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the number of component IDs in this spec.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

impl From<Vec<Id>> for Spec {
    #[inline]
    fn from(value: Vec<Id>) -> Self {
        Spec::new(value)
    }
}

impl<const N: usize> From<[Id; N]> for Spec {
    #[inline]
    fn from(value: [Id; N]) -> Self {
        Spec::new(value)
    }
}

impl From<&[Id]> for Spec {
    #[inline]
    fn from(value: &[Id]) -> Self {
        Spec::new(value)
    }
}

impl From<Id> for Spec {
    #[inline]
    fn from(value: Id) -> Self {
        Spec { ids: vec![value] }
    }
}

/// Trait for converting a type into a component specification (`Spec`).
pub trait IntoSpec<Marker = ()> {
    /// Convert the type into a component specification, registering component types as needed.
    fn into_spec(registry: &Registry) -> Spec;
}

/// [`IntoSpec`] implementation for the empty tuple.
impl IntoSpec for () {
    fn into_spec(_registry: &Registry) -> Spec {
        Spec::EMPTY
    }
}

/// [`IntoSpec`] implementation for single component types.
impl<C: Component> IntoSpec for C {
    fn into_spec(registry: &Registry) -> Spec {
        Spec::from(registry.register::<C>())
    }
}

/// [`IntoSpec`] implementation for tuples of other [`IntoSpec`] types.
macro_rules! tuple_spec {
    ($($name: ident),*) => {
        impl<$($name: IntoSpec),*> IntoSpec for ($($name,)*) {
            fn into_spec(registry: &Registry) -> Spec {
                let mut ids = Vec::new();
                $(
                    ids.extend(<$name>::into_spec(registry).ids());
                )*
                Spec::new(ids)
            }
        }
    }
}

// Implement the tuple -> Spec for all tuples up to 12 elements.
all_tuples!(tuple_spec);

#[cfg(test)]
mod tests {
    use std::hash::{DefaultHasher, Hash, Hasher};

    use super::*;

    #[derive(crate::Component)]
    pub struct Comp1;
    #[derive(crate::Component)]
    pub struct Comp2;
    #[derive(crate::Component)]
    pub struct Comp3;

    fn hash_of(spec: &Spec) -> u64 {
        let mut hasher = DefaultHasher::new();
        spec.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn component_id_order() {
        // Given
        let registry = Registry::new();
        let id1 = registry.register::<Comp1>();
        let id2 = registry.register::<Comp2>();
        let id3 = registry.register::<Comp3>();

        // When
        let spec1 = Spec::new(vec![id2, id1, id3]);
        let spec2 = Spec::new(vec![id1, id2, id3]);

        // Then
        assert_eq!(spec1, spec2);
        assert_eq!(hash_of(&spec1), hash_of(&spec2));
    }

    #[test]
    fn component_id_dedupe() {
        // Given
        let registry = Registry::new();
        let id1 = registry.register::<Comp1>();
        let id2 = registry.register::<Comp2>();
        let id3 = registry.register::<Comp3>();

        // When
        let spec = Spec::new(vec![id2, id1, id3, id2, id1]);

        // Then
        assert_eq!(spec.ids(), &[id1, id2, id3]);
    }

    #[test]
    fn contains() {
        // Given
        let registry = Registry::new();
        let id1 = registry.register::<Comp1>();
        let id2 = registry.register::<Comp2>();
        let id3 = registry.register::<Comp3>();

        let spec = Spec::new(vec![id2, id1]);

        // Then
        assert!(spec.contains(id1));
        assert!(spec.contains(id2));
        assert!(!spec.contains(id3));
        assert!(spec.contains_any(&Spec::new([id3, id2])));
        assert!(!spec.contains_any(&Spec::from(id3)));
    }

    #[test]
    fn union_merges_and_sorts() {
        // Given
        let registry = Registry::new();
        let id1 = registry.register::<Comp1>();
        let id2 = registry.register::<Comp2>();
        let id3 = registry.register::<Comp3>();

        // When
        let merged = Spec::new([id3, id1]).union(&Spec::new([id2, id1]));

        // Then
        assert_eq!(merged.ids(), &[id1, id2, id3]);
    }

    #[test]
    fn tuple_specs_register_in_order() {
        // Given
        let registry = Registry::new();

        // When
        let spec = registry.spec::<(Comp2, Comp1)>();
        let reversed = registry.spec::<(Comp1, Comp2)>();

        // Then - Comp2 was seen first, so it got the first id
        assert_eq!(registry.get::<Comp2>(), Some(Id::new(0)));
        assert_eq!(spec, reversed);
        assert_eq!(spec.len(), 2);
        assert!(registry.spec::<()>().is_empty());
    }
}
