use alloc::{collections::BTreeMap, vec::Vec};

use crate::{
    any::{Resolved, TypeInfo},
    descriptor::Descriptor,
    name::Name,
    scope::Scope,
    session::Session,
};

/// Registered descriptors and cached singletons of a container.
///
/// Every key of `instances` has a singleton descriptor in `descriptors`.
/// An instance is never replaced once cached.
#[derive(Default)]
pub(crate) struct Registry {
    pub(crate) descriptors: BTreeMap<Name, Descriptor>,
    pub(crate) instances: BTreeMap<Name, Resolved>,
}

impl Registry {
    #[inline]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Stores the descriptor under its name, returning the replaced one
    #[inline]
    pub(crate) fn insert(&mut self, descriptor: Descriptor) -> Option<Descriptor> {
        self.descriptors.insert(descriptor.name().clone(), descriptor)
    }

    #[inline]
    #[must_use]
    pub(crate) fn get(&self, name: &Name) -> Option<&Descriptor> {
        self.descriptors.get(name)
    }

    /// Creates a resolution session over the maps of this registry
    #[inline]
    #[must_use]
    pub(crate) fn session(&mut self) -> Session<'_> {
        Session::new(&self.descriptors, &mut self.instances)
    }

    /// Registered names with their scopes, sorted by name
    #[inline]
    #[must_use]
    pub(crate) fn scopes(&self) -> Vec<(Name, Scope)> {
        self.descriptors
            .iter()
            .map(|(name, descriptor)| (name.clone(), descriptor.scope()))
            .collect()
    }

    #[inline]
    #[must_use]
    pub(crate) fn resolved(&self) -> Vec<(Name, TypeInfo)> {
        self.instances
            .iter()
            .map(|(name, resolved)| (name.clone(), resolved.type_info()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Registry;
    use crate::{Descriptor, InstantiateErrorKind, Name, Scope};

    #[test]
    fn test_insert_overwrites() {
        let mut registry = Registry::new();

        let replaced = registry.insert(Descriptor::new("a", Scope::Singleton, |_| Ok::<_, InstantiateErrorKind>(1u8)).unwrap());
        assert!(replaced.is_none());

        let replaced = registry.insert(Descriptor::new(" A ", Scope::Prototype, |_| Ok::<_, InstantiateErrorKind>(2u16)).unwrap());
        assert!(replaced.unwrap().is_singleton());

        assert_eq!(registry.descriptors.len(), 1);
        assert!(registry.get(&Name::new("a").unwrap()).unwrap().is_prototype());
    }

    #[test]
    fn test_scopes_sorted() {
        let mut registry = Registry::new();
        for (name, scope) in [("c", Scope::Singleton), ("a", Scope::Prototype), ("b", Scope::Singleton)] {
            registry.insert(Descriptor::new(name, scope, |_| Ok::<_, InstantiateErrorKind>(())).unwrap());
        }

        let scopes = registry.scopes();
        let scopes = scopes
            .iter()
            .map(|(name, scope)| (name.as_str(), *scope))
            .collect::<alloc::vec::Vec<_>>();
        assert_eq!(
            scopes,
            [("a", Scope::Prototype), ("b", Scope::Singleton), ("c", Scope::Singleton)]
        );
    }
}
