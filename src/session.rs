use alloc::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};
use core::any::type_name;
use tracing::{debug, debug_span, error};

use crate::{
    any::{Resolved, TypeInfo},
    descriptor::Descriptor,
    errors::{InstantiateErrorKind, PendingNames, ResolveErrorKind},
    name::Name,
};

/// State of one top-level resolution.
///
/// A session is created for every top-level resolve call and passed to each factory it runs,
/// so that factories resolve their own dependencies through it. Names under construction are
/// tracked in a pending set; resolving a pending name again is a circular dependency.
pub struct Session<'a> {
    descriptors: &'a BTreeMap<Name, Descriptor>,
    instances: &'a mut BTreeMap<Name, Resolved>,
    pending: BTreeSet<Name>,
}

impl<'a> Session<'a> {
    #[inline]
    #[must_use]
    pub(crate) fn new(descriptors: &'a BTreeMap<Name, Descriptor>, instances: &'a mut BTreeMap<Name, Resolved>) -> Self {
        Self {
            descriptors,
            instances,
            pending: BTreeSet::new(),
        }
    }

    /// Resolves a dependency by name as `Dep`.
    ///
    /// # Errors
    /// - [`ResolveErrorKind::Validation`] if `name` is blank
    /// - [`ResolveErrorKind::CircularDependency`] if `name` is already under construction in this session
    /// - [`ResolveErrorKind::NoFactory`] if nothing is registered under `name`
    /// - [`ResolveErrorKind::NotFound`] if the factory produced no value
    /// - [`ResolveErrorKind::IncorrectType`] if the value isn't a `Dep`
    /// - [`ResolveErrorKind::Factory`] if the factory failed on its own
    pub fn resolve<Dep: Send + Sync + 'static>(&mut self, name: &str) -> Result<Arc<Dep>, ResolveErrorKind> {
        let name = Name::new(name)?;
        let resolved = self.resolve_name(&name)?;
        downcast(name, resolved)
    }

    /// Resolves a dependency by name without a type check.
    ///
    /// # Errors
    /// The same as [`Self::resolve`], except [`ResolveErrorKind::IncorrectType`].
    pub fn resolve_any(&mut self, name: &str) -> Result<Resolved, ResolveErrorKind> {
        let name = Name::new(name)?;
        self.resolve_name(&name)
    }

    /// Names currently under construction
    #[inline]
    pub fn pending(&self) -> impl Iterator<Item = &Name> {
        self.pending.iter()
    }

    pub(crate) fn resolve_name(&mut self, name: &Name) -> Result<Resolved, ResolveErrorKind> {
        let span = debug_span!("resolve_name", name = name.as_str());
        let _guard = span.enter();

        if !self.pending.insert(name.clone()) {
            let err = ResolveErrorKind::CircularDependency {
                name: name.clone(),
                pending: PendingNames(self.pending.iter().cloned().collect()),
            };
            error!("{}", err);
            return Err(err);
        }

        if let Some(resolved) = self.instances.get(name) {
            debug!("Found in cache");
            let resolved = resolved.clone();
            self.pending.remove(name);
            return Ok(resolved);
        }
        debug!("Not found in cache");

        let descriptors = self.descriptors;
        let Some(descriptor) = descriptors.get(name) else {
            let err = ResolveErrorKind::NoFactory { name: name.clone() };
            error!("{}", err);
            return Err(err);
        };

        let mut dependency = match descriptor.instantiate(self) {
            Ok(Some(dependency)) => dependency,
            Ok(None) => {
                let err = ResolveErrorKind::NotFound { name: name.clone() };
                error!("{}", err);
                return Err(err);
            }
            Err(InstantiateErrorKind::Resolve(err)) => {
                debug!("Dependency of the factory not resolved");
                return Err(*err);
            }
            Err(err) => {
                let err = ResolveErrorKind::Factory {
                    name: name.clone(),
                    source: err,
                };
                error!("{}", err);
                return Err(err);
            }
        };

        if descriptor.has_lifecycle() {
            descriptor.post_construct(&mut dependency);
            debug!("Post construct called");
        }

        let resolved = Resolved::new(Arc::from(dependency), descriptor.provides());
        if descriptor.is_singleton() {
            self.instances.entry(name.clone()).or_insert_with(|| resolved.clone());
            debug!("Cached");
        }

        self.pending.remove(name);
        Ok(resolved)
    }
}

pub(crate) fn downcast<Dep: Send + Sync + 'static>(name: Name, resolved: Resolved) -> Result<Arc<Dep>, ResolveErrorKind> {
    resolved.downcast::<Dep>().map_err(|resolved| {
        let err = ResolveErrorKind::IncorrectType {
            name,
            expected: TypeInfo::of::<Dep>(),
            actual: resolved.type_info(),
        };
        error!(expected = type_name::<Dep>(), "{}", err);
        err
    })
}
