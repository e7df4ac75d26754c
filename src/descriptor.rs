use core::fmt::{self, Debug, Display, Formatter};

use crate::{
    any::{BoxedAny, TypeInfo},
    errors::{InstantiateErrorKind, ValidationErrorKind},
    instantiator::{boxed_instantiator, boxed_optional_instantiator, BoxedInstantiator},
    lifecycle::{post_construct, Lifecycle, PostConstructFn},
    name::Name,
    scope::Scope,
    session::Session,
};

/// Recipe for producing a named dependency: its name, scope and factory.
///
/// The factory receives the [`Session`] of the resolution in progress and resolves its own
/// dependencies through it.
#[derive(Clone)]
pub struct Descriptor {
    name: Name,
    scope: Scope,
    provides: TypeInfo,
    instantiator: BoxedInstantiator,
    post_construct: Option<PostConstructFn>,
}

impl Descriptor {
    /// # Errors
    /// Returns [`ValidationErrorKind::BlankName`] if `name` is blank.
    pub fn new<F, Dep, Err>(name: &str, scope: Scope, factory: F) -> Result<Self, ValidationErrorKind>
    where
        F: Fn(&mut Session<'_>) -> Result<Dep, Err> + Send + Sync + 'static,
        Dep: Send + Sync + 'static,
        Err: Into<InstantiateErrorKind> + 'static,
    {
        Ok(Self {
            name: Name::new(name)?,
            scope,
            provides: TypeInfo::of::<Dep>(),
            instantiator: boxed_instantiator(factory),
            post_construct: None,
        })
    }

    /// Creates a descriptor whose factory may produce nothing.
    /// Resolving it while the factory returns `Ok(None)` fails with [`crate::ResolveErrorKind::NotFound`].
    ///
    /// # Errors
    /// Returns [`ValidationErrorKind::BlankName`] if `name` is blank.
    pub fn optional<F, Dep, Err>(name: &str, scope: Scope, factory: F) -> Result<Self, ValidationErrorKind>
    where
        F: Fn(&mut Session<'_>) -> Result<Option<Dep>, Err> + Send + Sync + 'static,
        Dep: Send + Sync + 'static,
        Err: Into<InstantiateErrorKind> + 'static,
    {
        Ok(Self {
            name: Name::new(name)?,
            scope,
            provides: TypeInfo::of::<Dep>(),
            instantiator: boxed_optional_instantiator(factory),
            post_construct: None,
        })
    }

    /// Creates a descriptor for a dependency implementing [`Lifecycle`].
    /// [`Lifecycle::post_construct`] is called on every value the factory builds.
    ///
    /// # Errors
    /// Returns [`ValidationErrorKind::BlankName`] if `name` is blank.
    pub fn managed<F, Dep, Err>(name: &str, scope: Scope, factory: F) -> Result<Self, ValidationErrorKind>
    where
        F: Fn(&mut Session<'_>) -> Result<Dep, Err> + Send + Sync + 'static,
        Dep: Lifecycle + Send + Sync + 'static,
        Err: Into<InstantiateErrorKind> + 'static,
    {
        let mut descriptor = Self::new(name, scope, factory)?;
        descriptor.post_construct = Some(post_construct::<Dep> as PostConstructFn);
        Ok(descriptor)
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Type of the values the factory produces
    #[inline]
    #[must_use]
    pub fn provides(&self) -> TypeInfo {
        self.provides
    }

    #[inline]
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.scope == Scope::Singleton
    }

    #[inline]
    #[must_use]
    pub fn is_prototype(&self) -> bool {
        self.scope == Scope::Prototype
    }

    #[inline]
    #[must_use]
    pub fn has_lifecycle(&self) -> bool {
        self.post_construct.is_some()
    }

    #[inline]
    pub(crate) fn instantiate(&self, session: &mut Session<'_>) -> Result<Option<BoxedAny>, InstantiateErrorKind> {
        self.instantiator.instantiate(session)
    }

    #[inline]
    pub(crate) fn post_construct(&self, value: &mut BoxedAny) {
        if let Some(post_construct) = self.post_construct {
            post_construct(&mut **value);
        }
    }
}

impl Debug for Descriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .field("provides", &self.provides.name)
            .field("lifecycle", &self.post_construct.is_some())
            .finish_non_exhaustive()
    }
}

impl Display for Descriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Descriptor {{ name: '{}', scope: {}, provides: {} }}",
            self.name, self.scope, self.provides.name
        )
    }
}
