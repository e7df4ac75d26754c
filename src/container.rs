use alloc::{boxed::Box, format, sync::Arc, vec::Vec};
use core::any::type_name;
use parking_lot::Mutex;
use tracing::{debug, error, info_span};

use crate::{
    any::{Resolved, TypeInfo},
    descriptor::Descriptor,
    errors::{InstantiateErrorKind, ResolveErrorKind, ValidationErrorKind},
    name::Name,
    registry::Registry,
    scope::Scope,
    session::{downcast, Session},
    sink::MessageSink,
};

/// Name-keyed IoC container.
///
/// Dependencies are registered under a name with a factory and a [`Scope`], and resolved by
/// name later. Resolution is lazy: nothing is built until it's first resolved, unless
/// [`Self::load_all`] is called.
///
/// Cloning the container is cheap and the clones share the registered factories and cached singletons.
///
/// # Locking
/// Registration and resolution are serialized by one lock held for the whole resolution,
/// including every nested dependency. Factories must resolve their dependencies through the
/// [`Session`] they receive, never through the container itself.
#[derive(Clone)]
pub struct Container {
    pub(crate) inner: Arc<ContainerInner>,
}

impl Container {
    /// Creates an empty container without a message sink
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_sink(None)
    }

    /// Creates an empty container that sends its informational and warning messages to `sink`
    #[inline]
    #[must_use]
    pub fn with_sink(sink: impl MessageSink + 'static) -> Self {
        Self::new_with_sink(Some(Box::new(sink)))
    }

    #[inline]
    #[must_use]
    fn new_with_sink(sink: Option<Box<dyn MessageSink>>) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                registry: Mutex::new(Registry::new()),
                sink,
            }),
        }
    }

    /// Process-wide container, created on first access.
    /// Its messages go to [`crate::TracingSink`].
    ///
    /// # Warning
    /// Prefer creating a container in the composition root and passing it where it's needed.
    #[cfg(feature = "std")]
    #[must_use]
    pub fn global() -> &'static Self {
        use std::sync::OnceLock;

        static GLOBAL: OnceLock<Container> = OnceLock::new();

        GLOBAL.get_or_init(|| Self::with_sink(crate::sink::TracingSink))
    }

    /// Registers a singleton dependency
    ///
    /// # Errors
    /// Returns [`ValidationErrorKind::BlankName`] if `name` is blank.
    #[inline]
    pub fn register<F, Dep, Err>(&self, name: &str, factory: F) -> Result<&Self, ValidationErrorKind>
    where
        F: Fn(&mut Session<'_>) -> Result<Dep, Err> + Send + Sync + 'static,
        Dep: Send + Sync + 'static,
        Err: Into<InstantiateErrorKind> + 'static,
    {
        self.register_with_scope(name, Scope::Singleton, factory)
    }

    /// Registers a dependency with the given scope
    ///
    /// # Errors
    /// Returns [`ValidationErrorKind::BlankName`] if `name` is blank.
    #[inline]
    pub fn register_with_scope<F, Dep, Err>(&self, name: &str, scope: Scope, factory: F) -> Result<&Self, ValidationErrorKind>
    where
        F: Fn(&mut Session<'_>) -> Result<Dep, Err> + Send + Sync + 'static,
        Dep: Send + Sync + 'static,
        Err: Into<InstantiateErrorKind> + 'static,
    {
        match Descriptor::new(name, scope, factory) {
            Ok(descriptor) => Ok(self.register_descriptor(descriptor)),
            Err(err) => {
                error!("{}", err);
                Err(err)
            }
        }
    }

    /// Registers a prebuilt descriptor.
    ///
    /// A descriptor already registered under the same name is replaced, with a warning.
    /// A singleton that was already resolved under that name stays cached and keeps being returned.
    pub fn register_descriptor(&self, descriptor: Descriptor) -> &Self {
        let span = info_span!(
            "register",
            name = descriptor.name().as_str(),
            scope = descriptor.scope().name(),
            dependency = descriptor.provides().name,
        );
        let _guard = span.enter();

        let name = descriptor.name().clone();
        let replaced = self.inner.registry.lock().insert(descriptor);

        if replaced.is_some() {
            debug!("Overridden");
            self.inner.warn(&format!("Override register for dependency with name '{name}'"));
        } else {
            debug!("Registered");
        }
        self
    }

    /// Resolves a dependency by name.
    ///
    /// Singletons are built on first resolution and the same instance is returned afterwards,
    /// prototypes are built on every call.
    ///
    /// # Errors
    /// - [`ResolveErrorKind::Validation`] if `name` is blank
    /// - [`ResolveErrorKind::NoFactory`] if nothing is registered under `name` or one of its dependencies
    /// - [`ResolveErrorKind::NotFound`] if a factory produced no value
    /// - [`ResolveErrorKind::CircularDependency`] if the dependency graph has a cycle
    /// - [`ResolveErrorKind::IncorrectType`] if a value isn't of the requested type
    /// - [`ResolveErrorKind::Factory`] if a factory failed on its own
    pub fn resolve<Dep: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<Dep>, ResolveErrorKind> {
        let span = info_span!("resolve", name = name, dependency = type_name::<Dep>());
        let _guard = span.enter();

        let name = self.inner.name(name)?;
        let resolved = self.inner.resolve_name(&name)?;
        downcast(name, resolved)
    }

    /// Resolves a dependency by name without a type check
    ///
    /// # Errors
    /// The same as [`Self::resolve`], except [`ResolveErrorKind::IncorrectType`] for the requested dependency itself.
    pub fn resolve_any(&self, name: &str) -> Result<Resolved, ResolveErrorKind> {
        let span = info_span!("resolve_any", name = name);
        let _guard = span.enter();

        let name = self.inner.name(name)?;
        self.inner.resolve_name(&name)
    }

    /// Resolves every registered dependency, so that configuration errors surface now instead of at first use.
    ///
    /// ## Arguments
    /// - `verbose`: report every dependency to the sink before resolving it
    /// - `summarize`: call [`Self::show_content`] after loading
    ///
    /// # Errors
    /// Returns the first error met, see [`Self::resolve`]. Dependencies loaded before it stay cached.
    pub fn load_all(&self, verbose: bool, summarize: bool) -> Result<&Self, ResolveErrorKind> {
        let span = info_span!("load_all");
        let _guard = span.enter();

        self.inner.info("");
        self.inner.info("Loading container:");
        self.inner.info("------------------");

        let scopes = self.inner.registry.lock().scopes();

        if scopes.is_empty() {
            debug!("Nothing to load");
            self.inner
                .info("Nothing to load: there are no dependency factories registered in the container");
            return Ok(self);
        }

        for (name, scope) in scopes {
            if verbose {
                self.inner.info(&format!("Resolving {scope} dependency with name: {name} ..."));
            }
            self.inner.resolve_name(&name)?;
        }
        debug!("Loaded");

        if summarize {
            self.show_content();
        }
        Ok(self)
    }

    /// Reports every cached singleton and the type of its value to the sink.
    /// Prototypes are never cached, so they never show up here.
    pub fn show_content(&self) -> &Self {
        let resolved = self.resolved();

        self.inner.info("");
        self.inner.info("Container content:");
        self.inner.info("------------------");

        if resolved.is_empty() {
            self.inner.info(&format!(
                "There are no resolved dependencies or all registered dependencies are of scope {}",
                Scope::Prototype,
            ));
        }
        for (name, type_info) in resolved {
            self.inner
                .info(&format!("For name: \"{name}\" injects object of type \"{}\"", type_info.name));
        }
        self
    }

    /// Cached singletons with the types of their values, sorted by name
    #[must_use]
    pub fn resolved(&self) -> Vec<(Name, TypeInfo)> {
        self.inner.registry.lock().resolved()
    }

    /// Whether a factory is registered under `name`
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        match Name::new(name) {
            Ok(name) => self.inner.registry.lock().get(&name).is_some(),
            Err(_) => false,
        }
    }
}

impl Default for Container {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct ContainerInner {
    pub(crate) registry: Mutex<Registry>,
    pub(crate) sink: Option<Box<dyn MessageSink>>,
}

impl ContainerInner {
    fn name(&self, raw: &str) -> Result<Name, ResolveErrorKind> {
        Name::new(raw).map_err(|err| {
            error!("{}", err);
            err.into()
        })
    }

    /// Resolves `name` as a top-level call with a fresh session
    fn resolve_name(&self, name: &Name) -> Result<Resolved, ResolveErrorKind> {
        let mut registry = self.registry.lock();
        registry.session().resolve_name(name)
    }

    #[inline]
    fn info(&self, message: &str) {
        if let Some(sink) = &self.sink {
            sink.info(message);
        }
    }

    #[inline]
    fn warn(&self, message: &str) {
        if let Some(sink) = &self.sink {
            sink.warn(message);
        }
    }
}
