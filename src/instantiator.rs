use alloc::{boxed::Box, sync::Arc};
use core::marker::PhantomData;
use tracing::debug;

use crate::{any::BoxedAny, errors::InstantiateErrorKind, session::Session};

/// Factory with its produced type erased, as stored in a descriptor.
///
/// `Ok(None)` means the factory ran but produced nothing.
pub(crate) trait ErasedInstantiator: Send + Sync {
    fn instantiate(&self, session: &mut Session<'_>) -> Result<Option<BoxedAny>, InstantiateErrorKind>;
}

pub(crate) type BoxedInstantiator = Arc<dyn ErasedInstantiator>;

struct FnInstantiator<F, Dep, Err> {
    factory: F,
    _provides: PhantomData<fn() -> (Dep, Err)>,
}

impl<F, Dep, Err> ErasedInstantiator for FnInstantiator<F, Dep, Err>
where
    F: Fn(&mut Session<'_>) -> Result<Dep, Err> + Send + Sync,
    Dep: Send + Sync + 'static,
    Err: Into<InstantiateErrorKind>,
{
    fn instantiate(&self, session: &mut Session<'_>) -> Result<Option<BoxedAny>, InstantiateErrorKind> {
        let dependency = (self.factory)(session).map_err(Into::into)?;

        debug!("Instantiated");

        Ok(Some(Box::new(dependency) as BoxedAny))
    }
}

struct OptionalFnInstantiator<F, Dep, Err> {
    factory: F,
    _provides: PhantomData<fn() -> (Dep, Err)>,
}

impl<F, Dep, Err> ErasedInstantiator for OptionalFnInstantiator<F, Dep, Err>
where
    F: Fn(&mut Session<'_>) -> Result<Option<Dep>, Err> + Send + Sync,
    Dep: Send + Sync + 'static,
    Err: Into<InstantiateErrorKind>,
{
    fn instantiate(&self, session: &mut Session<'_>) -> Result<Option<BoxedAny>, InstantiateErrorKind> {
        match (self.factory)(session).map_err(Into::into)? {
            Some(dependency) => {
                debug!("Instantiated");
                Ok(Some(Box::new(dependency) as BoxedAny))
            }
            None => {
                debug!("Instantiated nothing");
                Ok(None)
            }
        }
    }
}

#[must_use]
pub(crate) fn boxed_instantiator<F, Dep, Err>(factory: F) -> BoxedInstantiator
where
    F: Fn(&mut Session<'_>) -> Result<Dep, Err> + Send + Sync + 'static,
    Dep: Send + Sync + 'static,
    Err: Into<InstantiateErrorKind> + 'static,
{
    Arc::new(FnInstantiator {
        factory,
        _provides: PhantomData,
    })
}

#[must_use]
pub(crate) fn boxed_optional_instantiator<F, Dep, Err>(factory: F) -> BoxedInstantiator
where
    F: Fn(&mut Session<'_>) -> Result<Option<Dep>, Err> + Send + Sync + 'static,
    Dep: Send + Sync + 'static,
    Err: Into<InstantiateErrorKind> + 'static,
{
    Arc::new(OptionalFnInstantiator {
        factory,
        _provides: PhantomData,
    })
}
