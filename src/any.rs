use alloc::{boxed::Box, sync::Arc};
use core::{
    any::{type_name, Any, TypeId},
    cmp::Ordering,
    fmt::{self, Debug, Display, Formatter},
};

pub(crate) type BoxedAny = Box<dyn Any + Send + Sync>;
pub(crate) type RcAny = Arc<dyn Any + Send + Sync>;

#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    pub name: &'static str,
    pub id: TypeId,
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl PartialOrd for TypeInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Display for TypeInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl TypeInfo {
    #[inline]
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    #[inline]
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit_once("::").map_or(self.name, |(_, name)| name)
    }
}

/// A resolved value with its type erased.
///
/// Singletons hand out clones of the same [`Arc`], so identity is preserved across resolutions.
#[derive(Clone)]
pub struct Resolved {
    value: RcAny,
    type_info: TypeInfo,
}

impl Resolved {
    #[inline]
    #[must_use]
    pub(crate) fn new(value: RcAny, type_info: TypeInfo) -> Self {
        Self { value, type_info }
    }

    /// Type of the value, as produced by its factory
    #[inline]
    #[must_use]
    pub fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> &RcAny {
        &self.value
    }

    #[inline]
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_info.id == TypeId::of::<T>()
    }

    /// Converts into the concrete type.
    ///
    /// # Errors
    /// Gives the value back unchanged if it isn't a `T`.
    #[inline]
    pub fn downcast<T: Send + Sync + 'static>(self) -> Result<Arc<T>, Self> {
        let Self { value, type_info } = self;
        value.downcast::<T>().map_err(|value| Self { value, type_info })
    }
}

impl Debug for Resolved {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolved").field("type_info", &self.type_info).finish_non_exhaustive()
    }
}
