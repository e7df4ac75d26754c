use alloc::{boxed::Box, fmt};
use core::fmt::{Display, Formatter};

use super::{instantiate::InstantiateErrorKind, validation::ValidationErrorKind};
use crate::{any::TypeInfo, name::Name};

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error(transparent)]
    Validation(#[from] ValidationErrorKind),
    #[error("There is no registered factory for dependency with name '{name}'")]
    NoFactory { name: Name },
    #[error("Factory for dependency with name '{name}' produced no value")]
    NotFound { name: Name },
    #[error("Circular dependency detected while resolving '{name}'. Pending: {pending}")]
    CircularDependency { name: Name, pending: PendingNames },
    #[error(
        "Dependency with name '{name}' is not of type '{}'. Actual type: '{}'",
        .expected.name, .actual.name,
    )]
    IncorrectType { name: Name, expected: TypeInfo, actual: TypeInfo },
    #[error("Factory for dependency with name '{name}' failed: {source}")]
    Factory { name: Name, source: InstantiateErrorKind },
}

/// Names pending construction at the moment a cycle was detected, in sorted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNames(pub Box<[Name]>);

impl PendingNames {
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|pending| pending.as_str() == name)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for PendingNames {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (index, name) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}")?;
        }
        write!(f, "]")
    }
}
