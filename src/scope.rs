use alloc::string::ToString as _;
use core::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use crate::errors::ValidationErrorKind;

/// Lifecycle kind of a registered dependency.
///
/// - [`Scope::Singleton`]: built on first resolution and cached; every later resolution returns the same instance.
/// - [`Scope::Prototype`]: built anew on every resolution and never cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scope {
    #[default]
    Singleton,
    Prototype,
}

impl Scope {
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Scope::Singleton => "singleton",
            Scope::Prototype => "prototype",
        }
    }

    /// Whether instances of this scope are stored in the container after construction
    #[inline]
    #[must_use]
    pub const fn is_cached(self) -> bool {
        matches!(self, Scope::Singleton)
    }
}

impl Display for Scope {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scope {
    type Err = ValidationErrorKind;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim();
        if value.eq_ignore_ascii_case(Scope::Singleton.name()) {
            Ok(Scope::Singleton)
        } else if value.eq_ignore_ascii_case(Scope::Prototype.name()) {
            Ok(Scope::Prototype)
        } else {
            Err(ValidationErrorKind::UnknownScope { value: raw.to_string() })
        }
    }
}
