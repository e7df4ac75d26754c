use alloc::string::String;
use core::{
    borrow::Borrow,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use crate::errors::ValidationErrorKind;

/// Canonicalizes a raw dependency name: trimmed and lower-cased.
///
/// # Errors
/// Returns [`ValidationErrorKind::BlankName`] if `raw` is empty or consists only of whitespace.
#[inline]
pub fn normalize(raw: &str) -> Result<String, ValidationErrorKind> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationErrorKind::BlankName);
    }
    Ok(trimmed.to_lowercase())
}

/// Canonical name under which a dependency is registered and resolved.
///
/// Two raw names that differ only in case or surrounding whitespace produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(String);

impl Name {
    /// # Errors
    /// Returns [`ValidationErrorKind::BlankName`] if `raw` is blank.
    #[inline]
    pub fn new(raw: &str) -> Result<Self, ValidationErrorKind> {
        normalize(raw).map(Self)
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Name {
    type Err = ValidationErrorKind;

    #[inline]
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::new(raw)
    }
}

impl TryFrom<&str> for Name {
    type Error = ValidationErrorKind;

    #[inline]
    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl AsRef<str> for Name {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Name {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Display for Name {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
