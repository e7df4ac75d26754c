use alloc::boxed::Box;

use super::resolve::ResolveErrorKind;

/// Error returned by a factory.
///
/// A failed nested resolution is carried as [`InstantiateErrorKind::Resolve`] and reaches the
/// caller of the top-level resolve unchanged. Anything else the factory fails with is
/// carried as [`InstantiateErrorKind::Custom`].
#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error(transparent)]
    Resolve(Box<ResolveErrorKind>),
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

impl From<ResolveErrorKind> for InstantiateErrorKind {
    #[inline]
    fn from(err: ResolveErrorKind) -> Self {
        Self::Resolve(Box::new(err))
    }
}
